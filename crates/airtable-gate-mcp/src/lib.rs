// crates/airtable-gate-mcp/src/lib.rs
// ============================================================================
// Module: Airtable Gate MCP
// Description: MCP server and upstream proxying for Airtable Gate.
// Purpose: Expose the gated Airtable tool surface over JSON-RPC 2.0.
// Dependencies: airtable-gate-core, airtable-gate-contract, axum, reqwest, tokio
// ============================================================================

//! ## Overview
//! Airtable Gate MCP wires the core gates around a per-request Airtable
//! client and serves the result over stdio or HTTP. Every `tools/call`
//! resolves a session, passes the welcome gate, resolves credentials fail
//! closed, runs the repeat-action throttle for restricted tools, and routes
//! through a command table to exactly one upstream HTTP operation. Upstream
//! failures are normalized into payload text; protocol errors are reserved
//! for callers that used the interface wrong.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod credentials;
pub mod server;
pub mod tools;
pub mod upstream;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::GateAuditEvent;
pub use audit::GateAuditSink;
pub use audit::NoopGateAuditSink;
pub use audit::StderrGateAuditSink;
pub use config::AirtableGateConfig;
pub use config::ServerTransport;
pub use config::UpstreamConfig;
pub use credentials::Credentials;
pub use server::McpServer;
pub use server::McpServerError;
pub use tools::ToolCall;
pub use tools::ToolError;
pub use tools::ToolRouter;
pub use upstream::UpstreamClient;
pub use upstream::UpstreamError;
