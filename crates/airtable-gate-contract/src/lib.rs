// crates/airtable-gate-contract/src/lib.rs
// ============================================================================
// Module: Airtable Gate Contract
// Description: Canonical MCP tool definitions for Airtable Gate.
// Purpose: Provide the declarative tool catalog consumed by tool listings.
// Dependencies: airtable-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The contract crate is pure declarative data: the canonical tool surface
//! (names, descriptions, argument schemas) exposed through `tools/list`. The
//! dispatcher recognizes exactly this set; gating and routing live in the
//! MCP crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod tooling;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use airtable_gate_core::ToolName;
pub use tooling::ToolDefinition;
pub use tooling::tool_definitions;
