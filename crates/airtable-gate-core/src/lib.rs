// crates/airtable-gate-core/src/lib.rs
// ============================================================================
// Module: Airtable Gate Core
// Description: Session state, usage gating, and tool identity for Airtable Gate.
// Purpose: Provide the transport-independent gating model for the MCP server.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Airtable Gate Core holds the pieces of the server that do not touch the
//! network: canonical tool identifiers, per-session usage state, the welcome
//! and repeat-action gates, call outcome rendering, and field-definition
//! normalization. The MCP layer wires these around the upstream Airtable
//! client.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod field;
pub mod gate;
pub mod outcome;
pub mod session;
pub mod tooling;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use field::FieldType;
pub use field::normalize_field;
pub use gate::ActionThrottle;
pub use gate::OverrideDetector;
pub use gate::ThrottleDecision;
pub use gate::WelcomeGate;
pub use outcome::CallOutcome;
pub use session::SessionKey;
pub use session::SessionRegistry;
pub use session::SessionState;
pub use tooling::ToolName;
