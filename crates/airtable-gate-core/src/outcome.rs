// crates/airtable-gate-core/src/outcome.rs
// ============================================================================
// Module: Call Outcomes
// Description: Uniform outcome variants for gated tool calls.
// Purpose: Render every non-protocol outcome into envelope text.
// Dependencies: airtable-gate-core::gate, airtable-gate-core::tooling
// ============================================================================

//! ## Overview
//! Every call that passes protocol validation resolves to one of these
//! variants, and all of them render to plain text for the single result
//! envelope shape. Upstream failures are payload-level text by design;
//! protocol errors (missing credentials, unknown tool) never reach this
//! type.

use crate::gate::WELCOME_TEXT;
use crate::gate::block_warning;
use crate::tooling::ToolName;

/// Outcome of a gated tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// Upstream payload, already serialized for the text envelope.
    Success(String),
    /// Onboarding response consuming a session's first interaction.
    Welcome,
    /// Restricted tool re-invoked without an override phrase; the upstream
    /// was never contacted.
    Blocked(ToolName),
    /// Normalized description of an upstream failure.
    Upstream(String),
}

impl CallOutcome {
    /// Renders the outcome as the call's text content.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Success(payload) | Self::Upstream(payload) => payload,
            Self::Welcome => WELCOME_TEXT.to_string(),
            Self::Blocked(tool) => block_warning(tool),
        }
    }
}
