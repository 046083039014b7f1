// crates/airtable-gate-mcp/src/audit.rs
// ============================================================================
// Module: Gate Audit Logging
// Description: Structured audit events for gate decisions.
// Purpose: Emit redacted audit logs without hard dependencies.
// Dependencies: airtable-gate-core, serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for gate decision
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign. Credentials and
//! argument payloads never appear in events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use airtable_gate_core::SessionKey;
use airtable_gate_core::ToolName;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gate decision audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct GateAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Session key the decision applies to.
    pub session: String,
    /// Tool name when the decision concerns one tool.
    pub tool: Option<ToolName>,
    /// Normalized detail for upstream failures.
    pub detail: Option<String>,
}

impl GateAuditEvent {
    /// Builds an event with a consistent timestamp.
    fn new(
        event: &'static str,
        session: &SessionKey,
        tool: Option<ToolName>,
        detail: Option<String>,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            session: session.as_str().to_string(),
            tool,
            detail,
        }
    }

    /// Builds a session-welcome event.
    #[must_use]
    pub fn welcome(session: &SessionKey) -> Self {
        Self::new("session_welcome", session, None, None)
    }

    /// Builds a blocked-repeat event.
    #[must_use]
    pub fn blocked(session: &SessionKey, tool: ToolName) -> Self {
        Self::new("action_blocked", session, Some(tool), None)
    }

    /// Builds an override-bypass event.
    #[must_use]
    pub fn override_granted(session: &SessionKey, tool: ToolName) -> Self {
        Self::new("action_override", session, Some(tool), None)
    }

    /// Builds an upstream-failure event carrying the normalized message.
    #[must_use]
    pub fn upstream_error(session: &SessionKey, tool: ToolName, detail: &str) -> Self {
        Self::new("upstream_error", session, Some(tool), Some(detail.to_string()))
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for gate decisions.
pub trait GateAuditSink: Send + Sync {
    /// Records a gate audit event.
    fn record(&self, event: &GateAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrGateAuditSink;

impl GateAuditSink for StderrGateAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopGateAuditSink;

impl GateAuditSink for NoopGateAuditSink {
    fn record(&self, _event: &GateAuditEvent) {}
}
