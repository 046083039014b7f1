// crates/airtable-gate-core/src/session.rs
// ============================================================================
// Module: Session Registry
// Description: Per-session usage state keyed by an opaque session identifier.
// Purpose: Track welcome and restricted-action usage for the process lifetime.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Sessions are created lazily on first lookup and live until process
//! teardown; there is no eviction policy, so registry size is bounded only by
//! the number of distinct session keys seen. State mutation is synchronous
//! under an internal mutex that is never held across an await point, which
//! makes the welcome/throttle sequence interleavable between overlapping
//! calls for the same session. That race is accepted: the gate is a nuisance
//! guard, not a correctness-critical lock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Mutex;
use std::sync::PoisonError;

use serde_json::Value;

use crate::tooling::ToolName;

// ============================================================================
// SECTION: Session Key
// ============================================================================

/// Fallback session key used when the caller supplies no session metadata.
pub const DEFAULT_SESSION_KEY: &str = "default";

/// Metadata keys probed for a session identifier, in precedence order.
const SESSION_META_KEYS: &[&str] = &["session_id", "conversation_id", "user_id"];

/// Opaque session identifier resolved from caller-supplied call metadata.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionKey(String);

impl SessionKey {
    /// Resolves a session key from the call's `_meta` payload.
    ///
    /// The first of `session_id`, `conversation_id`, and `user_id` that
    /// carries a non-empty string or a number wins; anything else falls back
    /// to [`DEFAULT_SESSION_KEY`].
    #[must_use]
    pub fn resolve(meta: Option<&Value>) -> Self {
        if let Some(meta) = meta {
            for key in SESSION_META_KEYS {
                match meta.get(key) {
                    Some(Value::String(text)) if !text.is_empty() => {
                        return Self(text.clone());
                    }
                    Some(Value::Number(number)) => return Self(number.to_string()),
                    _ => {}
                }
            }
        }
        Self(DEFAULT_SESSION_KEY.to_string())
    }

    /// Returns the raw session key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Session State
// ============================================================================

/// Mutable per-session usage state.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Whether the onboarding message has been delivered.
    pub welcomed: bool,
    /// Restricted tools already invoked in this session. Entries are only
    /// ever added; override phrases bypass the gate without resetting them.
    pub used: BTreeSet<ToolName>,
}

// ============================================================================
// SECTION: Session Registry
// ============================================================================

/// Process-wide registry mapping session keys to usage state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// Session state map guarded for statement-level mutation.
    sessions: Mutex<BTreeMap<String, SessionState>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `operation` with exclusive mutable access to the session's
    /// state, creating the session on first lookup.
    pub fn with_session<R>(
        &self,
        key: &SessionKey,
        operation: impl FnOnce(&mut SessionState) -> R,
    ) -> R {
        // Poisoned locks recover the inner map; session state stays usable.
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        operation(sessions.entry(key.as_str().to_string()).or_default())
    }

    /// Returns true when the session has already received the onboarding
    /// message.
    #[must_use]
    pub fn is_welcomed(&self, key: &SessionKey) -> bool {
        self.with_session(key, |session| session.welcomed)
    }

    /// Marks the session as welcomed.
    pub fn mark_welcomed(&self, key: &SessionKey) {
        self.with_session(key, |session| session.welcomed = true);
    }

    /// Returns true when the restricted tool has been invoked in this
    /// session.
    #[must_use]
    pub fn has_used(&self, key: &SessionKey, tool: ToolName) -> bool {
        self.with_session(key, |session| session.used.contains(&tool))
    }

    /// Records a restricted tool invocation for the session.
    pub fn mark_used(&self, key: &SessionKey, tool: ToolName) {
        self.with_session(key, |session| {
            session.used.insert(tool);
        });
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
