// crates/airtable-gate-core/src/session/tests.rs
// ============================================================================
// Module: Session Registry Unit Tests
// Description: Unit tests for session key resolution and usage state.
// Purpose: Validate lazy creation and monotone usage marking.
// Dependencies: airtable-gate-core
// ============================================================================

//! ## Overview
//! Exercises session key precedence, default fallback, and registry
//! bookkeeping.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use serde_json::json;

use super::DEFAULT_SESSION_KEY;
use super::SessionKey;
use super::SessionRegistry;
use crate::tooling::ToolName;

#[test]
fn missing_metadata_falls_back_to_default() {
    assert_eq!(SessionKey::resolve(None).as_str(), DEFAULT_SESSION_KEY);
    assert_eq!(SessionKey::resolve(Some(&json!({}))).as_str(), DEFAULT_SESSION_KEY);
    assert_eq!(SessionKey::resolve(Some(&json!("not a map"))).as_str(), DEFAULT_SESSION_KEY);
}

#[test]
fn session_id_takes_precedence() {
    let meta = json!({
        "session_id": "s1",
        "conversation_id": "c1",
        "user_id": "u1",
    });
    assert_eq!(SessionKey::resolve(Some(&meta)).as_str(), "s1");
}

#[test]
fn conversation_id_then_user_id() {
    let meta = json!({"conversation_id": "c1", "user_id": "u1"});
    assert_eq!(SessionKey::resolve(Some(&meta)).as_str(), "c1");
    let meta = json!({"user_id": "u1"});
    assert_eq!(SessionKey::resolve(Some(&meta)).as_str(), "u1");
}

#[test]
fn numeric_identifiers_are_stringified() {
    let meta = json!({"session_id": 42});
    assert_eq!(SessionKey::resolve(Some(&meta)).as_str(), "42");
}

#[test]
fn empty_string_identifier_is_skipped() {
    let meta = json!({"session_id": "", "user_id": "u1"});
    assert_eq!(SessionKey::resolve(Some(&meta)).as_str(), "u1");
}

#[test]
fn sessions_are_created_lazily() {
    let registry = SessionRegistry::new();
    let key = SessionKey::resolve(Some(&json!({"session_id": "fresh"})));
    assert!(!registry.is_welcomed(&key));
    assert!(!registry.has_used(&key, ToolName::CreateRecord));
}

#[test]
fn welcome_flag_is_sticky() {
    let registry = SessionRegistry::new();
    let key = SessionKey::resolve(None);
    registry.mark_welcomed(&key);
    assert!(registry.is_welcomed(&key));
}

#[test]
fn used_set_only_grows() {
    let registry = SessionRegistry::new();
    let key = SessionKey::resolve(None);
    registry.mark_used(&key, ToolName::CreateRecord);
    registry.mark_used(&key, ToolName::CreateRecord);
    assert!(registry.has_used(&key, ToolName::CreateRecord));
    assert!(!registry.has_used(&key, ToolName::DeleteRecord));
}

#[test]
fn sessions_are_isolated_by_key() {
    let registry = SessionRegistry::new();
    let first = SessionKey::resolve(Some(&json!({"session_id": "a"})));
    let second = SessionKey::resolve(Some(&json!({"session_id": "b"})));
    registry.mark_used(&first, ToolName::ListRecords);
    assert!(registry.has_used(&first, ToolName::ListRecords));
    assert!(!registry.has_used(&second, ToolName::ListRecords));
}
