// crates/airtable-gate-mcp/src/credentials/tests.rs
// ============================================================================
// Module: Credential Resolution Unit Tests
// Description: Unit tests for fail-closed credential extraction.
// Purpose: Validate the AIRTABLE namespace contract.
// Dependencies: airtable-gate-mcp
// ============================================================================

//! ## Overview
//! Exercises the resolve happy path and every fail-closed branch.

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

use super::Credentials;

#[test]
fn resolves_complete_credentials() {
    let context = json!({"AIRTABLE": {"base_id": "app123", "api_key": "key123"}});
    let credentials = Credentials::resolve(Some(&context)).expect("credentials resolve");
    assert_eq!(credentials.base_id, "app123");
    assert_eq!(credentials.api_key, "key123");
}

#[test]
fn missing_context_fails_closed() {
    assert!(Credentials::resolve(None).is_err());
    assert!(Credentials::resolve(Some(&json!({}))).is_err());
}

#[test]
fn missing_namespace_fails_closed() {
    let context = json!({"OTHER": {"base_id": "app123", "api_key": "key123"}});
    assert!(Credentials::resolve(Some(&context)).is_err());
}

#[test]
fn missing_or_empty_members_fail_closed() {
    let context = json!({"AIRTABLE": {"api_key": "key123"}});
    assert!(Credentials::resolve(Some(&context)).is_err());
    let context = json!({"AIRTABLE": {"base_id": "app123"}});
    assert!(Credentials::resolve(Some(&context)).is_err());
    let context = json!({"AIRTABLE": {"base_id": "", "api_key": "key123"}});
    assert!(Credentials::resolve(Some(&context)).is_err());
    let context = json!({"AIRTABLE": {"base_id": "app123", "api_key": ""}});
    assert!(Credentials::resolve(Some(&context)).is_err());
}

#[test]
fn non_string_members_fail_closed() {
    let context = json!({"AIRTABLE": {"base_id": 7, "api_key": "key123"}});
    assert!(Credentials::resolve(Some(&context)).is_err());
}

#[test]
fn debug_output_redacts_the_api_key() {
    let context = json!({"AIRTABLE": {"base_id": "app123", "api_key": "key123"}});
    let credentials = Credentials::resolve(Some(&context)).expect("credentials resolve");
    let rendered = format!("{credentials:?}");
    assert!(rendered.contains("app123"));
    assert!(!rendered.contains("key123"));
}
