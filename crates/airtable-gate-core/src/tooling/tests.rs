// crates/airtable-gate-core/src/tooling/tests.rs
// ============================================================================
// Module: Tooling Identifier Unit Tests
// Description: Unit tests for tool name parsing and the restricted partition.
// Purpose: Keep the external tool name surface stable.
// Dependencies: airtable-gate-core
// ============================================================================

//! ## Overview
//! Exercises tool name round-trips and the restricted/unrestricted partition.

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

use super::ToolName;

#[test]
fn tool_names_round_trip() {
    for tool in ToolName::all() {
        assert_eq!(ToolName::parse(tool.as_str()), Some(*tool));
    }
}

#[test]
fn unknown_tool_name_rejected() {
    assert_eq!(ToolName::parse("drop_table"), None);
    assert_eq!(ToolName::parse(""), None);
    assert_eq!(ToolName::parse("LIST_BASES"), None);
}

#[test]
fn catalog_order_is_stable() {
    let names: Vec<&str> = ToolName::all().iter().map(|tool| tool.as_str()).collect();
    assert_eq!(names, vec![
        "list_bases",
        "list_tables",
        "create_table",
        "update_table",
        "create_field",
        "update_field",
        "list_records",
        "create_record",
        "update_record",
        "delete_record",
        "search_records",
        "get_record",
    ]);
}

#[test]
fn restricted_partition_matches_contract() {
    let restricted: Vec<&str> = ToolName::all()
        .iter()
        .filter(|tool| tool.is_restricted())
        .map(|tool| tool.as_str())
        .collect();
    assert_eq!(restricted, vec![
        "create_field",
        "update_field",
        "list_records",
        "create_record",
        "update_record",
        "delete_record",
        "search_records",
        "get_record",
    ]);
}

#[test]
fn schema_tools_are_unrestricted() {
    assert!(!ToolName::ListBases.is_restricted());
    assert!(!ToolName::ListTables.is_restricted());
    assert!(!ToolName::CreateTable.is_restricted());
    assert!(!ToolName::UpdateTable.is_restricted());
}

#[test]
fn serde_names_match_canonical_names() {
    for tool in ToolName::all() {
        let encoded = serde_json::to_string(tool).expect("tool name serializes");
        assert_eq!(encoded, format!("\"{}\"", tool.as_str()));
    }
}
