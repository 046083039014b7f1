// crates/airtable-gate-core/src/field/tests.rs
// ============================================================================
// Module: Field Normalization Unit Tests
// Description: Unit tests for field-definition option normalization.
// Purpose: Validate strip, default, and pass-through behavior per type.
// Dependencies: airtable-gate-core
// ============================================================================

//! ## Overview
//! Exercises the three normalization outcomes: options stripped, defaults
//! injected, and payload passed through unchanged.

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

use super::FieldType;
use super::normalize_field;

#[test]
fn options_stripped_for_plain_text_types() {
    let field = json!({
        "name": "Notes",
        "type": "singleLineText",
        "options": {"color": "blue"},
    });
    let normalized = normalize_field(field);
    assert_eq!(normalized, json!({"name": "Notes", "type": "singleLineText"}));
}

#[test]
fn number_without_options_gets_precision_default() {
    let field = json!({"name": "Count", "type": "number"});
    let normalized = normalize_field(field);
    assert_eq!(normalized, json!({
        "name": "Count",
        "type": "number",
        "options": {"precision": 0},
    }));
}

#[test]
fn currency_without_options_gets_symbol_default() {
    let field = json!({"name": "Price", "type": "currency"});
    let normalized = normalize_field(field);
    assert_eq!(normalized, json!({
        "name": "Price",
        "type": "currency",
        "options": {"precision": 2, "symbol": "$"},
    }));
}

#[test]
fn selects_without_options_get_empty_choices() {
    for field_type in ["singleSelect", "multiSelect"] {
        let normalized = normalize_field(json!({"name": "Tag", "type": field_type}));
        assert_eq!(normalized, json!({
            "name": "Tag",
            "type": field_type,
            "options": {"choices": []},
        }));
    }
}

#[test]
fn date_without_options_gets_local_format() {
    let normalized = normalize_field(json!({"name": "Due", "type": "date"}));
    assert_eq!(normalized, json!({
        "name": "Due",
        "type": "date",
        "options": {"dateFormat": {"name": "local"}},
    }));
}

#[test]
fn null_options_count_as_absent() {
    let normalized = normalize_field(json!({"name": "Count", "type": "number", "options": null}));
    assert_eq!(normalized, json!({
        "name": "Count",
        "type": "number",
        "options": {"precision": 0},
    }));
}

#[test]
fn compatible_options_pass_through_unchanged() {
    let field = json!({
        "name": "Score",
        "type": "number",
        "options": {"precision": 3},
    });
    assert_eq!(normalize_field(field.clone()), field);
}

#[test]
fn unknown_types_pass_through_untouched() {
    let field = json!({
        "name": "Link",
        "type": "multipleRecordLinks",
        "options": {"linkedTableId": "tbl1"},
    });
    assert_eq!(normalize_field(field.clone()), field);
}

#[test]
fn non_object_payloads_pass_through() {
    assert_eq!(normalize_field(json!("raw")), json!("raw"));
}

#[test]
fn option_requirements_partition_known_types() {
    assert!(FieldType::Number.requires_options());
    assert!(FieldType::Date.requires_options());
    assert!(!FieldType::Email.requires_options());
    assert!(!FieldType::Checkbox.requires_options());
    assert!(FieldType::Email.default_options().is_none());
}
