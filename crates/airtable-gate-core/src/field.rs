// crates/airtable-gate-core/src/field.rs
// ============================================================================
// Module: Field Normalization
// Description: Normalization of field-definition payloads for schema tools.
// Purpose: Strip or default field options before upstream submission.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Field definitions submitted through `create_table` and `create_field`
//! carry a `type` and optional `options`. The upstream rejects options on
//! types that take none and rejects option-typed fields without options, so
//! payloads are normalized before submission: options are stripped where the
//! type takes none, a fixed per-type default is injected where the type
//! requires them, and everything else passes through unchanged. Unknown type
//! strings pass through untouched; the upstream is the authority on those.

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// Field types recognized by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Single-line text field.
    SingleLineText,
    /// Multi-line text field.
    MultilineText,
    /// Numeric field.
    Number,
    /// Single-select field.
    SingleSelect,
    /// Multi-select field.
    MultiSelect,
    /// Date field.
    Date,
    /// Checkbox field.
    Checkbox,
    /// Email address field.
    Email,
    /// Phone number field.
    PhoneNumber,
    /// Currency field.
    Currency,
}

impl FieldType {
    /// Parses an upstream field type string.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "singleLineText" => Some(Self::SingleLineText),
            "multilineText" => Some(Self::MultilineText),
            "number" => Some(Self::Number),
            "singleSelect" => Some(Self::SingleSelect),
            "multiSelect" => Some(Self::MultiSelect),
            "date" => Some(Self::Date),
            "checkbox" => Some(Self::Checkbox),
            "email" => Some(Self::Email),
            "phoneNumber" => Some(Self::PhoneNumber),
            "currency" => Some(Self::Currency),
            _ => None,
        }
    }

    /// Returns true when the upstream requires an options payload for this
    /// type.
    #[must_use]
    pub const fn requires_options(self) -> bool {
        match self {
            Self::Number | Self::SingleSelect | Self::MultiSelect | Self::Date | Self::Currency => {
                true
            }
            Self::SingleLineText
            | Self::MultilineText
            | Self::Checkbox
            | Self::Email
            | Self::PhoneNumber => false,
        }
    }

    /// Returns the fixed default options injected when the type requires
    /// options but the caller supplied none.
    #[must_use]
    pub fn default_options(self) -> Option<Value> {
        match self {
            Self::Number => Some(json!({"precision": 0})),
            Self::Currency => Some(json!({"precision": 2, "symbol": "$"})),
            Self::SingleSelect | Self::MultiSelect => Some(json!({"choices": []})),
            Self::Date => Some(json!({"dateFormat": {"name": "local"}})),
            Self::SingleLineText
            | Self::MultilineText
            | Self::Checkbox
            | Self::Email
            | Self::PhoneNumber => None,
        }
    }
}

/// Normalizes one field-definition payload.
///
/// Non-object payloads and unknown field types are returned unchanged. A
/// `null` options value counts as absent.
#[must_use]
pub fn normalize_field(field: Value) -> Value {
    let Value::Object(mut entries) = field else {
        return field;
    };
    let field_type = entries.get("type").and_then(Value::as_str).and_then(FieldType::parse);
    match field_type {
        Some(field_type) if !field_type.requires_options() => {
            entries.remove("options");
        }
        Some(field_type) if options_missing(&entries) => {
            if let Some(defaults) = field_type.default_options() {
                entries.insert("options".to_string(), defaults);
            }
        }
        _ => {}
    }
    Value::Object(entries)
}

/// Returns true when the payload carries no usable options value.
fn options_missing(entries: &Map<String, Value>) -> bool {
    matches!(entries.get("options"), None | Some(Value::Null))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
