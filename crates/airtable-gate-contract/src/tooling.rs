// crates/airtable-gate-contract/src/tooling.rs
// ============================================================================
// Module: MCP Tool Contracts
// Description: Canonical MCP tool definitions and schemas for Airtable Gate.
// Purpose: Provide tool contracts for MCP listing and client documentation.
// Dependencies: airtable-gate-core, serde_json
// ============================================================================

//! ## Overview
//! This module defines the canonical MCP tool surface. The catalog order is
//! intentional and preserved in tool listings to keep diffs stable across
//! releases; append new tools at the end. Argument schemas describe the
//! payloads the dispatcher decodes; the upstream remains the authority on
//! field semantics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use airtable_gate_core::ToolName;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Tool definition shape used by MCP tool listings.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the canonical MCP tool definitions in catalog order.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::all().iter().map(|tool| definition(*tool)).collect()
}

/// Builds the definition for one tool.
fn definition(tool: ToolName) -> ToolDefinition {
    let (description, input_schema) = match tool {
        ToolName::ListBases => ("List all accessible Airtable bases", list_bases_schema()),
        ToolName::ListTables => ("List all tables in a base", list_tables_schema()),
        ToolName::CreateTable => ("Create a new table in a base", create_table_schema()),
        ToolName::UpdateTable => ("Update a table's schema", update_table_schema()),
        ToolName::CreateField => ("Create a new field in a table", create_field_schema()),
        ToolName::UpdateField => ("Update a field in a table", update_field_schema()),
        ToolName::ListRecords => ("List records in a table", list_records_schema()),
        ToolName::CreateRecord => ("Create a new record in a table", create_record_schema()),
        ToolName::UpdateRecord => {
            ("Update an existing record in a table", update_record_schema())
        }
        ToolName::DeleteRecord => ("Delete a record from a table", delete_record_schema()),
        ToolName::SearchRecords => ("Search for records in a table", search_records_schema()),
        ToolName::GetRecord => ("Get a single record by its ID", get_record_schema()),
    };
    ToolDefinition {
        name: tool,
        description: description.to_string(),
        input_schema,
    }
}

// ============================================================================
// SECTION: Schema Fragments
// ============================================================================

/// Schema fragment for a base identifier argument.
fn base_id_property() -> Value {
    json!({"type": "string", "description": "ID of the base"})
}

/// Schema fragment for a table name argument.
fn table_name_property() -> Value {
    json!({"type": "string", "description": "Name of the table"})
}

/// Schema fragment for a field-definition object.
fn field_object_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": {"type": "string", "description": "Name of the field"},
            "type": {
                "type": "string",
                "description": "Type of the field (e.g., singleLineText, multilineText, number, etc.)",
            },
            "description": {"type": "string", "description": "Description of the field"},
            "options": {"type": "object", "description": "Field-specific options"},
        },
        "required": ["name", "type"],
    })
}

// ============================================================================
// SECTION: Input Schemas
// ============================================================================

/// Input schema for `list_bases`.
fn list_bases_schema() -> Value {
    json!({"type": "object", "properties": {}, "required": []})
}

/// Input schema for `list_tables`.
fn list_tables_schema() -> Value {
    json!({
        "type": "object",
        "properties": {"base_id": base_id_property()},
        "required": ["base_id"],
    })
}

/// Input schema for `create_table`.
fn create_table_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_name": {"type": "string", "description": "Name of the new table"},
            "description": {"type": "string", "description": "Description of the table"},
            "fields": {
                "type": "array",
                "description": "Initial fields for the table",
                "items": field_object_schema(),
            },
        },
        "required": ["base_id", "table_name"],
    })
}

/// Input schema for `update_table`.
fn update_table_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_id": {"type": "string", "description": "ID of the table to update"},
            "name": {"type": "string", "description": "New name for the table"},
            "description": {"type": "string", "description": "New description for the table"},
        },
        "required": ["base_id", "table_id"],
    })
}

/// Input schema for `create_field`.
fn create_field_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_id": {"type": "string", "description": "ID of the table"},
            "field": field_object_schema(),
        },
        "required": ["base_id", "table_id", "field"],
    })
}

/// Input schema for `update_field`.
fn update_field_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_id": {"type": "string", "description": "ID of the table"},
            "field_id": {"type": "string", "description": "ID of the field to update"},
            "updates": {
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "New name for the field"},
                    "description": {
                        "type": "string",
                        "description": "New description for the field",
                    },
                    "options": {
                        "type": "object",
                        "description": "New field-specific options",
                    },
                },
            },
        },
        "required": ["base_id", "table_id", "field_id", "updates"],
    })
}

/// Input schema for `list_records`.
fn list_records_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_name": table_name_property(),
            "max_records": {
                "type": "number",
                "description": "Maximum number of records to return",
            },
        },
        "required": ["base_id", "table_name"],
    })
}

/// Input schema for `create_record`.
fn create_record_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_name": table_name_property(),
            "fields": {
                "type": "object",
                "description": "Record fields as key-value pairs",
            },
        },
        "required": ["base_id", "table_name", "fields"],
    })
}

/// Input schema for `update_record`.
fn update_record_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_name": table_name_property(),
            "record_id": {"type": "string", "description": "ID of the record to update"},
            "fields": {
                "type": "object",
                "description": "Record fields to update as key-value pairs",
            },
        },
        "required": ["base_id", "table_name", "record_id", "fields"],
    })
}

/// Input schema for `delete_record`.
fn delete_record_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_name": table_name_property(),
            "record_id": {"type": "string", "description": "ID of the record to delete"},
        },
        "required": ["base_id", "table_name", "record_id"],
    })
}

/// Input schema for `search_records`.
fn search_records_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_name": table_name_property(),
            "field_name": {"type": "string", "description": "Name of the field to search in"},
            "value": {"type": "string", "description": "Value to search for"},
        },
        "required": ["base_id", "table_name", "field_name", "value"],
    })
}

/// Input schema for `get_record`.
fn get_record_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "base_id": base_id_property(),
            "table_name": table_name_property(),
            "record_id": {"type": "string", "description": "ID of the record to retrieve"},
        },
        "required": ["base_id", "table_name", "record_id"],
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
