// crates/airtable-gate-core/src/tooling.rs
// ============================================================================
// Module: Tooling Identifiers
// Description: Canonical MCP tool identifiers for Airtable Gate.
// Purpose: Shared tool naming across contracts, routing, and gating.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Canonical tool identifiers used by Airtable Gate MCP.
//! These names are part of the external contract surface. Tools are
//! partitioned into a restricted subset that participates in the per-session
//! repeat-action gate and an unrestricted remainder that always dispatches.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Canonical tool names for Airtable Gate MCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// List all accessible bases.
    ListBases,
    /// List all tables in a base.
    ListTables,
    /// Create a new table in a base.
    CreateTable,
    /// Update a table's schema.
    UpdateTable,
    /// Create a new field in a table.
    CreateField,
    /// Update a field in a table.
    UpdateField,
    /// List records in a table.
    ListRecords,
    /// Create a new record in a table.
    CreateRecord,
    /// Update an existing record in a table.
    UpdateRecord,
    /// Delete a record from a table.
    DeleteRecord,
    /// Search for records in a table.
    SearchRecords,
    /// Fetch a single record by its identifier.
    GetRecord,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListBases => "list_bases",
            Self::ListTables => "list_tables",
            Self::CreateTable => "create_table",
            Self::UpdateTable => "update_table",
            Self::CreateField => "create_field",
            Self::UpdateField => "update_field",
            Self::ListRecords => "list_records",
            Self::CreateRecord => "create_record",
            Self::UpdateRecord => "update_record",
            Self::DeleteRecord => "delete_record",
            Self::SearchRecords => "search_records",
            Self::GetRecord => "get_record",
        }
    }

    /// Returns all Airtable Gate tool names in canonical catalog order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ListBases,
            Self::ListTables,
            Self::CreateTable,
            Self::UpdateTable,
            Self::CreateField,
            Self::UpdateField,
            Self::ListRecords,
            Self::CreateRecord,
            Self::UpdateRecord,
            Self::DeleteRecord,
            Self::SearchRecords,
            Self::GetRecord,
        ]
    }

    /// Parses a tool name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "list_bases" => Some(Self::ListBases),
            "list_tables" => Some(Self::ListTables),
            "create_table" => Some(Self::CreateTable),
            "update_table" => Some(Self::UpdateTable),
            "create_field" => Some(Self::CreateField),
            "update_field" => Some(Self::UpdateField),
            "list_records" => Some(Self::ListRecords),
            "create_record" => Some(Self::CreateRecord),
            "update_record" => Some(Self::UpdateRecord),
            "delete_record" => Some(Self::DeleteRecord),
            "search_records" => Some(Self::SearchRecords),
            "get_record" => Some(Self::GetRecord),
            _ => None,
        }
    }

    /// Returns true when the tool participates in the per-session
    /// repeat-action gate.
    ///
    /// Mutating and data-returning tools are restricted; schema and metadata
    /// tools dispatch unconditionally.
    #[must_use]
    pub const fn is_restricted(self) -> bool {
        match self {
            Self::CreateRecord
            | Self::DeleteRecord
            | Self::UpdateRecord
            | Self::ListRecords
            | Self::GetRecord
            | Self::SearchRecords
            | Self::CreateField
            | Self::UpdateField => true,
            Self::ListBases | Self::ListTables | Self::CreateTable | Self::UpdateTable => false,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
