// crates/airtable-gate-mcp/src/credentials.rs
// ============================================================================
// Module: Credential Resolution
// Description: Per-request upstream credential extraction.
// Purpose: Resolve Airtable credentials fail-closed before any upstream I/O.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Callers supply upstream credentials per call under the `AIRTABLE`
//! namespace of `selected_server_credentials`. Resolution happens before the
//! repeat-action gate mutates state and before any network attempt; a
//! missing or empty value fails the call with invalid params. Credentials
//! live only for the single in-flight request and are never stored in
//! session state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Credentials namespace probed in `selected_server_credentials`.
pub const CREDENTIALS_NAMESPACE: &str = "AIRTABLE";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Upstream credential bundle scoped to one in-flight request.
#[derive(Clone)]
pub struct Credentials {
    /// Base identifier supplied by the caller.
    pub base_id: String,
    /// API key used as the upstream bearer token.
    pub api_key: String,
}

impl Credentials {
    /// Resolves credentials from the call's `selected_server_credentials`
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Missing`] when the namespace, `base_id`,
    /// or `api_key` is absent or empty.
    pub fn resolve(credentials_context: Option<&Value>) -> Result<Self, CredentialError> {
        let namespace = credentials_context
            .and_then(|context| context.get(CREDENTIALS_NAMESPACE))
            .ok_or(CredentialError::Missing)?;
        let base_id = non_empty_member(namespace, "base_id").ok_or(CredentialError::Missing)?;
        let api_key = non_empty_member(namespace, "api_key").ok_or(CredentialError::Missing)?;
        Ok(Self {
            base_id,
            api_key,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The api_key never reaches logs or debug output.
        formatter
            .debug_struct("Credentials")
            .field("base_id", &self.base_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Extracts a non-empty string member from a credentials namespace.
fn non_empty_member(namespace: &Value, key: &str) -> Option<String> {
    namespace
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Credential resolution errors.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// One or both credential members are absent or empty.
    #[error(
        "Missing Airtable credentials (base_id or api_key). Provide them in \
         selected_server_credentials.AIRTABLE."
    )]
    Missing,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
