// crates/airtable-gate-mcp/src/upstream.rs
// ============================================================================
// Module: Upstream Airtable Client
// Description: Per-request HTTP client for the Airtable REST API.
// Purpose: Route each tool to exactly one upstream call with strict limits.
// Dependencies: airtable-gate-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! The upstream client is built fresh for every call from the request's
//! credentials; nothing is cached across sessions. Each operation performs a
//! single HTTP request against the configured base URL and returns the
//! upstream payload verbatim. Responses are size-limited and send errors are
//! mapped to stable messages so the error normalizer stays deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use airtable_gate_core::normalize_field;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::credentials::Credentials;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum bytes of an upstream error body preserved in normalized text.
const MAX_ERROR_DETAIL_BYTES: usize = 2048;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Upstream HTTP client scoped to one in-flight request.
pub struct UpstreamClient {
    /// HTTP client carrying the caller's bearer token.
    http: Client,
    /// Upstream API base URL.
    base_url: Url,
    /// Maximum accepted response size in bytes.
    max_response_bytes: usize,
}

impl UpstreamClient {
    /// Builds a client for one request from the resolved credentials.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the credentials or configuration
    /// cannot form a usable client.
    pub fn for_credentials(
        config: &UpstreamConfig,
        credentials: &Credentials,
    ) -> Result<Self, UpstreamError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", credentials.api_key))
            .map_err(|_| UpstreamError::Transport("invalid api key".to_string()))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|_| UpstreamError::Transport("http client build failed".to_string()))?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| UpstreamError::Transport("invalid base url".to_string()))?;
        Ok(Self {
            http,
            base_url,
            max_response_bytes: config.max_response_bytes,
        })
    }

    // ------------------------------------------------------------------
    // Schema operations
    // ------------------------------------------------------------------

    /// Lists all accessible bases.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn list_bases(&self) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&["meta", "bases"])?;
        let body = self.send(self.http.get(url)).await?;
        Ok(take_member(body, "bases"))
    }

    /// Lists all tables in a base.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn list_tables(&self, base_id: &str) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&["meta", "bases", base_id, "tables"])?;
        let body = self.send(self.http.get(url)).await?;
        Ok(take_member(body, "tables"))
    }

    /// Creates a new table in a base. Field definitions are normalized
    /// before submission.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn create_table(
        &self,
        base_id: &str,
        table_name: &str,
        description: Option<&str>,
        fields: Option<Vec<Value>>,
    ) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&["meta", "bases", base_id, "tables"])?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(table_name));
        if let Some(description) = description {
            body.insert("description".to_string(), json!(description));
        }
        if let Some(fields) = fields {
            let normalized: Vec<Value> = fields.into_iter().map(normalize_field).collect();
            body.insert("fields".to_string(), Value::Array(normalized));
        }
        self.send(self.http.post(url).json(&Value::Object(body))).await
    }

    /// Updates a table's name or description.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn update_table(
        &self,
        base_id: &str,
        table_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&["meta", "bases", base_id, "tables", table_id])?;
        let mut body = Map::new();
        if let Some(name) = name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(description) = description {
            body.insert("description".to_string(), json!(description));
        }
        self.send(self.http.patch(url).json(&Value::Object(body))).await
    }

    /// Creates a new field in a table. The definition is normalized before
    /// submission.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn create_field(
        &self,
        base_id: &str,
        table_id: &str,
        field: Value,
    ) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&["meta", "bases", base_id, "tables", table_id, "fields"])?;
        self.send(self.http.post(url).json(&normalize_field(field))).await
    }

    /// Updates a field in a table.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn update_field(
        &self,
        base_id: &str,
        table_id: &str,
        field_id: &str,
        updates: &Value,
    ) -> Result<Value, UpstreamError> {
        let url =
            self.endpoint(&["meta", "bases", base_id, "tables", table_id, "fields", field_id])?;
        self.send(self.http.patch(url).json(updates)).await
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Lists records in a table.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn list_records(
        &self,
        base_id: &str,
        table_name: &str,
        max_records: Option<u64>,
    ) -> Result<Value, UpstreamError> {
        let mut url = self.endpoint(&[base_id, table_name])?;
        if let Some(max_records) = max_records {
            url.query_pairs_mut().append_pair("maxRecords", &max_records.to_string());
        }
        let body = self.send(self.http.get(url)).await?;
        Ok(take_member(body, "records"))
    }

    /// Creates a new record in a table.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn create_record(
        &self,
        base_id: &str,
        table_name: &str,
        fields: &Value,
    ) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&[base_id, table_name])?;
        self.send(self.http.post(url).json(&json!({"fields": fields}))).await
    }

    /// Updates an existing record in a table.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn update_record(
        &self,
        base_id: &str,
        table_name: &str,
        record_id: &str,
        fields: &Value,
    ) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&[base_id, table_name, record_id])?;
        self.send(self.http.patch(url).json(&json!({"fields": fields}))).await
    }

    /// Deletes a record from a table.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn delete_record(
        &self,
        base_id: &str,
        table_name: &str,
        record_id: &str,
    ) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&[base_id, table_name, record_id])?;
        self.send(self.http.delete(url)).await
    }

    /// Searches records by exact field value.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn search_records(
        &self,
        base_id: &str,
        table_name: &str,
        field_name: &str,
        value: &str,
    ) -> Result<Value, UpstreamError> {
        let mut url = self.endpoint(&[base_id, table_name])?;
        let formula = format!("{{{field_name}}} = \"{value}\"");
        url.query_pairs_mut().append_pair("filterByFormula", &formula);
        let body = self.send(self.http.get(url)).await?;
        Ok(take_member(body, "records"))
    }

    /// Fetches a single record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the upstream call fails.
    pub async fn get_record(
        &self,
        base_id: &str,
        table_name: &str,
        record_id: &str,
    ) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&[base_id, table_name, record_id])?;
        self.send(self.http.get(url)).await
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Builds an endpoint URL from encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| UpstreamError::Transport("invalid base url".to_string()))?;
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Sends one request and decodes the JSON response under the size limit.
    async fn send(&self, request: RequestBuilder) -> Result<Value, UpstreamError> {
        let response = request.send().await.map_err(|err| map_send_error(&err))?;
        let status = response.status();
        let bytes = self.read_body(response).await?;
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                detail: error_detail(&bytes),
            });
        }
        serde_json::from_slice(&bytes).map_err(|_| UpstreamError::InvalidResponse)
    }

    /// Reads a response body enforcing the configured size limit.
    async fn read_body(&self, response: Response) -> Result<Vec<u8>, UpstreamError> {
        let max_bytes = u64::try_from(self.max_response_bytes).unwrap_or(u64::MAX);
        if let Some(length) = response.content_length()
            && length > max_bytes
        {
            return Err(UpstreamError::ResponseTooLarge);
        }
        let bytes = response.bytes().await.map_err(|err| map_send_error(&err))?;
        if bytes.len() > self.max_response_bytes {
            return Err(UpstreamError::ResponseTooLarge);
        }
        Ok(bytes.to_vec())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Takes a named member out of an upstream payload, or `null` when absent.
fn take_member(mut body: Value, key: &str) -> Value {
    body.get_mut(key).map_or(Value::Null, Value::take)
}

/// Maps reqwest send errors to stable messages.
fn map_send_error(error: &reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout
    } else if error.is_connect() {
        UpstreamError::Transport("http connection failed".to_string())
    } else {
        UpstreamError::Transport("http request failed".to_string())
    }
}

/// Renders an upstream error body for normalized text, preferring the JSON
/// structure the upstream returned.
fn error_detail(bytes: &[u8]) -> String {
    if let Ok(body) = serde_json::from_slice::<Value>(bytes)
        && let Ok(compact) = serde_json::to_string(&body)
    {
        return compact;
    }
    let text = String::from_utf8_lossy(bytes);
    let mut detail: String = text.chars().take(MAX_ERROR_DETAIL_BYTES).collect();
    if text.chars().count() > MAX_ERROR_DETAIL_BYTES {
        detail.push_str("...");
    }
    detail
}

/// Normalizes an upstream failure into payload-level text.
#[must_use]
pub fn normalize_error(error: &UpstreamError) -> String {
    format!("Airtable API error: {error}")
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Upstream call failures.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Non-success status; the upstream body is preserved when available.
    #[error("status {status}: {detail}")]
    Status {
        /// HTTP status code returned by the upstream.
        status: u16,
        /// Upstream error body or a truncated text rendering of it.
        detail: String,
    },
    /// Request timed out.
    #[error("http request timed out")]
    Timeout,
    /// Network or client-side transport failure.
    #[error("{0}")]
    Transport(String),
    /// Response exceeded the configured size limit.
    #[error("http response too large")]
    ResponseTooLarge,
    /// Successful response carried a non-JSON body.
    #[error("invalid json response")]
    InvalidResponse,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
