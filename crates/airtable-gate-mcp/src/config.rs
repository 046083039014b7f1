// crates/airtable-gate-mcp/src/config.rs
// ============================================================================
// Module: Airtable Gate Configuration
// Description: Configuration loading and validation for Airtable Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. A
//! missing file falls back to built-in defaults; an invalid file fails
//! closed. Validation runs before the server starts so transport and
//! upstream settings are known good for the life of the process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "airtable-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "AIRTABLE_GATE_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Default maximum JSON-RPC request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Maximum allowed JSON-RPC request body size in bytes.
const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
/// Default upstream API base URL.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.airtable.com/v0";
/// Default upstream connect timeout in milliseconds.
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1_000;
/// Default upstream request timeout in milliseconds.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Minimum upstream connect timeout in milliseconds.
const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum upstream connect timeout in milliseconds.
const MAX_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Minimum upstream request timeout in milliseconds.
const MIN_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum upstream request timeout in milliseconds.
const MAX_REQUEST_TIMEOUT_MS: u64 = 60_000;
/// Default maximum upstream response size in bytes.
const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum allowed upstream response size in bytes.
const MAX_MAX_RESPONSE_BYTES: usize = 32 * 1024 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Transports supported by the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerTransport {
    /// JSON-RPC over stdin/stdout with Content-Length framing.
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

/// Server transport and request limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Transport used to serve requests.
    #[serde(default = "default_transport")]
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum JSON-RPC request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            bind: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Upstream API endpoint and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Upstream API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum upstream response size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// Top-level Airtable Gate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirtableGateConfig {
    /// Server transport and limits.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream endpoint and limits.
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl AirtableGateConfig {
    /// Loads configuration from the given path, the `AIRTABLE_GATE_CONFIG`
    /// environment variable, or the default filename, in that order. When no
    /// file is present, built-in defaults are used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_config_path(path);
        let Some(resolved) = resolved else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        let metadata = fs::metadata(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file too large".to_string()));
        }
        let content = fs::read_to_string(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        let config: Self =
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, failing closed on any bad value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any setting is out of range or
    /// inconsistent with the selected transport.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_body_bytes == 0 || self.server.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid("server.max_body_bytes out of range".to_string()));
        }
        if self.server.transport == ServerTransport::Http {
            let bind = self
                .server
                .bind
                .as_deref()
                .ok_or_else(|| ConfigError::Invalid("http transport requires server.bind".to_string()))?;
            bind.parse::<SocketAddr>()
                .map_err(|_| ConfigError::Invalid("invalid server.bind address".to_string()))?;
        }
        let base_url = Url::parse(&self.upstream.base_url)
            .map_err(|_| ConfigError::Invalid("invalid upstream.base_url".to_string()))?;
        if base_url.scheme() != "https" && base_url.scheme() != "http" {
            return Err(ConfigError::Invalid("upstream.base_url must be http(s)".to_string()));
        }
        if self.upstream.connect_timeout_ms < MIN_CONNECT_TIMEOUT_MS
            || self.upstream.connect_timeout_ms > MAX_CONNECT_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(
                "upstream.connect_timeout_ms out of range".to_string(),
            ));
        }
        if self.upstream.request_timeout_ms < MIN_REQUEST_TIMEOUT_MS
            || self.upstream.request_timeout_ms > MAX_REQUEST_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(
                "upstream.request_timeout_ms out of range".to_string(),
            ));
        }
        if self.upstream.max_response_bytes == 0
            || self.upstream.max_response_bytes > MAX_MAX_RESPONSE_BYTES
        {
            return Err(ConfigError::Invalid(
                "upstream.max_response_bytes out of range".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the effective config path, if any file should be read.
fn resolve_config_path(path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = path {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = env::var(CONFIG_ENV_VAR)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    default.exists().then_some(default)
}

/// Default transport used when none is configured.
const fn default_transport() -> ServerTransport {
    ServerTransport::Stdio
}

/// Default maximum request body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default upstream base URL.
fn default_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

/// Default upstream connect timeout.
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Default upstream request timeout.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Default upstream response size limit.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem errors while reading the config file.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse errors.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Semantic validation errors.
    #[error("config error: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
