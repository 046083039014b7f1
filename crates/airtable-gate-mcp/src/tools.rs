// crates/airtable-gate-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Router
// Description: Gated tool routing for the Airtable Gate MCP server.
// Purpose: Wrap every routed action with the welcome, credential, and
//          repeat-action gates, then dispatch through a command table.
// Dependencies: airtable-gate-core, airtable-gate-contract, serde_json
// ============================================================================

//! ## Overview
//! The tool router owns the per-call control flow: session key resolution,
//! welcome short-circuit, fail-closed credential resolution, the
//! repeat-action throttle for restricted tools, and command-table dispatch
//! to the upstream client. Failures downstream of "we attempted the action"
//! are normalized into payload text; protocol errors are reserved for
//! malformed use of the interface.
//!
//! ## Invariants
//! - Unknown tool names fail before any session or credential handling.
//! - The welcome gate runs strictly before credential resolution.
//! - Credentials resolve before the throttle gate; a malformed-credentials
//!   call on a repeat invocation therefore never reaches the block check.
//! - A blocked call never constructs an upstream client.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use airtable_gate_contract::ToolDefinition;
use airtable_gate_contract::tool_definitions;
use airtable_gate_core::ActionThrottle;
use airtable_gate_core::CallOutcome;
use airtable_gate_core::SessionKey;
use airtable_gate_core::SessionRegistry;
use airtable_gate_core::ThrottleDecision;
use airtable_gate_core::ToolName;
use airtable_gate_core::WelcomeGate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::audit::GateAuditEvent;
use crate::audit::GateAuditSink;
use crate::config::UpstreamConfig;
use crate::credentials::Credentials;
use crate::upstream::UpstreamClient;
use crate::upstream::UpstreamError;
use crate::upstream::normalize_error;

// ============================================================================
// SECTION: Call Envelope
// ============================================================================

/// One `tools/call` invocation as seen by the router.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Requested tool name, not yet validated.
    pub name: String,
    /// Raw tool arguments.
    pub arguments: Value,
    /// Caller-supplied `_meta` payload carrying session identity.
    pub meta: Option<Value>,
    /// Caller-supplied `selected_server_credentials` payload.
    pub credentials: Option<Value>,
}

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Tool router for MCP requests.
pub struct ToolRouter {
    /// Session registry shared for the server's lifetime.
    sessions: Arc<SessionRegistry>,
    /// Upstream endpoint configuration applied to per-call clients.
    upstream: UpstreamConfig,
    /// Audit sink for gate decisions.
    audit: Arc<dyn GateAuditSink>,
}

impl ToolRouter {
    /// Creates a new tool router.
    #[must_use]
    pub fn new(
        sessions: Arc<SessionRegistry>,
        upstream: UpstreamConfig,
        audit: Arc<dyn GateAuditSink>,
    ) -> Self {
        Self {
            sessions,
            upstream,
            audit,
        }
    }

    /// Lists the MCP tools supported by this server.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Handles one gated tool call.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] for protocol-level failures only: unknown tool
    /// names, missing credentials, undecodable arguments, and result
    /// serialization. Everything else resolves to a [`CallOutcome`].
    pub async fn handle_tool_call(&self, call: ToolCall) -> Result<CallOutcome, ToolError> {
        let tool =
            ToolName::parse(&call.name).ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;
        let session = SessionKey::resolve(call.meta.as_ref());
        if WelcomeGate::intercept(&self.sessions, &session) {
            self.audit.record(&GateAuditEvent::welcome(&session));
            return Ok(CallOutcome::Welcome);
        }
        let credentials = Credentials::resolve(call.credentials.as_ref())
            .map_err(|err| ToolError::InvalidParams(err.to_string()))?;
        let route = route(tool);
        if route.restricted {
            let args_text = serialize_arguments(&call.arguments);
            match ActionThrottle::evaluate(&self.sessions, &session, tool, &args_text) {
                ThrottleDecision::Blocked => {
                    self.audit.record(&GateAuditEvent::blocked(&session, tool));
                    return Ok(CallOutcome::Blocked(tool));
                }
                ThrottleDecision::OverrideGranted => {
                    self.audit.record(&GateAuditEvent::override_granted(&session, tool));
                }
                ThrottleDecision::Unrestricted | ThrottleDecision::FirstUse => {}
            }
        }
        let client = match UpstreamClient::for_credentials(&self.upstream, &credentials) {
            Ok(client) => client,
            Err(error) => return Ok(self.normalize(&session, tool, &error)),
        };
        match (route.dispatch)(&client, call.arguments).await {
            Ok(payload) => {
                let text = serde_json::to_string_pretty(&payload)
                    .map_err(|_| ToolError::Serialization)?;
                Ok(CallOutcome::Success(text))
            }
            Err(DispatchError::InvalidArgs(message)) => Err(ToolError::InvalidParams(message)),
            Err(DispatchError::Upstream(error)) => Ok(self.normalize(&session, tool, &error)),
        }
    }

    /// Converts an upstream failure into payload text and records it.
    fn normalize(&self, session: &SessionKey, tool: ToolName, error: &UpstreamError) -> CallOutcome {
        let detail = normalize_error(error);
        self.audit.record(&GateAuditEvent::upstream_error(session, tool, &detail));
        CallOutcome::Upstream(detail)
    }
}

/// Serializes the raw arguments for override-phrase scanning.
fn serialize_arguments(arguments: &Value) -> String {
    serde_json::to_string(arguments).unwrap_or_default()
}

// ============================================================================
// SECTION: Command Table
// ============================================================================

/// Future type produced by route dispatch functions.
type DispatchFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, DispatchError>> + Send + 'a>>;

/// Dispatch function binding a tool to its single upstream operation.
type DispatchFn = for<'a> fn(&'a UpstreamClient, Value) -> DispatchFuture<'a>;

/// Handler descriptor for one routed tool.
struct ActionRoute {
    /// Whether the repeat-action gate applies to this tool.
    restricted: bool,
    /// Upstream operation invoked with the call's raw arguments.
    dispatch: DispatchFn,
}

/// Builds the route descriptor for a tool.
fn route(tool: ToolName) -> ActionRoute {
    ActionRoute {
        restricted: tool.is_restricted(),
        dispatch: dispatch_fn(tool),
    }
}

/// Maps each tool to its dispatch function.
fn dispatch_fn(tool: ToolName) -> DispatchFn {
    match tool {
        ToolName::ListBases => |client, args| Box::pin(dispatch_list_bases(client, args)),
        ToolName::ListTables => |client, args| Box::pin(dispatch_list_tables(client, args)),
        ToolName::CreateTable => |client, args| Box::pin(dispatch_create_table(client, args)),
        ToolName::UpdateTable => |client, args| Box::pin(dispatch_update_table(client, args)),
        ToolName::CreateField => |client, args| Box::pin(dispatch_create_field(client, args)),
        ToolName::UpdateField => |client, args| Box::pin(dispatch_update_field(client, args)),
        ToolName::ListRecords => |client, args| Box::pin(dispatch_list_records(client, args)),
        ToolName::CreateRecord => |client, args| Box::pin(dispatch_create_record(client, args)),
        ToolName::UpdateRecord => |client, args| Box::pin(dispatch_update_record(client, args)),
        ToolName::DeleteRecord => |client, args| Box::pin(dispatch_delete_record(client, args)),
        ToolName::SearchRecords => |client, args| Box::pin(dispatch_search_records(client, args)),
        ToolName::GetRecord => |client, args| Box::pin(dispatch_get_record(client, args)),
    }
}

/// Decodes a typed argument payload or fails with invalid params.
fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, DispatchError> {
    serde_json::from_value(payload).map_err(|err| DispatchError::InvalidArgs(err.to_string()))
}

// ============================================================================
// SECTION: Argument Types
// ============================================================================

/// Arguments for `list_tables`.
#[derive(Debug, Deserialize)]
struct ListTablesArgs {
    /// Base identifier.
    base_id: String,
}

/// Arguments for `create_table`.
#[derive(Debug, Deserialize)]
struct CreateTableArgs {
    /// Base identifier.
    base_id: String,
    /// Name of the new table.
    table_name: String,
    /// Optional table description.
    #[serde(default)]
    description: Option<String>,
    /// Optional initial field definitions.
    #[serde(default)]
    fields: Option<Vec<Value>>,
}

/// Arguments for `update_table`.
#[derive(Debug, Deserialize)]
struct UpdateTableArgs {
    /// Base identifier.
    base_id: String,
    /// Table identifier.
    table_id: String,
    /// Optional new table name.
    #[serde(default)]
    name: Option<String>,
    /// Optional new table description.
    #[serde(default)]
    description: Option<String>,
}

/// Arguments for `create_field`.
#[derive(Debug, Deserialize)]
struct CreateFieldArgs {
    /// Base identifier.
    base_id: String,
    /// Table identifier.
    table_id: String,
    /// Field definition payload.
    field: Value,
}

/// Arguments for `update_field`.
#[derive(Debug, Deserialize)]
struct UpdateFieldArgs {
    /// Base identifier.
    base_id: String,
    /// Table identifier.
    table_id: String,
    /// Field identifier.
    field_id: String,
    /// Field update payload.
    updates: Value,
}

/// Arguments for `list_records`.
#[derive(Debug, Deserialize)]
struct ListRecordsArgs {
    /// Base identifier.
    base_id: String,
    /// Table name.
    table_name: String,
    /// Optional record count limit.
    #[serde(default)]
    max_records: Option<u64>,
}

/// Arguments for `create_record`.
#[derive(Debug, Deserialize)]
struct CreateRecordArgs {
    /// Base identifier.
    base_id: String,
    /// Table name.
    table_name: String,
    /// Record fields as key-value pairs.
    fields: Value,
}

/// Arguments for `update_record`.
#[derive(Debug, Deserialize)]
struct UpdateRecordArgs {
    /// Base identifier.
    base_id: String,
    /// Table name.
    table_name: String,
    /// Record identifier.
    record_id: String,
    /// Record fields to update.
    fields: Value,
}

/// Arguments for `delete_record`.
#[derive(Debug, Deserialize)]
struct DeleteRecordArgs {
    /// Base identifier.
    base_id: String,
    /// Table name.
    table_name: String,
    /// Record identifier.
    record_id: String,
}

/// Arguments for `search_records`.
#[derive(Debug, Deserialize)]
struct SearchRecordsArgs {
    /// Base identifier.
    base_id: String,
    /// Table name.
    table_name: String,
    /// Field to search in.
    field_name: String,
    /// Exact value to search for.
    value: String,
}

/// Arguments for `get_record`.
#[derive(Debug, Deserialize)]
struct GetRecordArgs {
    /// Base identifier.
    base_id: String,
    /// Table name.
    table_name: String,
    /// Record identifier.
    record_id: String,
}

// ============================================================================
// SECTION: Dispatch Functions
// ============================================================================

/// Routes `list_bases` to the upstream bases listing.
async fn dispatch_list_bases(
    client: &UpstreamClient,
    _args: Value,
) -> Result<Value, DispatchError> {
    Ok(client.list_bases().await?)
}

/// Routes `list_tables` to the upstream tables listing.
async fn dispatch_list_tables(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: ListTablesArgs = decode(args)?;
    Ok(client.list_tables(&args.base_id).await?)
}

/// Routes `create_table` to the upstream table creation.
async fn dispatch_create_table(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: CreateTableArgs = decode(args)?;
    Ok(client
        .create_table(&args.base_id, &args.table_name, args.description.as_deref(), args.fields)
        .await?)
}

/// Routes `update_table` to the upstream table update.
async fn dispatch_update_table(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: UpdateTableArgs = decode(args)?;
    Ok(client
        .update_table(&args.base_id, &args.table_id, args.name.as_deref(), args.description.as_deref())
        .await?)
}

/// Routes `create_field` to the upstream field creation.
async fn dispatch_create_field(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: CreateFieldArgs = decode(args)?;
    Ok(client.create_field(&args.base_id, &args.table_id, args.field).await?)
}

/// Routes `update_field` to the upstream field update.
async fn dispatch_update_field(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: UpdateFieldArgs = decode(args)?;
    Ok(client.update_field(&args.base_id, &args.table_id, &args.field_id, &args.updates).await?)
}

/// Routes `list_records` to the upstream record listing.
async fn dispatch_list_records(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: ListRecordsArgs = decode(args)?;
    Ok(client.list_records(&args.base_id, &args.table_name, args.max_records).await?)
}

/// Routes `create_record` to the upstream record creation.
async fn dispatch_create_record(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: CreateRecordArgs = decode(args)?;
    Ok(client.create_record(&args.base_id, &args.table_name, &args.fields).await?)
}

/// Routes `update_record` to the upstream record update.
async fn dispatch_update_record(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: UpdateRecordArgs = decode(args)?;
    Ok(client
        .update_record(&args.base_id, &args.table_name, &args.record_id, &args.fields)
        .await?)
}

/// Routes `delete_record` to the upstream record deletion.
async fn dispatch_delete_record(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: DeleteRecordArgs = decode(args)?;
    Ok(client.delete_record(&args.base_id, &args.table_name, &args.record_id).await?)
}

/// Routes `search_records` to the upstream filtered listing.
async fn dispatch_search_records(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: SearchRecordsArgs = decode(args)?;
    Ok(client
        .search_records(&args.base_id, &args.table_name, &args.field_name, &args.value)
        .await?)
}

/// Routes `get_record` to the upstream record fetch.
async fn dispatch_get_record(
    client: &UpstreamClient,
    args: Value,
) -> Result<Value, DispatchError> {
    let args: GetRecordArgs = decode(args)?;
    Ok(client.get_record(&args.base_id, &args.table_name, &args.record_id).await?)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Dispatch-boundary failures.
#[derive(Debug, Error)]
enum DispatchError {
    /// Arguments failed typed decoding.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    /// The upstream call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Protocol-level tool call failures.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Unrecognized tool name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    /// Credentials missing or arguments undecodable.
    #[error("{0}")]
    InvalidParams(String),
    /// Result payload could not be serialized.
    #[error("serialization failed")]
    Serialization,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
