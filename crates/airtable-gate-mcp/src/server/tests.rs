// crates/airtable-gate-mcp/src/server/tests.rs
// ============================================================================
// Module: MCP Server Unit Tests
// Description: Unit tests for framing, envelope shape, and JSON-RPC mapping.
// Purpose: Validate server behavior with in-memory fixtures.
// Dependencies: airtable-gate-mcp, tokio
// ============================================================================

//! ## Overview
//! Exercises stdio framing limits, the text envelope shape, and the JSON-RPC
//! error code mapping with in-memory fixtures.

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
    reason = "Test-only framing assertions."
)]

use std::io::BufReader;
use std::io::Cursor;
use std::sync::Arc;

use airtable_gate_core::SessionRegistry;
use axum::http::StatusCode;
use serde_json::Value;
use serde_json::json;

use super::JsonRpcRequest;
use super::ToolContent;
use super::handle_request;
use super::jsonrpc_error;
use super::read_framed;
use super::write_framed;
use crate::audit::NoopGateAuditSink;
use crate::config::UpstreamConfig;
use crate::tools::ToolError;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Builds a router against an endpoint nothing listens on.
fn sample_router() -> ToolRouter {
    let upstream = UpstreamConfig {
        base_url: "http://127.0.0.1:9/v0".to_string(),
        ..UpstreamConfig::default()
    };
    ToolRouter::new(Arc::new(SessionRegistry::new()), upstream, Arc::new(NoopGateAuditSink))
}

/// Builds a JSON-RPC request payload.
fn request(method: &str, params: Value) -> JsonRpcRequest {
    serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    }))
    .expect("request decodes")
}

// ============================================================================
// SECTION: Framing
// ============================================================================

#[test]
fn read_framed_rejects_payload_over_limit() {
    let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let framed =
        format!("Content-Length: {}\r\n\r\n{}", payload.len(), String::from_utf8_lossy(payload));
    let mut reader = BufReader::new(Cursor::new(framed.into_bytes()));
    let result = read_framed(&mut reader, payload.len() - 1);
    assert!(result.is_err());
}

#[test]
fn read_framed_accepts_payload_at_limit() {
    let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let framed =
        format!("Content-Length: {}\r\n\r\n{}", payload.len(), String::from_utf8_lossy(payload));
    let mut reader = BufReader::new(Cursor::new(framed.into_bytes()));
    let result = read_framed(&mut reader, payload.len());
    assert!(result.is_ok());
    let bytes = result.expect("payload read");
    assert_eq!(bytes, payload);
}

#[test]
fn read_framed_requires_a_content_length_header() {
    let mut reader = BufReader::new(Cursor::new(b"\r\n".to_vec()));
    assert!(read_framed(&mut reader, 1024).is_err());
}

#[test]
fn framing_round_trips() {
    let payload = br#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#;
    let mut framed = Vec::new();
    write_framed(&mut framed, payload).expect("payload written");
    let mut reader = BufReader::new(Cursor::new(framed));
    let bytes = read_framed(&mut reader, 1024).expect("payload read");
    assert_eq!(bytes, payload);
}

// ============================================================================
// SECTION: Envelope Shape
// ============================================================================

#[test]
fn text_content_serializes_with_type_tag() {
    let content = ToolContent::Text {
        text: "hello".to_string(),
    };
    let encoded = serde_json::to_value(&content).expect("content serializes");
    assert_eq!(encoded, json!({"type": "text", "text": "hello"}));
}

#[test]
fn jsonrpc_error_codes_match_the_taxonomy() {
    let (status, response) =
        jsonrpc_error(json!(1), &ToolError::UnknownTool("drop_table".to_string()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.as_ref().map(|err| err.code), Some(-32601));

    let (status, response) =
        jsonrpc_error(json!(1), &ToolError::InvalidParams("missing".to_string()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.as_ref().map(|err| err.code), Some(-32602));

    let (status, response) = jsonrpc_error(json!(1), &ToolError::Serialization);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.error.as_ref().map(|err| err.code), Some(-32060));
}

// ============================================================================
// SECTION: Request Handling
// ============================================================================

#[tokio::test]
async fn rejects_wrong_jsonrpc_version() {
    let router = sample_router();
    let request: JsonRpcRequest = serde_json::from_value(json!({
        "jsonrpc": "1.0",
        "id": 1,
        "method": "tools/list",
    }))
    .expect("request decodes");
    let (status, response) = handle_request(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.as_ref().map(|err| err.code), Some(-32600));
}

#[tokio::test]
async fn unsupported_methods_fail_with_method_not_found() {
    let router = sample_router();
    let (status, response) = handle_request(&router, request("resources/list", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.as_ref().map(|err| err.code), Some(-32601));
}

#[tokio::test]
async fn tools_list_returns_the_full_catalog() {
    let router = sample_router();
    let (status, response) = handle_request(&router, request("tools/list", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let result = response.result.expect("result payload");
    let tools = result["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 12);
    assert_eq!(tools[0]["name"], json!("list_bases"));
}

#[tokio::test]
async fn unknown_tool_calls_fail_with_method_not_found() {
    let router = sample_router();
    let params = json!({"name": "drop_table", "arguments": {}});
    let (status, response) = handle_request(&router, request("tools/call", params)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.as_ref().map(|err| err.code), Some(-32601));
}

#[tokio::test]
async fn first_call_returns_the_welcome_envelope() {
    let router = sample_router();
    let params = json!({
        "name": "create_record",
        "arguments": {"fields": {"Name": "x"}},
        "_meta": {"session_id": "s1"},
    });
    let (status, response) = handle_request(&router, request("tools/call", params)).await;
    assert_eq!(status, StatusCode::OK);
    let result = response.result.expect("result payload");
    let text = result["content"][0]["text"].as_str().expect("text content");
    assert!(text.contains("Airtable account"));
    assert_eq!(result["content"][0]["type"], json!("text"));
}

#[tokio::test]
async fn missing_credentials_surface_as_invalid_params() {
    let router = sample_router();
    let meta = json!({"session_id": "s1"});
    let first = json!({"name": "list_bases", "arguments": {}, "_meta": meta});
    let _ = handle_request(&router, request("tools/call", first.clone())).await;
    let (status, response) = handle_request(&router, request("tools/call", first)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.as_ref().map(|err| err.code), Some(-32602));
}

#[tokio::test]
async fn malformed_call_params_are_rejected() {
    let router = sample_router();
    let (status, response) =
        handle_request(&router, request("tools/call", json!({"arguments": {}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.as_ref().map(|err| err.code), Some(-32602));
}
