// crates/airtable-gate-mcp/tests/common/mod.rs
// ============================================================================
// Module: Integration Test Helpers
// Description: Shared fixtures for router integration tests.
// Purpose: Provide a canned local upstream and router construction.
// Dependencies: airtable-gate-mcp, tiny_http
// ============================================================================

//! ## Overview
//! Spawns a local HTTP server that answers a fixed sequence of canned
//! responses and records what the router actually sent, so gate behavior can
//! be asserted end to end without the real upstream.

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
    dead_code,
    reason = "Test-only helpers; not every test file uses every helper."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use airtable_gate_core::SessionRegistry;
use airtable_gate_mcp::NoopGateAuditSink;
use airtable_gate_mcp::ToolCall;
use airtable_gate_mcp::ToolRouter;
use airtable_gate_mcp::UpstreamConfig;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// One request observed by the fake upstream.
pub struct RecordedRequest {
    /// HTTP method as sent.
    pub method: String,
    /// Request URL including query string.
    pub url: String,
    /// Authorization header value when present.
    pub authorization: Option<String>,
}

/// Local stand-in for the upstream API.
pub struct FakeUpstream {
    /// Base URL the router should be pointed at.
    pub base_url: String,
    /// Requests observed so far.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Server thread handle, held for the fixture's lifetime.
    _handle: thread::JoinHandle<()>,
}

impl FakeUpstream {
    /// Spawns a server answering the given `(status, body)` sequence in
    /// order, then exiting.
    pub fn spawn(responses: Vec<(u16, String)>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("fake upstream binds");
        let addr = server.server_addr().to_ip().expect("fake upstream address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let Ok(request) = server.recv() else {
                    break;
                };
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_string());
                recorded.lock().expect("requests lock").push(RecordedRequest {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    authorization,
                });
                let content_type =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("header builds");
                let response =
                    Response::from_string(body).with_status_code(status).with_header(content_type);
                let _ = request.respond(response);
            }
        });
        Self {
            base_url: format!("http://{addr}/v0"),
            requests,
            _handle: handle,
        }
    }

    /// Drains and returns the requests observed so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        let mut observed = self.requests.lock().expect("requests lock");
        observed.drain(..).collect()
    }
}

/// Builds a router against the given upstream plus its registry handle.
pub fn router_for(base_url: &str, max_response_bytes: usize) -> (ToolRouter, Arc<SessionRegistry>) {
    let sessions = Arc::new(SessionRegistry::new());
    let upstream = UpstreamConfig {
        base_url: base_url.to_string(),
        max_response_bytes,
        ..UpstreamConfig::default()
    };
    let router = ToolRouter::new(Arc::clone(&sessions), upstream, Arc::new(NoopGateAuditSink));
    (router, sessions)
}

/// Builds a call envelope for session `s1` with standard credentials.
pub fn call(name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        name: name.to_string(),
        arguments,
        meta: Some(json!({"session_id": "s1"})),
        credentials: Some(json!({"AIRTABLE": {"base_id": "app123", "api_key": "key123"}})),
    }
}
