// crates/radgate-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: JSON-RPC transport surface over axum.
// Purpose: Route tools/list and tools/call into the static registry.
// Dependencies: radgate-config, radgate-upstream, axum, serde_json, tokio
// ============================================================================

//! ## Overview
//! A deliberately thin transport: one POST endpoint speaking JSON-RPC 2.0
//! (`initialize`, `ping`, `tools/list`, `tools/call`) plus a health probe.
//! The server owns no tool logic; it decodes requests, dispatches into the
//! registry, records telemetry, and wraps envelopes in MCP result framing.
//! Tool failures are normal results (`isError` on the envelope), never
//! JSON-RPC errors; JSON-RPC errors are reserved for malformed requests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use radgate_config::RadgateConfig;
use radgate_core::SystemClock;
use radgate_upstream::CasebookEndpoints;
use radgate_upstream::CredentialManager;
use radgate_upstream::Gateway;
use radgate_upstream::PartnerTokenIssuer;
use radgate_upstream::RadflowEndpoints;
use radgate_upstream::UpstreamClient;
use radgate_upstream::UpstreamClientOptions;
use radgate_upstream::partner_token_endpoint;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::telemetry::CallOutcome;
use crate::telemetry::NoopMetrics;
use crate::telemetry::ToolCallEvent;
use crate::telemetry::ToolMetrics;
use crate::tools::ToolDeps;
use crate::tools::ToolRegistry;

// ============================================================================
// SECTION: Protocol Constants
// ============================================================================

/// JSON-RPC version accepted and emitted.
pub const JSONRPC_VERSION: &str = "2.0";
/// MCP protocol revision advertised by `initialize`.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// JSON-RPC parse error code.
const PARSE_ERROR: i64 = -32700;
/// JSON-RPC invalid request code.
const INVALID_REQUEST: i64 = -32600;
/// JSON-RPC method-not-found code.
const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC invalid params code.
const INVALID_PARAMS: i64 = -32602;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Incoming JSON-RPC request, decoded leniently then validated.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// Protocol version marker; must be `"2.0"`.
    jsonrpc: Option<String>,
    /// Request identifier; absent for notifications.
    id: Option<Value>,
    /// Method name.
    method: Option<String>,
    /// Method parameters.
    params: Option<Value>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonRpcError {
    /// Standard JSON-RPC error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
}

/// Outgoing JSON-RPC response.
///
/// # Invariants
/// - Exactly one of `result` and `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    /// Always `"2.0"`.
    pub jsonrpc: &'static str,
    /// Mirrors the request identifier.
    pub id: Value,
    /// Success payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Builds a success response.
    #[must_use]
    pub const fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response.
    #[must_use]
    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared state behind the transport handlers.
pub struct ServerState {
    /// Static tool registry.
    pub registry: ToolRegistry,
    /// Telemetry sink for tool calls.
    pub metrics: Arc<dyn ToolMetrics>,
}

// ============================================================================
// SECTION: Message Handling
// ============================================================================

/// Handles one raw JSON-RPC message; `None` means a notification with no
/// response body.
pub(crate) async fn handle_message(state: &ServerState, raw: &[u8]) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_slice(raw) {
        Ok(request) => request,
        Err(err) => {
            return Some(JsonRpcResponse::failure(
                Value::Null,
                PARSE_ERROR,
                format!("parse error: {err}"),
            ));
        }
    };
    let id = request.id.unwrap_or(Value::Null);
    if request.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
        return Some(JsonRpcResponse::failure(
            id,
            INVALID_REQUEST,
            "jsonrpc version must be \"2.0\"",
        ));
    }
    let Some(method) = request.method else {
        return Some(JsonRpcResponse::failure(id, INVALID_REQUEST, "method is required"));
    };
    match method.as_str() {
        "initialize" => Some(JsonRpcResponse::success(id, initialize_result())),
        "notifications/initialized" => None,
        "ping" => Some(JsonRpcResponse::success(id, json!({}))),
        "tools/list" => Some(JsonRpcResponse::success(id, tools_list_result(&state.registry))),
        "tools/call" => {
            Some(handle_tools_call(state, id, request.params.unwrap_or(Value::Null)).await)
        }
        other => Some(JsonRpcResponse::failure(
            id,
            METHOD_NOT_FOUND,
            format!("method not found: {other}"),
        )),
    }
}

/// Builds the `initialize` result payload.
fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {"tools": {"listChanged": false}},
        "serverInfo": {"name": "radgate", "version": env!("CARGO_PKG_VERSION")}
    })
}

/// Builds the `tools/list` result payload.
fn tools_list_result(registry: &ToolRegistry) -> Value {
    let tools: Vec<Value> = registry
        .specs()
        .into_iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "description": spec.description,
                "inputSchema": spec.input_schema
            })
        })
        .collect();
    json!({"tools": tools})
}

/// Dispatches one `tools/call` request into the registry.
async fn handle_tools_call(state: &ServerState, id: Value, params: Value) -> JsonRpcResponse {
    /// Decoded `tools/call` parameters.
    #[derive(Debug, Deserialize)]
    struct CallParams {
        /// Tool name to dispatch.
        name: String,
        /// Tool argument object.
        #[serde(default)]
        arguments: Option<Value>,
    }

    let params: CallParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(err) => {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("invalid params: {err}"));
        }
    };
    let arguments = params.arguments.unwrap_or_else(|| json!({}));

    let started = Instant::now();
    let Some(envelope) = state.registry.dispatch(&params.name, arguments).await else {
        return JsonRpcResponse::failure(
            id,
            INVALID_PARAMS,
            format!("unknown tool: {}", params.name),
        );
    };
    let outcome = if envelope.is_success() {
        CallOutcome::Ok
    } else {
        CallOutcome::Error
    };
    state.metrics.record_call(&ToolCallEvent {
        tool: params.name.clone(),
        outcome,
        duration: started.elapsed(),
    });
    tracing::debug!(tool = %params.name, outcome = outcome.as_str(), "tool call completed");

    let structured = serde_json::to_value(&envelope).unwrap_or(Value::Null);
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": structured.to_string()}],
            "structuredContent": structured,
            "isError": !envelope.is_success()
        }),
    )
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Builds the axum router over the shared state.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/mcp", post(handle_rpc))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// POST /mcp handler.
async fn handle_rpc(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    match handle_message(&state, &body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// GET /health handler.
async fn handle_health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

// ============================================================================
// SECTION: Server Assembly
// ============================================================================

/// Server construction and runtime errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum McpServerError {
    /// A dependency could not be constructed.
    #[error("server initialization failed: {0}")]
    Init(String),
    /// The configured bind address did not parse.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddr(String),
    /// The listener could not bind.
    #[error("failed to bind {addr}: {detail}")]
    Bind {
        /// Address that was attempted.
        addr: SocketAddr,
        /// Underlying bind detail.
        detail: String,
    },
    /// The accept loop terminated with an error.
    #[error("server terminated: {0}")]
    Serve(String),
}

/// Assembled MCP server: registry, telemetry, and listener address.
pub struct McpServer {
    /// Shared transport state.
    state: Arc<ServerState>,
    /// Listener address.
    bind_addr: SocketAddr,
}

impl McpServer {
    /// Builds a server from validated configuration with no-op metrics.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when a dependency cannot be constructed.
    pub fn from_config(config: &RadgateConfig) -> Result<Self, McpServerError> {
        Self::from_config_with_metrics(config, Arc::new(NoopMetrics))
    }

    /// Builds a server from validated configuration and a metrics sink.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when a dependency cannot be constructed.
    pub fn from_config_with_metrics(
        config: &RadgateConfig,
        metrics: Arc<dyn ToolMetrics>,
    ) -> Result<Self, McpServerError> {
        let bind_addr: SocketAddr = config
            .server
            .bind_addr
            .parse()
            .map_err(|_| McpServerError::InvalidBindAddr(config.server.bind_addr.clone()))?;

        let radflow_client = UpstreamClient::new(&UpstreamClientOptions {
            timeout: Duration::from_secs(config.radflow.timeout_secs),
            danger_accept_invalid_certs: config.radflow.danger_accept_invalid_certs,
        })
        .map_err(|err| McpServerError::Init(err.to_string()))?;
        let casebook_client = UpstreamClient::new(&UpstreamClientOptions {
            timeout: Duration::from_secs(config.casebook.timeout_secs),
            danger_accept_invalid_certs: config.casebook.danger_accept_invalid_certs,
        })
        .map_err(|err| McpServerError::Init(err.to_string()))?;
        let radflow: Arc<dyn Gateway> = Arc::new(radflow_client);
        let casebook: Arc<dyn Gateway> = Arc::new(casebook_client);

        let token_endpoint = partner_token_endpoint(&config.radflow)
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        let issuer = Arc::new(PartnerTokenIssuer::new(Arc::clone(&radflow), token_endpoint));
        let credentials = Arc::new(CredentialManager::new(issuer, Arc::new(SystemClock)));

        let deps = ToolDeps {
            radflow,
            casebook,
            credentials,
            radflow_endpoints: RadflowEndpoints::from_config(&config.radflow),
            casebook_endpoints: CasebookEndpoints::from_config(&config.casebook),
            casebook_user: config.casebook.api_user.clone(),
            casebook_password: config.casebook.api_password.clone(),
        };
        let registry = ToolRegistry::with_standard_tools(deps)
            .map_err(|err| McpServerError::Init(err.to_string()))?;

        Ok(Self {
            state: Arc::new(ServerState {
                registry,
                metrics,
            }),
            bind_addr,
        })
    }

    /// Returns the shared transport state.
    #[must_use]
    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Returns the listener address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Binds the listener and serves until the accept loop terminates.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] on bind or serve failure.
    pub async fn run(self) -> Result<(), McpServerError> {
        let listener = TcpListener::bind(self.bind_addr).await.map_err(|err| {
            McpServerError::Bind {
                addr: self.bind_addr,
                detail: err.to_string(),
            }
        })?;
        tracing::info!(addr = %self.bind_addr, "radgate mcp server listening");
        axum::serve(listener, router(self.state))
            .await
            .map_err(|err| McpServerError::Serve(err.to_string()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
