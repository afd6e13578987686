// crates/radgate-upstream/src/client.rs
// ============================================================================
// Module: Upstream Gateway Client
// Description: Single-attempt HTTP client for upstream REST calls.
// Purpose: Map transport outcomes into structured call results, fail closed.
// Dependencies: radgate-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! One [`UpstreamClient`] type serves both upstream services; instances
//! differ only in timeout and TLS policy. Calls are POST-with-JSON per the
//! upstream contract, carry exactly one authentication mode, and make
//! exactly one attempt: non-2xx statuses, timeouts, transport failures, and
//! unparseable bodies all come back as [`UpstreamCallResult::Failure`]
//! variants rather than panics or raw errors. TLS verification is on unless
//! the deployment config opted out for that upstream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use radgate_core::CallFailure;
use radgate_core::UpstreamCallResult;
use reqwest::Client;
use reqwest::Method;
use reqwest::header::ACCEPT;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// User agent presented on every outbound request.
const USER_AGENT: &str = concat!("radgate/", env!("CARGO_PKG_VERSION"));

/// Cap on response-body detail captured for diagnostics.
const MAX_ERROR_DETAIL_BYTES: usize = 500;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gateway client construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The underlying HTTP client could not be built.
    #[error("http client build failed: {0}")]
    ClientBuild(String),
    /// An endpoint URL was rejected.
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

// ============================================================================
// SECTION: Endpoint Spec
// ============================================================================

/// One upstream endpoint: method, URL, and a stable name for telemetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Stable dotted name (`"radflow.lookup"`) used in logs and metrics.
    pub name: &'static str,
    /// HTTP method; the upstream contract is POST-only today.
    pub method: Method,
    /// Fully qualified endpoint URL.
    pub url: String,
}

impl EndpointSpec {
    /// Builds a POST endpoint spec.
    #[must_use]
    pub fn post(name: &'static str, url: String) -> Self {
        Self {
            name,
            method: Method::POST,
            url,
        }
    }
}

// ============================================================================
// SECTION: Auth Mode
// ============================================================================

/// Authentication attached to one upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// No request authentication.
    None,
    /// Bearer token from the credential manager.
    Bearer(String),
    /// Static basic-auth credentials.
    Basic {
        /// Basic-auth user.
        user: String,
        /// Basic-auth password.
        password: String,
    },
}

// ============================================================================
// SECTION: Gateway Trait
// ============================================================================

/// Outbound call surface tool handlers depend on.
///
/// Test doubles implement this to count calls and script responses without
/// any network.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Performs one upstream call.
    ///
    /// A `Value::Null` body sends no request body at all.
    async fn call(&self, endpoint: &EndpointSpec, body: Value, auth: AuthMode)
    -> UpstreamCallResult;
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Construction options for one upstream client instance.
///
/// # Invariants
/// - `danger_accept_invalid_certs` reflects a validated config opt-in, never
///   a hidden default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamClientOptions {
    /// Request timeout for the full call lifecycle.
    pub timeout: Duration,
    /// Skip TLS certificate verification for this upstream.
    pub danger_accept_invalid_certs: bool,
}

impl Default for UpstreamClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            danger_accept_invalid_certs: false,
        }
    }
}

/// HTTP gateway client for one upstream service.
///
/// # Invariants
/// - Exactly one outbound attempt per call; no retries, no response caching.
/// - Every failure maps to a [`CallFailure`] variant.
pub struct UpstreamClient {
    /// Shared reqwest client (connection pooling lives here).
    client: Client,
}

impl UpstreamClient {
    /// Creates a client with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ClientBuild`] when the HTTP client cannot be
    /// constructed.
    pub fn new(options: &UpstreamClientOptions) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(options.danger_accept_invalid_certs)
            .build()
            .map_err(|err| GatewayError::ClientBuild(err.to_string()))?;
        Ok(Self {
            client,
        })
    }
}

#[async_trait]
impl Gateway for UpstreamClient {
    async fn call(
        &self,
        endpoint: &EndpointSpec,
        body: Value,
        auth: AuthMode,
    ) -> UpstreamCallResult {
        let mut request = self
            .client
            .request(endpoint.method.clone(), &endpoint.url)
            .header(ACCEPT, "application/json");
        if !body.is_null() {
            request = request.json(&body);
        }
        request = match auth {
            AuthMode::None => request,
            AuthMode::Bearer(token) => request.bearer_auth(token),
            AuthMode::Basic {
                user,
                password,
            } => request.basic_auth(user, Some(password)),
        };

        tracing::debug!(endpoint = endpoint.name, "issuing upstream request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let failure = classify_transport_error(&err);
                tracing::warn!(endpoint = endpoint.name, error = %err, "upstream request failed");
                return UpstreamCallResult::Failure(failure);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = truncate_detail(response.text().await.unwrap_or_default());
            tracing::warn!(
                endpoint = endpoint.name,
                status = status.as_u16(),
                "upstream returned error status"
            );
            return UpstreamCallResult::Failure(CallFailure::Http {
                status: status.as_u16(),
                detail,
            });
        }

        match response.json::<Value>().await {
            Ok(parsed) => UpstreamCallResult::Success {
                status: status.as_u16(),
                body: parsed,
            },
            Err(err) => {
                tracing::warn!(endpoint = endpoint.name, error = %err, "upstream body was not JSON");
                UpstreamCallResult::Failure(CallFailure::Parse(err.to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a transport error into the structured failure taxonomy.
fn classify_transport_error(err: &reqwest::Error) -> CallFailure {
    if err.is_timeout() {
        CallFailure::Timeout
    } else {
        CallFailure::Connection(err.to_string())
    }
}

/// Truncates response detail kept for diagnostics.
fn truncate_detail(mut detail: String) -> String {
    if detail.len() > MAX_ERROR_DETAIL_BYTES {
        let mut cut = MAX_ERROR_DETAIL_BYTES;
        while !detail.is_char_boundary(cut) {
            cut -= 1;
        }
        detail.truncate(cut);
    }
    detail
}

// ============================================================================
// SECTION: Tests
// ============================================================================
