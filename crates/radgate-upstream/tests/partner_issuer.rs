// crates/radgate-upstream/tests/partner_issuer.rs
// ============================================================================
// Module: Partner Token Issuer Tests
// Description: End-to-end issuance flow against a scripted gateway double.
// Purpose: Validate endpoint assembly and partner response handling.
// ============================================================================

//! ## Overview
//! Drives the partner token issuer through a gateway double: endpoint query
//! encoding, successful issuance with JWT expiry extraction, and the
//! auth-error wrapping of transport failures and malformed responses.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use radgate_config::RadflowConfig;
use radgate_core::CallFailure;
use radgate_core::ToolError;
use radgate_core::UpstreamCallResult;
use radgate_upstream::AuthMode;
use radgate_upstream::EndpointSpec;
use radgate_upstream::Gateway;
use radgate_upstream::PartnerTokenIssuer;
use radgate_upstream::TokenIssuer;
use radgate_upstream::partner_token_endpoint;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Doubles
// ============================================================================

/// Gateway double that records the call and returns a scripted result.
struct ScriptedGateway {
    result: Mutex<Option<UpstreamCallResult>>,
    seen: Mutex<Vec<(String, Value, AuthMode)>>,
}

impl ScriptedGateway {
    fn returning(result: UpstreamCallResult) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Some(result)),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn call(
        &self,
        endpoint: &EndpointSpec,
        body: Value,
        auth: AuthMode,
    ) -> UpstreamCallResult {
        self.seen.lock().expect("seen lock").push((endpoint.url.clone(), body, auth));
        self.result.lock().expect("result lock").take().expect("scripted result consumed twice")
    }
}

fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({"exp": exp}).to_string());
    format!("{header}.{payload}.signature")
}

fn partner_config(key: &str) -> RadflowConfig {
    RadflowConfig {
        partner_api_key: key.to_string(),
        ..RadflowConfig::default()
    }
}

// ============================================================================
// SECTION: Endpoint Assembly
// ============================================================================

#[test]
fn partner_endpoint_attaches_the_api_key_as_a_query_parameter() {
    let endpoint = partner_token_endpoint(&partner_config("secret-key")).expect("endpoint");
    assert_eq!(endpoint.name, "radflow.partner_token");
    assert!(endpoint.url.contains("partnerApiKey=secret-key"), "url was {}", endpoint.url);
}

#[test]
fn partner_endpoint_percent_encodes_the_key() {
    let endpoint = partner_token_endpoint(&partner_config("k&e y")).expect("endpoint");
    assert!(!endpoint.url.contains("k&e y"), "url was {}", endpoint.url);
    assert!(endpoint.url.contains("partnerApiKey="), "url was {}", endpoint.url);
}

// ============================================================================
// SECTION: Issuance Flow
// ============================================================================

#[tokio::test]
async fn issues_a_token_from_the_partner_response() {
    let token = jwt_with_exp(1_900_000_000);
    let gateway = ScriptedGateway::returning(UpstreamCallResult::Success {
        status: 200,
        body: json!({"result": {"jwtToken": token}}),
    });
    let endpoint = partner_token_endpoint(&partner_config("secret-key")).expect("endpoint");
    let issuer = PartnerTokenIssuer::new(gateway.clone(), endpoint);

    let issued = issuer.issue().await.expect("issued token");
    assert_eq!(issued.value, token);
    assert_eq!(issued.expires_at, 1_900_000_000);

    let seen = gateway.seen.lock().expect("seen lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, Value::Null);
    assert_eq!(seen[0].2, AuthMode::None);
}

#[tokio::test]
async fn wraps_transport_failures_as_auth_errors() {
    let gateway = ScriptedGateway::returning(UpstreamCallResult::Failure(CallFailure::Timeout));
    let endpoint = partner_token_endpoint(&partner_config("secret-key")).expect("endpoint");
    let issuer = PartnerTokenIssuer::new(gateway, endpoint);

    let err = issuer.issue().await.expect_err("auth error");
    match err {
        ToolError::Auth(detail) => {
            assert!(detail.contains("timed out"), "detail was {detail}");
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn rejects_responses_without_a_token() {
    let gateway = ScriptedGateway::returning(UpstreamCallResult::Success {
        status: 200,
        body: json!({"result": {}}),
    });
    let endpoint = partner_token_endpoint(&partner_config("secret-key")).expect("endpoint");
    let issuer = PartnerTokenIssuer::new(gateway, endpoint);

    let err = issuer.issue().await.expect_err("auth error");
    assert!(matches!(err, ToolError::Auth(_)));
}
