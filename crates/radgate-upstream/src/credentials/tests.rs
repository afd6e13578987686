// crates/radgate-upstream/src/credentials/tests.rs
// ============================================================================
// Module: Credential Manager Tests
// Description: Unit tests for token caching, staleness, and single-flight.
// Purpose: Validate refresh discipline with deterministic clocks and doubles.
// Dependencies: radgate-upstream, tokio
// ============================================================================

//! ## Overview
//! Exercises the credential manager with a fixed clock and counting issuer
//! doubles: cached reuse, safety-margin staleness, single-flight refresh
//! under concurrency, failure isolation, and JWT expiry extraction.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use radgate_core::Clock;
use radgate_core::ToolError;
use serde_json::json;

use super::CredentialManager;
use super::IssuedToken;
use super::TokenIssuer;
use super::decode_jwt_expiry;

// ============================================================================
// SECTION: Doubles
// ============================================================================

/// Clock pinned to an explicit unix second.
struct FixedClock(AtomicI64);

impl FixedClock {
    fn at(now: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(now)))
    }

    fn advance_to(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Issuer double that counts calls and can fail on demand.
struct CountingIssuer {
    calls: AtomicUsize,
    fail: AtomicI64,
    expires_at: i64,
    delay: Option<Duration>,
}

impl CountingIssuer {
    fn new(expires_at: i64) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: AtomicI64::new(0),
            expires_at,
            delay: None,
        })
    }

    fn with_delay(expires_at: i64, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: AtomicI64::new(0),
            expires_at,
            delay: Some(delay),
        })
    }

    fn fail_next(&self, count: i64) {
        self.fail.store(count, Ordering::SeqCst);
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TokenIssuer for CountingIssuer {
    async fn issue(&self) -> Result<IssuedToken, ToolError> {
        let sequence = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.fetch_sub(1, Ordering::SeqCst) > 0 {
            return Err(ToolError::Auth("issuer offline".to_string()));
        }
        Ok(IssuedToken {
            value: format!("token-{sequence}"),
            expires_at: self.expires_at,
        })
    }
}

// ============================================================================
// SECTION: Caching Tests
// ============================================================================

#[tokio::test]
async fn first_call_refreshes_then_reuses_the_cache() {
    let clock = FixedClock::at(1_000);
    let issuer = CountingIssuer::new(10_000);
    let manager = CredentialManager::new(issuer.clone(), clock);

    assert_eq!(manager.get_token().await.expect("token"), "token-1");
    assert_eq!(manager.get_token().await.expect("token"), "token-1");
    assert_eq!(issuer.call_count(), 1);
}

#[tokio::test]
async fn token_inside_the_safety_margin_is_refreshed() {
    let clock = FixedClock::at(1_000);
    let issuer = CountingIssuer::new(10_000);
    let manager = CredentialManager::new(issuer.clone(), clock.clone());

    assert_eq!(manager.get_token().await.expect("token"), "token-1");

    // 30 seconds before expiry is inside the 60 second margin.
    clock.advance_to(10_000 - 30);
    assert_eq!(manager.get_token().await.expect("token"), "token-2");
    assert_eq!(issuer.call_count(), 2);
}

#[tokio::test]
async fn token_outside_the_safety_margin_is_served_without_refresh() {
    let clock = FixedClock::at(1_000);
    let issuer = CountingIssuer::new(10_000);
    let manager = CredentialManager::new(issuer.clone(), clock.clone());

    manager.get_token().await.expect("token");
    clock.advance_to(10_000 - 61);
    manager.get_token().await.expect("token");
    assert_eq!(issuer.call_count(), 1);
}

// ============================================================================
// SECTION: Single-Flight Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stale_callers_trigger_exactly_one_refresh() {
    let clock = FixedClock::at(1_000);
    let issuer = CountingIssuer::with_delay(10_000, Duration::from_millis(25));
    let manager = Arc::new(CredentialManager::new(issuer.clone(), clock));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = Arc::clone(&manager);
        handles.push(tokio::spawn(async move { manager.get_token().await }));
    }
    for handle in handles {
        let token = handle.await.expect("join").expect("token");
        assert_eq!(token, "token-1");
    }
    assert_eq!(issuer.call_count(), 1);
}

// ============================================================================
// SECTION: Failure Isolation Tests
// ============================================================================

#[tokio::test]
async fn failed_refresh_surfaces_auth_error_and_preserves_state() {
    let clock = FixedClock::at(1_000);
    let issuer = CountingIssuer::new(10_000);
    let manager = CredentialManager::new(issuer.clone(), clock.clone());

    manager.get_token().await.expect("token");

    clock.advance_to(20_000);
    issuer.fail_next(1);
    let err = manager.get_token().await.expect_err("refresh failure");
    assert!(matches!(err, ToolError::Auth(_)));

    // The next caller retries issuance; the failure did not poison state.
    assert_eq!(manager.get_token().await.expect("token"), "token-3");
}

// ============================================================================
// SECTION: JWT Expiry Tests
// ============================================================================

fn jwt_with_payload(payload: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
    format!("{header}.{body}.signature")
}

#[test]
fn decodes_the_exp_claim_without_verifying_the_signature() {
    let token = jwt_with_payload(&json!({"exp": 1_900_000_000, "sub": "partner"}).to_string());
    assert_eq!(decode_jwt_expiry(&token).expect("exp"), 1_900_000_000);
}

#[test]
fn rejects_non_jwt_tokens() {
    let err = decode_jwt_expiry("opaque-token").expect_err("rejection");
    assert!(matches!(err, ToolError::Auth(_)));
}

#[test]
fn rejects_payloads_without_an_exp_claim() {
    let token = jwt_with_payload(&json!({"sub": "partner"}).to_string());
    let err = decode_jwt_expiry(&token).expect_err("rejection");
    assert!(matches!(err, ToolError::Auth(_)));
}
