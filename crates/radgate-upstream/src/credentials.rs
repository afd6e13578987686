// crates/radgate-upstream/src/credentials.rs
// ============================================================================
// Module: Credential Manager
// Description: Partner token lifecycle with single-flight refresh.
// Purpose: Serve a fresh bearer token without duplicate refresh calls.
// Dependencies: radgate-core, base64, serde_json, tokio
// ============================================================================

//! ## Overview
//! The credential manager owns the one piece of shared mutable state in the
//! process: the partner bearer token. Readers of a fresh token proceed
//! concurrently under a read lock. A caller that observes staleness takes
//! the write lock, re-checks, and performs exactly one refresh; every
//! concurrent requester blocks on that same refresh and reuses its result.
//! Refresh failures surface as [`ToolError::Auth`] and leave prior state
//! untouched. Token expiry comes from the JWT `exp` claim; the signature is
//! not verified here because the token is consumed, not issued, by this
//! process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use radgate_core::Clock;
use radgate_core::ToolError;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::client::AuthMode;
use crate::client::EndpointSpec;
use crate::client::Gateway;

// ============================================================================
// SECTION: Token Types
// ============================================================================

/// A freshly issued bearer token with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Bearer token value.
    pub value: String,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

/// Cached token state.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenState {
    /// Bearer token value.
    value: String,
    /// Expiry as unix seconds.
    expires_at: i64,
}

// ============================================================================
// SECTION: Token Issuer
// ============================================================================

/// Source of new tokens; implemented over the partner endpoint in
/// production and by scripted doubles in tests.
#[async_trait::async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Performs one token issuance call.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Auth`] when issuance fails for any reason.
    async fn issue(&self) -> Result<IssuedToken, ToolError>;
}

/// Token issuer backed by the RadFlow partner refresh endpoint.
pub struct PartnerTokenIssuer {
    /// Gateway used for the refresh call.
    gateway: Arc<dyn Gateway>,
    /// Partner token endpoint with the API key attached.
    endpoint: EndpointSpec,
}

impl PartnerTokenIssuer {
    /// Creates an issuer over the given gateway and endpoint.
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, endpoint: EndpointSpec) -> Self {
        Self {
            gateway,
            endpoint,
        }
    }
}

#[async_trait::async_trait]
impl TokenIssuer for PartnerTokenIssuer {
    async fn issue(&self) -> Result<IssuedToken, ToolError> {
        let result = self.gateway.call(&self.endpoint, Value::Null, AuthMode::None).await;
        let body = result.into_body().map_err(|err| ToolError::Auth(err.to_string()))?;
        let token = body
            .get("result")
            .and_then(|wrapper| wrapper.get("jwtToken"))
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::Auth("jwtToken missing from partner response".to_string()))?;
        let expires_at = decode_jwt_expiry(token)?;
        Ok(IssuedToken {
            value: token.to_string(),
            expires_at,
        })
    }
}

/// Extracts the `exp` claim from an unverified JWT payload.
///
/// # Errors
///
/// Returns [`ToolError::Auth`] when the token is not a JWT, the payload is
/// not base64url JSON, or the claim is absent.
pub fn decode_jwt_expiry(token: &str) -> Result<i64, ToolError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ToolError::Auth("token is not a JWT".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| ToolError::Auth("token payload is not base64url".to_string()))?;
    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|_| ToolError::Auth("token payload is not JSON".to_string()))?;
    claims
        .get("exp")
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolError::Auth("exp claim missing from token".to_string()))
}

// ============================================================================
// SECTION: Credential Manager
// ============================================================================

/// Process-wide owner of the partner bearer token.
///
/// # Invariants
/// - A token is served only while `now < expires_at - safety_margin`.
/// - At most one refresh is in flight at a time; concurrent requesters
///   block on its completion and reuse its result.
/// - A failed refresh never clobbers previously stored state.
pub struct CredentialManager {
    /// Token source.
    issuer: Arc<dyn TokenIssuer>,
    /// Injectable time source for expiry checks.
    clock: Arc<dyn Clock>,
    /// Cached token state; `None` until the first successful refresh.
    state: RwLock<Option<TokenState>>,
    /// Seconds before expiry at which a token counts as stale.
    safety_margin_secs: i64,
}

impl CredentialManager {
    /// Default freshness margin before expiry.
    pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 60;

    /// Creates a manager with the default safety margin.
    #[must_use]
    pub fn new(issuer: Arc<dyn TokenIssuer>, clock: Arc<dyn Clock>) -> Self {
        Self::with_safety_margin(issuer, clock, Self::DEFAULT_SAFETY_MARGIN_SECS)
    }

    /// Creates a manager with an explicit safety margin.
    #[must_use]
    pub fn with_safety_margin(
        issuer: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
        safety_margin_secs: i64,
    ) -> Self {
        Self {
            issuer,
            clock,
            state: RwLock::new(None),
            safety_margin_secs,
        }
    }

    /// Returns a valid bearer token, refreshing single-flight when stale.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Auth`] when the refresh call itself fails.
    pub async fn get_token(&self) -> Result<String, ToolError> {
        {
            let state = self.state.read().await;
            if let Some(token) = state.as_ref()
                && self.is_fresh(token)
            {
                tracing::debug!("using cached partner token");
                return Ok(token.value.clone());
            }
        }

        let mut state = self.state.write().await;
        // Re-check under the write lock: a concurrent caller may have
        // completed the refresh while this one waited.
        if let Some(token) = state.as_ref()
            && self.is_fresh(token)
        {
            return Ok(token.value.clone());
        }

        tracing::info!("refreshing partner token");
        let issued = self.issuer.issue().await?;
        *state = Some(TokenState {
            value: issued.value.clone(),
            expires_at: issued.expires_at,
        });
        Ok(issued.value)
    }

    /// Returns true while the token is outside the safety margin.
    fn is_fresh(&self, token: &TokenState) -> bool {
        self.clock.now_unix() < token.expires_at - self.safety_margin_secs
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
