// crates/radgate-core/src/call.rs
// ============================================================================
// Module: Upstream Call Result
// Description: Transient value carried from gateway clients to the core.
// Purpose: Keep raw upstream outcomes typed until normalized or enveloped.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Gateway clients return [`UpstreamCallResult`] instead of raising past
//! their boundary. The value is transient: it is consumed by the normalizer
//! (or the passthrough envelope) within the same invocation and is never
//! exposed to tool callers directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::error::ToolError;

// ============================================================================
// SECTION: Call Failure
// ============================================================================

/// Structured failure of a single upstream call attempt.
///
/// # Invariants
/// - Exactly one outbound attempt produced this value; there is no retry
///   context to carry.
/// - `detail` strings are for logs; caller-visible text comes from the
///   [`ToolError`] conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The request exceeded the fixed timeout.
    Timeout,
    /// The request failed before an HTTP response arrived.
    Connection(String),
    /// The upstream answered with a non-2xx status.
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt for diagnostics.
        detail: String,
    },
    /// The response body was not valid JSON.
    Parse(String),
}

impl From<CallFailure> for ToolError {
    fn from(failure: CallFailure) -> Self {
        match failure {
            CallFailure::Timeout => Self::UpstreamTimeout,
            CallFailure::Connection(detail) => Self::UpstreamConnection(detail),
            CallFailure::Http {
                status, ..
            } => Self::UpstreamHttp {
                status,
            },
            CallFailure::Parse(detail) => Self::Parse(detail),
        }
    }
}

// ============================================================================
// SECTION: Call Result
// ============================================================================

/// Outcome of one upstream request.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamCallResult {
    /// The upstream answered 2xx with a JSON body.
    Success {
        /// HTTP status code of the response.
        status: u16,
        /// Parsed response body.
        body: Value,
    },
    /// The call failed; see [`CallFailure`] for the kind.
    Failure(CallFailure),
}

impl UpstreamCallResult {
    /// Returns the parsed body when the call succeeded.
    ///
    /// # Errors
    ///
    /// Returns the failure mapped into [`ToolError`] otherwise.
    pub fn into_body(self) -> Result<Value, ToolError> {
        match self {
            Self::Success {
                body, ..
            } => Ok(body),
            Self::Failure(failure) => Err(failure.into()),
        }
    }
}
