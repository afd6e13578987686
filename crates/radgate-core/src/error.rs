// crates/radgate-core/src/error.rs
// ============================================================================
// Module: Error Taxonomy
// Description: Typed failure kinds raised inside the Radgate core.
// Purpose: Give every failure path one programmatic shape before enveloping.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every failure the core can produce is a [`ToolError`] variant. No error
//! crosses the tool boundary as anything other than the failure envelope;
//! handlers convert via `ToolEnvelope::from`. Display strings double as the
//! `error` field of the envelope, so they are part of the compatibility
//! surface and must stay stable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Tool Error
// ============================================================================

/// Failure kinds raised inside the core.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `Validation` and `InvalidDate` are detected before any upstream call.
/// - Display strings are the caller-visible `error` messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// Token issuance or refresh failed.
    #[error("Could not retrieve authentication token: {0}")]
    Auth(String),
    /// Upstream returned a non-2xx HTTP status.
    #[error("API request failed with status {status}")]
    UpstreamHttp {
        /// HTTP status code returned by the upstream.
        status: u16,
    },
    /// Upstream call exceeded the fixed request timeout.
    #[error("API request timed out after 30 seconds")]
    UpstreamTimeout,
    /// Transport-level failure before a response arrived.
    #[error("Connection error: {0}")]
    UpstreamConnection(String),
    /// Upstream body was not valid JSON, or nesting exceeded the unwrap cap.
    #[error("Invalid JSON response from API")]
    Parse(String),
    /// Event-conditioned required fields were absent from a write request.
    #[error("missing required fields for event_id {event_id}: {}", .missing.join(", "))]
    Validation {
        /// Event classifier the rule set was keyed on.
        event_id: i64,
        /// Every missing field, not just the first.
        missing: Vec<String>,
    },
    /// A date argument matched neither accepted pattern.
    #[error("invalid date '{value}': expected MM/DD/YYYY or YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },
    /// Tool arguments failed schema-level decoding.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// Zero records remained after normalization.
    #[error("No {entity} found")]
    NotFound {
        /// Record kind that came up empty (`"patients"`, `"studies"`).
        entity: &'static str,
    },
}

impl ToolError {
    /// Returns a stable label for telemetry and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::UpstreamHttp {
                ..
            } => "upstream_http",
            Self::UpstreamTimeout => "upstream_timeout",
            Self::UpstreamConnection(_) => "upstream_connection",
            Self::Parse(_) => "parse",
            Self::Validation {
                ..
            } => "validation",
            Self::InvalidDate {
                ..
            } => "invalid_date",
            Self::InvalidArguments(_) => "invalid_arguments",
            Self::NotFound {
                ..
            } => "not_found",
        }
    }
}
