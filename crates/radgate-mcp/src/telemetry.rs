// crates/radgate-mcp/src/telemetry.rs
// ============================================================================
// Module: Tool Telemetry
// Description: Observability hooks for tool dispatch outcomes.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A thin metrics interface for per-tool call counters and latency
//! observations. Intentionally dependency-light so deployments can plug in
//! Prometheus or OpenTelemetry without redesign; the default sink discards
//! everything. Labels never carry patient identifiers or upstream payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for tool call histograms. The
/// top buckets track the fixed 30-second upstream timeout.
pub const TOOL_LATENCY_BUCKETS_MS: &[u64] =
    &[5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Tool call outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The envelope reported success.
    Ok,
    /// The envelope reported failure.
    Error,
}

impl CallOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Tool call metric event payload.
#[derive(Debug, Clone)]
pub struct ToolCallEvent {
    /// Tool name as dispatched.
    pub tool: String,
    /// Envelope-level outcome.
    pub outcome: CallOutcome,
    /// Wall-clock duration of the handler call.
    pub duration: Duration,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for tool dispatch.
pub trait ToolMetrics: Send + Sync {
    /// Records one completed tool call.
    fn record_call(&self, event: &ToolCallEvent);
}

/// No-op metrics sink.
pub struct NoopMetrics;

impl ToolMetrics for NoopMetrics {
    fn record_call(&self, _event: &ToolCallEvent) {}
}
