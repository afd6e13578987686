// crates/radgate-core/src/envelope/tests.rs
// ============================================================================
// Module: Response Envelope Tests
// Description: Unit tests for envelope construction and serialization.
// Purpose: Pin the wire shape downstream consumers parse.
// Dependencies: radgate-core, serde_json
// ============================================================================

//! ## Overview
//! Pins the serialized envelope shapes: flat tagging, exact message strings,
//! and the numbered-list format.

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

use serde_json::Value;
use serde_json::json;

use super::ToolEnvelope;
use crate::error::ToolError;
use crate::records::CanonicalPatientRecord;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample_patient(id: &str, first: &str, last: &str) -> CanonicalPatientRecord {
    CanonicalPatientRecord {
        patient_id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..CanonicalPatientRecord::default()
    }
}

// ============================================================================
// SECTION: Construction Tests
// ============================================================================

#[test]
fn patient_success_message_counts_records() {
    let envelope = ToolEnvelope::patients(vec![
        sample_patient("PRE1", "ANA", "SOLIS"),
        sample_patient("PRE2", "LUIS", "VEGA"),
    ]);
    let serialized = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(serialized["success"], Value::Bool(true));
    assert_eq!(serialized["message"], "Successfully processed 2 patients");
    assert_eq!(serialized["numbered_list"], "1. ANA SOLIS (ID: PRE1)\n2. LUIS VEGA (ID: PRE2)");
}

#[test]
fn numbered_list_trims_partial_names() {
    let envelope = ToolEnvelope::patients(vec![sample_patient("PRE3", "ANA", "")]);
    let serialized = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(serialized["numbered_list"], "1. ANA (ID: PRE3)");
}

#[test]
fn failure_shape_carries_only_error() {
    let envelope = ToolEnvelope::failure("No patients found");
    let serialized = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(serialized, json!({"success": false, "error": "No patients found"}));
}

#[test]
fn tool_error_converts_to_failure_envelope() {
    let envelope = ToolEnvelope::from(ToolError::UpstreamTimeout);
    let serialized = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(serialized["success"], Value::Bool(false));
    assert_eq!(serialized["error"], "API request timed out after 30 seconds");
}

#[test]
fn envelope_round_trips_through_json() {
    let envelope = ToolEnvelope::patients(vec![sample_patient("PRE9", "MARA", "IBAR")]);
    let text = serde_json::to_string(&envelope).expect("serialize");
    let parsed: ToolEnvelope = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(parsed, envelope);
    assert!(parsed.is_success());
}

#[test]
fn data_success_preserves_raw_body() {
    let body = json!({"caseUpdates": [{"eventId": 5}]});
    let envelope = ToolEnvelope::data(body.clone());
    let serialized = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(serialized, json!({"success": true, "data": body}));
}
