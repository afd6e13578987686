// crates/radgate-core/tests/normalize_wrapping.rs
// ============================================================================
// Module: Normalizer Wrapping Tests
// Description: Verifies flat output is invariant under payload nesting.
// Purpose: Pin the canonical envelope across upstream wrapper variants.
// ============================================================================

//! ## Overview
//! Wraps the same patient payload in zero through three levels of
//! string-encoded-JSON and wrapper-key nesting and asserts the normalized
//! `patients` array is identical in every case, plus the exact envelope for
//! the documented nested-lookup scenario and the empty-result rule.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use radgate_core::NormalizeKind;
use radgate_core::ToolEnvelope;
use radgate_core::UpstreamCallResult;
use radgate_core::normalize;
use serde_json::Value;
use serde_json::json;

fn success(body: Value) -> UpstreamCallResult {
    UpstreamCallResult::Success {
        status: 200,
        body,
    }
}

fn patients_kind() -> NormalizeKind {
    NormalizeKind::Patients {
        fallback_phone: None,
    }
}

fn patients_of(envelope: &ToolEnvelope) -> Value {
    let serialized = serde_json::to_value(envelope).expect("serialize envelope");
    serialized.get("patients").cloned().expect("patients array")
}

#[test]
fn nesting_depth_does_not_change_the_flat_patient_list() {
    let records = json!([
        {"PatientId": "PRE1006707", "FirstName": "Servando", "LastName": "Lopez"},
        {"PatientId": "PRE1006708", "FirstName": "Ana", "LastName": "Solis"}
    ]);

    // Depth 0: bare list.
    let depth0 = records.clone();
    // Depth 1: list under a wrapper key.
    let depth1 = json!({"result": records});
    // Depth 2: string-encoded list under a wrapper key.
    let depth2 = json!({"result": {"result": records.to_string()}});
    // Depth 3: string-encoded wrapper object under a wrapper key.
    let depth3 = json!({"result": json!({"result": records.to_string()}).to_string()});

    let baseline = patients_of(&normalize(success(depth0), &patients_kind()));
    for wrapped in [depth1, depth2, depth3] {
        let envelope = normalize(success(wrapped), &patients_kind());
        assert_eq!(patients_of(&envelope), baseline);
    }
}

#[test]
fn nested_string_encoded_lookup_produces_the_documented_envelope() {
    let inner = json!([{
        "PatientId": "PRE1006707",
        "FirstName": "SERVANDO",
        "LastName": "LOPEZ",
        "Phone": "5551234567"
    }])
    .to_string();
    let body = json!({"result": {"result": inner}});

    let envelope = normalize(success(body), &patients_kind());
    let serialized = serde_json::to_value(&envelope).expect("serialize envelope");

    assert_eq!(serialized["success"], Value::Bool(true));
    assert_eq!(serialized["message"], "Successfully processed 1 patients");
    assert_eq!(serialized["patients"][0]["patient_id"], "PRE1006707");
    assert_eq!(serialized["patients"][0]["first_name"], "SERVANDO");
}

#[test]
fn empty_result_list_yields_the_not_found_failure() {
    let envelope = normalize(success(json!({"result": []})), &patients_kind());
    let serialized = serde_json::to_value(&envelope).expect("serialize envelope");
    assert_eq!(serialized, json!({"success": false, "error": "No patients found"}));
}
