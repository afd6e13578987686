// crates/radgate-mcp/src/requests/tests.rs
// ============================================================================
// Module: Upstream Request Payload Tests
// Description: Unit tests pinning wire field names and omission rules.
// Purpose: Keep request bodies bit-compatible with the upstream contract.
// Dependencies: radgate-mcp, serde_json
// ============================================================================

//! ## Overview
//! Pins the serialized request shapes: camelCase keys, always-present
//! lookup keys, phone prefix stripping, `patientID` casing quirks, and
//! omission of unsupplied optional fields.

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

use serde_json::json;

use super::CaseLookupRequest;
use super::CaseUpdateLogRequest;
use super::LienBalanceRequest;
use super::PatientLookupRequest;
use super::REQUIRED_FIELD_STUDY_DETAILS;

// ============================================================================
// SECTION: Patient Lookup Tests
// ============================================================================

#[test]
fn lookup_by_id_serializes_every_key() {
    let payload = PatientLookupRequest::by_patient_id("PRE1", REQUIRED_FIELD_STUDY_DETAILS);
    let serialized = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(
        serialized,
        json!({
            "patientId": "PRE1",
            "phone": "",
            "firstName": "",
            "lastName": "",
            "birthDate": "",
            "doi": "",
            "accessionNumber": "",
            "requiredField": "Study Details"
        })
    );
}

#[test]
fn lookup_by_phone_strips_the_dialing_prefix() {
    let prefixed = PatientLookupRequest::by_phone("+15551234567");
    let bare = PatientLookupRequest::by_phone("5551234567");
    assert_eq!(prefixed, bare);
    assert_eq!(prefixed.phone, "5551234567");
}

#[test]
fn lookup_by_details_populates_name_and_doi() {
    let payload =
        PatientLookupRequest::by_details("Ana", "Solis", "2024-03-09 00:00:00".to_string());
    let serialized = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(serialized["firstName"], "Ana");
    assert_eq!(serialized["lastName"], "Solis");
    assert_eq!(serialized["doi"], "2024-03-09 00:00:00");
    assert_eq!(serialized["requiredField"], "Details");
}

// ============================================================================
// SECTION: Casebook Key Casing Tests
// ============================================================================

#[test]
fn case_lookup_uses_upper_id_suffix() {
    let serialized = serde_json::to_value(CaseLookupRequest {
        patient_id: "PRE1".to_string(),
    })
    .expect("serialize");
    assert_eq!(serialized, json!({"patientID": "PRE1"}));
}

#[test]
fn lien_balance_uses_lower_id_suffix() {
    let serialized = serde_json::to_value(LienBalanceRequest {
        patient_id: "PRE1".to_string(),
    })
    .expect("serialize");
    assert_eq!(serialized, json!({"patientId": "PRE1"}));
}

// ============================================================================
// SECTION: Case Update Write Tests
// ============================================================================

#[test]
fn unsupplied_optionals_are_omitted_from_the_wire() {
    let payload = CaseUpdateLogRequest {
        patient_id: "PRE1".to_string(),
        user_name: "intake".to_string(),
        event_id: 7,
        event_status: 7,
        notes: Some("called attorney".to_string()),
        liability_expected_date: None,
        expected_payment_date: None,
        payment_date_sent: None,
        check_number: None,
        check_amount: None,
        send_payment_of_estimated_date: None,
    };
    let serialized = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(
        serialized,
        json!({
            "patientId": "PRE1",
            "userName": "intake",
            "eventId": 7,
            "eventStatus": 7,
            "notes": "called attorney"
        })
    );
}

#[test]
fn payment_fields_serialize_for_event_six() {
    let payload = CaseUpdateLogRequest {
        patient_id: "PRE1".to_string(),
        user_name: "billing".to_string(),
        event_id: 6,
        event_status: 6,
        notes: None,
        liability_expected_date: None,
        expected_payment_date: None,
        payment_date_sent: Some("03/09/2024".to_string()),
        check_number: Some("1042".to_string()),
        check_amount: Some(1250.75),
        send_payment_of_estimated_date: None,
    };
    let serialized = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(serialized["paymentDateSent"], "03/09/2024");
    assert_eq!(serialized["checkNumber"], "1042");
    assert_eq!(serialized["checkAmount"], 1250.75);
}
