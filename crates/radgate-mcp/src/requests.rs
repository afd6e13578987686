// crates/radgate-mcp/src/requests.rs
// ============================================================================
// Module: Upstream Request Payloads
// Description: Typed request bodies for both upstream services.
// Purpose: Keep wire field names and lookup-key rules in one place.
// Dependencies: radgate-core, serde
// ============================================================================

//! ## Overview
//! Both upstreams speak camelCase JSON with service-specific quirks: the
//! patient lookup endpoint wants every key present (empty strings for
//! unused lookup keys), the case-update write endpoint wants absent keys
//! omitted entirely, and the two case-detail endpoints disagree on the
//! capitalization of `patientID`. The types here pin those shapes so
//! handlers never hand-build JSON objects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use radgate_core::strip_dialing_prefix;
use serde::Serialize;

// ============================================================================
// SECTION: Patient Lookup
// ============================================================================

/// Lookup selector requesting patient details.
pub const REQUIRED_FIELD_DETAILS: &str = "Details";
/// Lookup selector requesting study details.
pub const REQUIRED_FIELD_STUDY_DETAILS: &str = "Study Details";

/// Request body for the RadFlow patient/study lookup endpoint.
///
/// # Invariants
/// - Every key is always serialized; unused lookup keys are empty strings.
/// - Exactly one lookup key set is populated per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientLookupRequest {
    /// Patient identifier lookup key.
    pub patient_id: String,
    /// Phone lookup key, dialing prefix stripped.
    pub phone: String,
    /// First-name lookup key.
    pub first_name: String,
    /// Last-name lookup key.
    pub last_name: String,
    /// Birth-date lookup key.
    pub birth_date: String,
    /// Date-of-injury lookup key, in payload format.
    pub doi: String,
    /// Accession-number lookup key.
    pub accession_number: String,
    /// Which record family the upstream should return.
    pub required_field: String,
}

impl PatientLookupRequest {
    /// Builds a lookup by patient identifier.
    #[must_use]
    pub fn by_patient_id(patient_id: &str, required_field: &str) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            required_field: required_field.to_string(),
            ..Self::default()
        }
    }

    /// Builds a lookup by phone number, stripping a leading `+1` so both
    /// prefixed and bare inputs address the same stored record.
    #[must_use]
    pub fn by_phone(phone: &str) -> Self {
        Self {
            phone: strip_dialing_prefix(phone).to_string(),
            required_field: REQUIRED_FIELD_DETAILS.to_string(),
            ..Self::default()
        }
    }

    /// Builds a lookup by name and date of injury. `doi` must already be in
    /// payload format (`YYYY-MM-DD 00:00:00`).
    #[must_use]
    pub fn by_details(first_name: &str, last_name: &str, doi: String) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            doi,
            required_field: REQUIRED_FIELD_DETAILS.to_string(),
            ..Self::default()
        }
    }
}

// ============================================================================
// SECTION: To-Do Status
// ============================================================================

/// Request body for the bearer-authenticated to-do status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStatusRequest {
    /// Patient identifier.
    pub patient_id: String,
    /// Document type classifier.
    pub document_type_id: i64,
    /// Logged-in partner identifier.
    pub logged_partner_id: i64,
    /// Bearer token echoed in the body per the upstream contract.
    pub jwt_token: String,
    /// Patient preferred language.
    pub patient_preferred_language: String,
}

// ============================================================================
// SECTION: Casebook Lookups
// ============================================================================

/// Request body for the case-update-details and patient-report endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseLookupRequest {
    /// Patient identifier; this endpoint family spells the key `patientID`.
    #[serde(rename = "patientID")]
    pub patient_id: String,
}

/// Request body for the lien bill balance endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LienBalanceRequest {
    /// Patient identifier; this endpoint spells the key `patientId`.
    #[serde(rename = "patientId")]
    pub patient_id: String,
}

// ============================================================================
// SECTION: Case Update Write
// ============================================================================

/// Request body for the case update log write endpoint.
///
/// # Invariants
/// - Optional fields the caller did not supply are omitted from the wire,
///   never serialized as `null`.
/// - `event_status` mirrors `event_id` per the upstream contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseUpdateLogRequest {
    /// Patient identifier.
    pub patient_id: String,
    /// User performing the update.
    pub user_name: String,
    /// Event classifier.
    pub event_id: i64,
    /// Event status; mirrors the classifier.
    pub event_status: i64,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Expected liability clearance date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liability_expected_date: Option<String>,
    /// Expected payment date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_payment_date: Option<String>,
    /// Date the payment was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date_sent: Option<String>,
    /// Check number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,
    /// Check amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_amount: Option<f64>,
    /// Estimated payment send date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_payment_of_estimated_date: Option<String>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
