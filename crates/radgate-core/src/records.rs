// crates/radgate-core/src/records.rs
// ============================================================================
// Module: Canonical Records
// Description: Canonical patient and study record shapes.
// Purpose: Provide one schema for all upstream payload variants.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Upstream services disagree on field names, casing, and nesting. Every
//! tool response carries records in exactly the shapes defined here. Records
//! are constructed fresh per invocation by the normalizer and are never
//! cached or shared across invocations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Patient Record
// ============================================================================

/// Canonical patient record emitted by patient lookup tools.
///
/// # Invariants
/// - `patient_id` is non-empty whenever the enclosing envelope reports
///   success.
/// - Date fields (`birth_date`, `doi`, `dol`) are `YYYY-MM-DD` when the
///   upstream value was recognizably a date; unrecognized values pass
///   through verbatim.
/// - `phone` preserves the upstream string, including any `+1` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPatientRecord {
    /// Upstream patient identifier.
    pub patient_id: String,
    /// Patient first name, uppercased.
    pub first_name: String,
    /// Patient last name, uppercased.
    pub last_name: String,
    /// Contact phone number as returned by the upstream.
    pub phone: String,
    /// Patient sex, trimmed of upstream padding.
    pub sex: String,
    /// Financial classification (lien, insurance, ...).
    pub financial_type: String,
    /// Preferred language.
    pub language: String,
    /// Date of birth.
    pub birth_date: String,
    /// Mailing address.
    pub address: String,
    /// Date of injury.
    pub doi: String,
    /// Date of loss.
    pub dol: String,
    /// Reading radiologist name.
    pub radiologist_name: String,
}

// ============================================================================
// SECTION: Study Record
// ============================================================================

/// Facility reference attached to a study record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyFacility {
    /// Imaging facility display name.
    pub facility_name: String,
    /// Facility street address.
    pub address: String,
}

/// Canonical imaging study record emitted by `fetch_study_details`.
///
/// # Invariants
/// - `status` reflects the latest entry of the upstream appointment status
///   history; `"Unknown"` when the history carries no status.
/// - `facility` is taken from the first facility the upstream lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalStudyRecord {
    /// Scheduled appointment time; empty when not yet scheduled.
    pub appointment_time: String,
    /// Minutes the patient should arrive before the appointment.
    pub pre_arrival_minutes: u32,
    /// Facility performing the study.
    pub facility: StudyFacility,
    /// Study description.
    pub study_description: String,
    /// Latest appointment status.
    pub status: String,
    /// Imaging modality (MRI, CT, ...).
    pub modality: String,
    /// Referring physician, trimmed.
    pub referring_physician: String,
    /// Insurance carrier; the upstream does not supply one.
    pub insurance: String,
    /// Accession number used for authorization.
    pub authorization_number: String,
    /// Upstream study timestamp, passed through verbatim.
    pub study_date_time: String,
}

impl CanonicalStudyRecord {
    /// Default pre-arrival lead time in minutes.
    pub const DEFAULT_PRE_ARRIVAL_MINUTES: u32 = 30;
}
