// crates/radgate-core/src/envelope.rs
// ============================================================================
// Module: Response Envelope
// Description: The uniform result shape every tool returns.
// Purpose: Guarantee callers one predictable schema for every outcome.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every tool resolves to a [`ToolEnvelope`]: exactly one success shape or
//! the failure shape, never both. `patients` is never `null` in serialized
//! output; zero matches surface as the failure shape with a not-found error.
//! The envelope is the one compatibility surface downstream consumers parse
//! (`response.patients[0].patient_id`), so field names and message strings
//! here are load-bearing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;
use crate::records::CanonicalPatientRecord;
use crate::records::CanonicalStudyRecord;

// ============================================================================
// SECTION: Success Shapes
// ============================================================================

/// Success envelope for patient lookup tools.
///
/// # Invariants
/// - `success` is always `true`.
/// - `patients` is non-empty; the empty case is a [`ToolFailure`].
/// - `message` is exactly `"Successfully processed N patients"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSuccess {
    /// Always `true`.
    pub success: bool,
    /// Human-readable processing summary.
    pub message: String,
    /// Canonical patient records, in upstream order.
    pub patients: Vec<CanonicalPatientRecord>,
    /// Enumerated `"{i}. {name} (ID: {id})"` lines for display.
    pub numbered_list: String,
}

/// Success envelope for study lookup tools.
///
/// # Invariants
/// - `success` is always `true`.
/// - `studies` is non-empty; the empty case is a [`ToolFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySuccess {
    /// Always `true`.
    pub success: bool,
    /// Human-readable processing summary.
    pub message: String,
    /// Canonical study records, in upstream order.
    pub studies: Vec<CanonicalStudyRecord>,
}

/// Success envelope for passthrough tools that return raw upstream data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSuccess {
    /// Always `true`.
    pub success: bool,
    /// Raw upstream response body.
    pub data: Value,
}

// ============================================================================
// SECTION: Failure Shape
// ============================================================================

/// Failure envelope shared by every tool.
///
/// # Invariants
/// - `success` is always `false`.
/// - `error` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFailure {
    /// Always `false`.
    pub success: bool,
    /// Caller-visible failure message.
    pub error: String,
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Tagged result returned by every tool.
///
/// # Invariants
/// - Exactly one shape is present; serialization is flat (no outer tag).
/// - No handler returns anything else past the tool boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolEnvelope {
    /// Patient lookup success.
    Patients(PatientSuccess),
    /// Study lookup success.
    Studies(StudySuccess),
    /// Passthrough success.
    Data(DataSuccess),
    /// Any failure.
    Failure(ToolFailure),
}

impl ToolEnvelope {
    /// Builds the patient success envelope, message, and numbered list.
    #[must_use]
    pub fn patients(records: Vec<CanonicalPatientRecord>) -> Self {
        let message = format!("Successfully processed {} patients", records.len());
        let numbered_list = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let name = format!("{} {}", record.first_name, record.last_name);
                format!("{}. {} (ID: {})", index + 1, name.trim(), record.patient_id)
            })
            .collect::<Vec<String>>()
            .join("\n");
        Self::Patients(PatientSuccess {
            success: true,
            message,
            patients: records,
            numbered_list,
        })
    }

    /// Builds the study success envelope for a patient's studies.
    #[must_use]
    pub fn studies(records: Vec<CanonicalStudyRecord>, patient_id: &str) -> Self {
        let message = format!(
            "Successfully retrieved {} studies for patient {patient_id}",
            records.len()
        );
        Self::Studies(StudySuccess {
            success: true,
            message,
            studies: records,
        })
    }

    /// Builds the passthrough success envelope around a raw upstream body.
    #[must_use]
    pub fn data(body: Value) -> Self {
        Self::Data(DataSuccess {
            success: true,
            data: body,
        })
    }

    /// Builds the failure envelope from a caller-visible message.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(ToolFailure {
            success: false,
            error: error.into(),
        })
    }

    /// Returns `true` for any success shape.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }
}

impl From<ToolError> for ToolEnvelope {
    fn from(error: ToolError) -> Self {
        Self::failure(error.to_string())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
