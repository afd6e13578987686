// crates/radgate-core/src/validate.rs
// ============================================================================
// Module: Validation Engine
// Description: Event-conditioned required-field rules for write operations.
// Purpose: Reject malformed case updates before any upstream call is made.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Case-update writes carry an event classifier that determines which
//! additional fields are mandatory. The rule table is static; validation
//! runs strictly before the upstream call and reports every missing field
//! at once so the caller gets a complete correction list in one round trip.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::error::ToolError;

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Required-field rule for one case-update event classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseUpdateRule {
    /// Event classifier the rule applies to.
    pub event_id: i64,
    /// Fields that must be present for this event.
    pub required_fields: &'static [&'static str],
}

/// Static table of event-conditioned required fields.
///
/// Event ids absent from the table require no additional fields.
pub const CASE_UPDATE_RULES: &[CaseUpdateRule] = &[
    CaseUpdateRule {
        event_id: 2,
        required_fields: &["liability_expected_date"],
    },
    CaseUpdateRule {
        event_id: 5,
        required_fields: &["expected_payment_date"],
    },
    CaseUpdateRule {
        event_id: 6,
        required_fields: &["payment_date_sent", "check_number", "check_amount"],
    },
    CaseUpdateRule {
        event_id: 7,
        required_fields: &["notes"],
    },
    CaseUpdateRule {
        event_id: 20,
        required_fields: &["send_payment_of_estimated_date"],
    },
];

/// Returns the required fields for an event classifier.
#[must_use]
pub fn required_fields_for(event_id: i64) -> &'static [&'static str] {
    CASE_UPDATE_RULES
        .iter()
        .find(|rule| rule.event_id == event_id)
        .map_or(&[], |rule| rule.required_fields)
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a case-update argument object against the event rule table.
///
/// Presence means the key exists, is not `null`, and — for strings — is not
/// blank. Numeric zero is present; an explicit amount of `0.0` is valid.
///
/// # Errors
///
/// Returns [`ToolError::Validation`] naming every missing field.
pub fn validate_case_update(event_id: i64, fields: &Map<String, Value>) -> Result<(), ToolError> {
    let missing: Vec<String> = required_fields_for(event_id)
        .iter()
        .filter(|name| !is_present(fields.get(**name)))
        .map(|name| (*name).to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ToolError::Validation {
        event_id,
        missing,
    })
}

/// Returns true when a field value counts as supplied.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(_) => true,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
