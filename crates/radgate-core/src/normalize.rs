// crates/radgate-core/src/normalize.rs
// ============================================================================
// Module: Record Normalizer
// Description: Flattens heterogeneous upstream payloads into canonical shapes.
// Purpose: Give every tool one envelope regardless of which upstream answered.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Upstream lookup responses arrive wrapped in service-specific envelopes:
//! results nested under wrapper keys, string-encoded JSON inside JSON, bare
//! lists, or single objects. The normalizer unwraps any combination of
//! string-encoded and wrapper-key nesting down to a flat record list, maps
//! source field names (case-insensitive, with known synonyms) into the
//! canonical schema, and produces the uniform [`ToolEnvelope`]. Unwrapping
//! is bounded: payloads nested deeper than [`MAX_UNWRAP_DEPTH`] fail with a
//! parse error instead of looping on malformed data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::call::UpstreamCallResult;
use crate::dates::normalize_date_field;
use crate::envelope::ToolEnvelope;
use crate::error::ToolError;
use crate::records::CanonicalPatientRecord;
use crate::records::CanonicalStudyRecord;
use crate::records::StudyFacility;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum levels of wrapper-key or string-encoded nesting unwrapped.
pub const MAX_UNWRAP_DEPTH: usize = 5;

/// Wrapper keys recognized (case-insensitively) as result containers.
const WRAPPER_KEYS: &[&str] = &["result", "data", "patients", "studies", "items"];

// ============================================================================
// SECTION: Normalization Kind
// ============================================================================

/// Selects the canonical shape a raw upstream payload is normalized into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeKind {
    /// Patient lookup: records become [`CanonicalPatientRecord`]s.
    Patients {
        /// Phone the caller searched by, used when records omit their own.
        fallback_phone: Option<String>,
    },
    /// Study lookup: records become [`CanonicalStudyRecord`]s.
    Studies {
        /// Patient the studies belong to, echoed in the success message.
        patient_id: String,
    },
    /// No reshaping: the raw body is returned under `data`.
    Passthrough,
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Converts a raw upstream call outcome into the canonical envelope.
///
/// Failed calls map straight to the failure envelope without normalization.
/// Successful bodies are checked for an upstream-declared failure status,
/// then unwrapped and mapped per `kind`. Zero records after unwrapping is a
/// not-found failure, never an empty success.
#[must_use]
pub fn normalize(raw: UpstreamCallResult, kind: &NormalizeKind) -> ToolEnvelope {
    let body = match raw {
        UpstreamCallResult::Failure(failure) => return ToolEnvelope::from(ToolError::from(failure)),
        UpstreamCallResult::Success {
            body, ..
        } => body,
    };
    if let Some(error) = upstream_declared_failure(&body) {
        return ToolEnvelope::failure(error);
    }
    match kind {
        NormalizeKind::Passthrough => ToolEnvelope::data(body),
        NormalizeKind::Patients {
            fallback_phone,
        } => match unwrap_records(&body, 0) {
            Ok(records) => {
                let mut patients: Vec<CanonicalPatientRecord> = records
                    .iter()
                    .map(|record| map_patient(record, fallback_phone.as_deref()))
                    .collect();
                patients.retain(|patient| !patient.patient_id.is_empty());
                if patients.is_empty() {
                    ToolError::NotFound {
                        entity: "patients",
                    }
                    .into()
                } else {
                    ToolEnvelope::patients(patients)
                }
            }
            Err(error) => error.into(),
        },
        NormalizeKind::Studies {
            patient_id,
        } => match unwrap_records(&body, 0) {
            Ok(records) if records.is_empty() => ToolError::NotFound {
                entity: "studies",
            }
            .into(),
            Ok(records) => {
                ToolEnvelope::studies(records.iter().map(map_study).collect(), patient_id)
            }
            Err(error) => error.into(),
        },
    }
}

/// Detects an upstream-declared failure status in the response envelope.
fn upstream_declared_failure(body: &Value) -> Option<String> {
    let map = body.as_object()?;
    let status = field_value(map, &["responsestatus"])?.as_str()?;
    if status == "Success" {
        return None;
    }
    let message = field_value(map, &["exception"])
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map_or_else(|| "API response indicates failure".to_string(), ToString::to_string);
    Some(message)
}

// ============================================================================
// SECTION: Unwrapping
// ============================================================================

/// Unwraps wrapper-key and string-encoded nesting into a flat record list.
///
/// # Errors
///
/// Returns [`ToolError::Parse`] when a string layer is not valid JSON, when
/// a scalar appears where records are expected, or when nesting exceeds
/// [`MAX_UNWRAP_DEPTH`].
fn unwrap_records(value: &Value, depth: usize) -> Result<Vec<Map<String, Value>>, ToolError> {
    if depth > MAX_UNWRAP_DEPTH {
        return Err(ToolError::Parse(format!(
            "payload nesting exceeds {MAX_UNWRAP_DEPTH} levels"
        )));
    }
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text).map_err(|err| {
                ToolError::Parse(format!("string-encoded payload is not valid JSON: {err}"))
            })?;
            unwrap_records(&parsed, depth + 1)
        }
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(record) => records.push(record.clone()),
                    Value::String(_) | Value::Array(_) => {
                        records.extend(unwrap_records(item, depth + 1)?);
                    }
                    other => {
                        return Err(ToolError::Parse(format!(
                            "unexpected {} in record list",
                            json_type_name(other)
                        )));
                    }
                }
            }
            Ok(records)
        }
        Value::Object(map) => wrapper_value(map)
            .map_or_else(|| Ok(vec![map.clone()]), |inner| unwrap_records(inner, depth + 1)),
        other => Err(ToolError::Parse(format!("unexpected {} payload", json_type_name(other)))),
    }
}

/// Returns the value under the first recognized wrapper key, if any.
fn wrapper_value(map: &Map<String, Value>) -> Option<&Value> {
    WRAPPER_KEYS.iter().find_map(|wrapper| field_value(map, &[*wrapper]))
}

/// Returns a stable name for a JSON value's type.
const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Field Mapping
// ============================================================================

/// Strips the leading international dialing prefix for comparisons.
///
/// Output records preserve the upstream phone string; only lookups and
/// comparisons use the stripped form.
#[must_use]
pub fn strip_dialing_prefix(phone: &str) -> &str {
    phone.strip_prefix("+1").unwrap_or(phone)
}

/// Maps one flat upstream record into a canonical patient record.
fn map_patient(record: &Map<String, Value>, fallback_phone: Option<&str>) -> CanonicalPatientRecord {
    let phone = {
        let upstream = string_field(record, &["phone"]);
        if upstream.is_empty() {
            fallback_phone.unwrap_or_default().to_string()
        } else {
            upstream
        }
    };
    CanonicalPatientRecord {
        patient_id: string_field(record, &["patientid", "patient_id"]),
        first_name: string_field(record, &["firstname", "first_name"]).to_uppercase(),
        last_name: string_field(record, &["lastname", "last_name"]).to_uppercase(),
        phone,
        // Upstream pads this field with trailing spaces.
        sex: string_field(record, &["sex"]).trim().to_string(),
        financial_type: string_field(record, &["financialtypename", "financialtype", "financial_type"]),
        language: string_field(record, &["language"]),
        birth_date: date_field(record, &["birthdate", "birth_date"]),
        address: string_field(record, &["address"]),
        doi: date_field(record, &["doi"]),
        dol: date_field(record, &["dol"]),
        radiologist_name: string_field(record, &["radiologistname", "radiologist_name"]),
    }
}

/// Maps one flat upstream record into a canonical study record.
fn map_study(record: &Map<String, Value>) -> CanonicalStudyRecord {
    let mut status = "Unknown".to_string();
    let mut appointment_time = String::new();
    if let Some(Value::Array(entries)) = field_value(record, &["appointmentstatuses"]) {
        for entry in entries {
            let Some(entry) = entry.as_object() else {
                continue;
            };
            let latest = string_field(entry, &["status"]);
            if !latest.is_empty() {
                status = latest;
            }
            let scheduled = string_field(entry, &["scheduledfor"]);
            if !scheduled.is_empty() && scheduled != "Not Yet Scheduled" {
                appointment_time = scheduled;
            }
        }
    }
    let facility = field_value(record, &["facilityused"])
        .and_then(Value::as_array)
        .and_then(|used| used.first())
        .and_then(Value::as_object)
        .map_or_else(StudyFacility::default, |first| StudyFacility {
            facility_name: string_field(first, &["facilityname"]),
            address: string_field(first, &["address"]),
        });
    CanonicalStudyRecord {
        appointment_time,
        pre_arrival_minutes: CanonicalStudyRecord::DEFAULT_PRE_ARRIVAL_MINUTES,
        facility,
        study_description: string_field(record, &["studydescription"]),
        status,
        modality: string_field(record, &["modality"]),
        referring_physician: string_field(record, &["schedulername"]).trim().to_string(),
        insurance: String::new(),
        authorization_number: string_field(record, &["accessionnumber"]),
        study_date_time: string_field(record, &["studydatetime"]),
    }
}

/// Finds a field by any of its source names, case-insensitively.
fn field_value<'a>(record: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    record
        .iter()
        .find(|(key, _)| names.iter().any(|name| key.eq_ignore_ascii_case(name)))
        .map(|(_, value)| value)
}

/// Extracts a field as a string, stringifying scalars and defaulting empty.
fn string_field(record: &Map<String, Value>, names: &[&str]) -> String {
    match field_value(record, names) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

/// Extracts a date-like field, reformatting recognized `MM/DD/YYYY` values.
fn date_field(record: &Map<String, Value>, names: &[&str]) -> String {
    normalize_date_field(&string_field(record, names))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
