// crates/radgate-core/src/dates.rs
// ============================================================================
// Module: Date Normalization
// Description: Flexible parsing and canonical formatting for record dates.
// Purpose: Fail malformed dates fast, before any upstream call.
// Dependencies: time
// ============================================================================

//! ## Overview
//! Callers supply dates as `MM/DD/YYYY` or `YYYY-MM-DD`. Upstream request
//! payloads carry `YYYY-MM-DD 00:00:00`; canonical records carry
//! `YYYY-MM-DD`. Anything that matches neither pattern is rejected with
//! [`ToolError::InvalidDate`] without touching the network. Record fields
//! coming back *from* an upstream are normalized leniently: recognized
//! `MM/DD/YYYY` values are reformatted, everything else passes through.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::ToolError;

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Canonical `YYYY-MM-DD` format.
const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
/// Upstream-favored `MM/DD/YYYY` format.
const US_DATE: &[BorrowedFormatItem<'static>] = format_description!("[month]/[day]/[year]");

// ============================================================================
// SECTION: Strict Parsing
// ============================================================================

/// Parses a caller-supplied date in either accepted format.
///
/// # Errors
///
/// Returns [`ToolError::InvalidDate`] when the input matches neither
/// `YYYY-MM-DD` nor `MM/DD/YYYY`.
pub fn parse_flexible(value: &str) -> Result<Date, ToolError> {
    let trimmed = value.trim();
    Date::parse(trimmed, ISO_DATE).or_else(|_| Date::parse(trimmed, US_DATE)).map_err(|_| {
        ToolError::InvalidDate {
            value: value.to_string(),
        }
    })
}

/// Formats a caller-supplied date for an upstream request payload.
///
/// # Errors
///
/// Returns [`ToolError::InvalidDate`] when the input is not a recognized
/// date.
pub fn doi_payload_value(value: &str) -> Result<String, ToolError> {
    let date = parse_flexible(value)?;
    Ok(format!("{} 00:00:00", format_iso(date)?))
}

/// Formats a caller-supplied date for a canonical record field.
///
/// # Errors
///
/// Returns [`ToolError::InvalidDate`] when the input is not a recognized
/// date.
pub fn doi_canonical_value(value: &str) -> Result<String, ToolError> {
    format_iso(parse_flexible(value)?)
}

// ============================================================================
// SECTION: Lenient Record Normalization
// ============================================================================

/// Normalizes a date-like field taken from an upstream record.
///
/// Recognized `MM/DD/YYYY` values become `YYYY-MM-DD`; values already in
/// canonical form or in any unrecognized shape pass through verbatim.
#[must_use]
pub fn normalize_date_field(value: &str) -> String {
    let trimmed = value.trim();
    if let Ok(date) = Date::parse(trimmed, US_DATE)
        && let Ok(formatted) = format_iso(date)
    {
        return formatted;
    }
    value.to_string()
}

/// Formats a date as `YYYY-MM-DD`.
fn format_iso(date: Date) -> Result<String, ToolError> {
    date.format(ISO_DATE).map_err(|_| ToolError::InvalidDate {
        value: date.to_string(),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
