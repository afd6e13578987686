// crates/radgate-upstream/src/endpoints.rs
// ============================================================================
// Module: Endpoint Tables
// Description: Typed endpoint specs derived from validated configuration.
// Purpose: Keep every upstream URL in one place per service.
// Dependencies: radgate-config, url
// ============================================================================

//! ## Overview
//! Endpoint tables are built once from the validated config and handed to
//! tool handlers by reference. The partner token endpoint is special: the
//! partner API key travels as a query parameter, so it is attached here,
//! properly encoded, rather than string-formatted at call sites.

// ============================================================================
// SECTION: Imports
// ============================================================================

use radgate_config::CasebookConfig;
use radgate_config::RadflowConfig;
use url::Url;

use crate::client::EndpointSpec;
use crate::client::GatewayError;

// ============================================================================
// SECTION: RadFlow Endpoints
// ============================================================================

/// Endpoint table for the RadFlow patient-record service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadflowEndpoints {
    /// Patient and study lookup endpoint.
    pub lookup: EndpointSpec,
    /// Bearer-authenticated to-do status endpoint.
    pub todo_status: EndpointSpec,
}

impl RadflowEndpoints {
    /// Builds the table from a validated config section.
    #[must_use]
    pub fn from_config(config: &RadflowConfig) -> Self {
        Self {
            lookup: EndpointSpec::post("radflow.lookup", config.lookup_url.clone()),
            todo_status: EndpointSpec::post("radflow.todo_status", config.todo_status_url.clone()),
        }
    }
}

/// Builds the partner token endpoint with the API key attached as a query
/// parameter.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidUrl`] when the configured URL cannot be
/// parsed.
pub fn partner_token_endpoint(config: &RadflowConfig) -> Result<EndpointSpec, GatewayError> {
    let mut url = Url::parse(&config.partner_token_url)
        .map_err(|err| GatewayError::InvalidUrl(err.to_string()))?;
    url.query_pairs_mut().append_pair("partnerApiKey", &config.partner_api_key);
    Ok(EndpointSpec::post("radflow.partner_token", url.into()))
}

// ============================================================================
// SECTION: Casebook Endpoints
// ============================================================================

/// Endpoint table for the Casebook case-management service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasebookEndpoints {
    /// Case update details endpoint.
    pub case_update_details: EndpointSpec,
    /// Patient report endpoint.
    pub patient_report: EndpointSpec,
    /// Lien bill balance endpoint.
    pub lien_bill_balance: EndpointSpec,
    /// Case update log write endpoint.
    pub insert_case_update_log: EndpointSpec,
}

impl CasebookEndpoints {
    /// Builds the table from a validated config section.
    #[must_use]
    pub fn from_config(config: &CasebookConfig) -> Self {
        Self {
            case_update_details: EndpointSpec::post(
                "casebook.case_update_details",
                config.case_update_details_url.clone(),
            ),
            patient_report: EndpointSpec::post(
                "casebook.patient_report",
                config.patient_report_url.clone(),
            ),
            lien_bill_balance: EndpointSpec::post(
                "casebook.lien_bill_balance",
                config.lien_bill_balance_url.clone(),
            ),
            insert_case_update_log: EndpointSpec::post(
                "casebook.insert_case_update_log",
                config.insert_case_update_log_url.clone(),
            ),
        }
    }
}
