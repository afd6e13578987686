// crates/radgate-config/src/config.rs
// ============================================================================
// Module: Configuration Model
// Description: Server and upstream configuration with fail-closed validation.
// Purpose: Reject misconfigured deployments before any socket is opened.
// Dependencies: serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! [`RadgateConfig`] is the single source of deployment truth: listener bind
//! address, the RadFlow patient-record upstream, and the Casebook
//! case-management upstream. `validate()` enforces every structural limit;
//! `load()` composes file parsing, environment overrides, and validation so
//! callers get a config that is either fully usable or rejected with a
//! specific reason.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted URL length.
pub const MAX_URL_LENGTH: usize = 2048;
/// Maximum accepted credential length.
pub const MAX_CREDENTIAL_LENGTH: usize = 512;
/// Maximum accepted upstream timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Environment override for the RadFlow partner API key.
pub(crate) const ENV_PARTNER_API_KEY: &str = "RADGATE_PARTNER_API_KEY";
/// Environment override for the Casebook API user.
pub(crate) const ENV_CASEBOOK_USER: &str = "RADGATE_CASEBOOK_USER";
/// Environment override for the Casebook API password.
pub(crate) const ENV_CASEBOOK_PASSWORD: &str = "RADGATE_CASEBOOK_PASSWORD";
/// Environment override for the listener bind address.
pub(crate) const ENV_BIND_ADDR: &str = "RADGATE_BIND_ADDR";

/// Default upstream request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// SECTION: Error
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages name the offending field so operators can fix one thing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {detail}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O detail.
        detail: String,
    },
    /// The config file was not valid TOML for this model.
    #[error("failed to parse config file {path}: {detail}")]
    Parse {
        /// Path that was attempted.
        path: String,
        /// Underlying parse detail.
        detail: String,
    },
    /// A validation rule rejected the config.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Server Section
// ============================================================================

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the JSON-RPC listener binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8001".to_string(),
        }
    }
}

// ============================================================================
// SECTION: RadFlow Section
// ============================================================================

/// RadFlow patient-record upstream configuration.
///
/// # Invariants
/// - `partner_api_key` is never defaulted; it must come from the file or
///   the environment override.
/// - `danger_accept_invalid_certs` defaults to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadflowConfig {
    /// Patient and study lookup endpoint.
    pub lookup_url: String,
    /// Patient to-do status endpoint (bearer-authenticated).
    pub todo_status_url: String,
    /// Partner token refresh endpoint.
    pub partner_token_url: String,
    /// Partner API key presented to the token endpoint.
    pub partner_api_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Skip TLS certificate verification for this upstream. Deliberate
    /// opt-in for internal networks with private certificate authorities.
    pub danger_accept_invalid_certs: bool,
}

impl Default for RadflowConfig {
    fn default() -> Self {
        Self {
            lookup_url:
                "https://app.radflow360.com/chatbotapi/Patient/GetPatientStudyRelatedDetails"
                    .to_string(),
            todo_status_url:
                "https://app.radflow360.com/patientportalapi/Patient/GetPatientToDoStatus"
                    .to_string(),
            partner_token_url:
                "https://app.radflow360.com/patientportalapi/Partner/GetRefreshToken".to_string(),
            partner_api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            danger_accept_invalid_certs: false,
        }
    }
}

// ============================================================================
// SECTION: Casebook Section
// ============================================================================

/// Casebook case-management upstream configuration.
///
/// # Invariants
/// - `api_user` and `api_password` are never defaulted.
/// - `danger_accept_invalid_certs` defaults to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CasebookConfig {
    /// Case update details endpoint.
    pub case_update_details_url: String,
    /// Patient report endpoint.
    pub patient_report_url: String,
    /// Lien bill balance endpoint.
    pub lien_bill_balance_url: String,
    /// Case update log write endpoint.
    pub insert_case_update_log_url: String,
    /// Basic-auth user for every Casebook call.
    pub api_user: String,
    /// Basic-auth password for every Casebook call.
    pub api_password: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Skip TLS certificate verification for this upstream. Deliberate
    /// opt-in for internal networks with private certificate authorities.
    pub danger_accept_invalid_certs: bool,
}

impl Default for CasebookConfig {
    fn default() -> Self {
        Self {
            case_update_details_url:
                "https://app.radflow360.com/chatbotapi/GetCaseUpdateDetailsChatbot".to_string(),
            patient_report_url: "https://app.radflow360.com/chatbotapi/GetPatientReportChatbot"
                .to_string(),
            lien_bill_balance_url:
                "https://app.radflow360.com/chatbotapi/GetPatientLienBillBalanceDetails"
                    .to_string(),
            insert_case_update_log_url:
                "https://app.radflow360.com/chatbotapi/InsertCaseUpdateLogChatbot".to_string(),
            api_user: String::new(),
            api_password: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            danger_accept_invalid_certs: false,
        }
    }
}

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root Radgate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadgateConfig {
    /// Listener configuration.
    pub server: ServerConfig,
    /// RadFlow upstream configuration.
    pub radflow: RadflowConfig,
    /// Casebook upstream configuration.
    pub casebook: CasebookConfig,
}

impl RadgateConfig {
    /// Loads, overrides, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when validation rejects the resulting config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides for secrets and the bind address.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var(ENV_PARTNER_API_KEY) {
            self.radflow.partner_api_key = value;
        }
        if let Ok(value) = env::var(ENV_CASEBOOK_USER) {
            self.casebook.api_user = value;
        }
        if let Ok(value) = env::var(ENV_CASEBOOK_PASSWORD) {
            self.casebook.api_password = value;
        }
        if let Ok(value) = env::var(ENV_BIND_ADDR) {
            self.server.bind_addr = value;
        }
    }

    /// Validates every structural rule of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| invalid(format!("bind address is invalid: {}", self.server.bind_addr)))?;

        validate_url("radflow.lookup_url", &self.radflow.lookup_url)?;
        validate_url("radflow.todo_status_url", &self.radflow.todo_status_url)?;
        validate_url("radflow.partner_token_url", &self.radflow.partner_token_url)?;
        validate_credential("radflow.partner_api_key", &self.radflow.partner_api_key)?;
        validate_timeout("radflow.timeout_secs", self.radflow.timeout_secs)?;

        validate_url("casebook.case_update_details_url", &self.casebook.case_update_details_url)?;
        validate_url("casebook.patient_report_url", &self.casebook.patient_report_url)?;
        validate_url("casebook.lien_bill_balance_url", &self.casebook.lien_bill_balance_url)?;
        validate_url(
            "casebook.insert_case_update_log_url",
            &self.casebook.insert_case_update_log_url,
        )?;
        validate_credential("casebook.api_user", &self.casebook.api_user)?;
        validate_credential("casebook.api_password", &self.casebook.api_password)?;
        validate_timeout("casebook.timeout_secs", self.casebook.timeout_secs)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Field Rules
// ============================================================================

/// Builds the invalid-config error variant.
fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

/// Validates one endpoint URL field.
fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("url must be non-empty: {field}")));
    }
    if value.len() > MAX_URL_LENGTH {
        return Err(invalid(format!("url too long: {field}")));
    }
    let parsed = Url::parse(value).map_err(|_| invalid(format!("url is invalid: {field}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(invalid(format!("unsupported url scheme '{other}': {field}")));
        }
    }
    if parsed.host_str().is_none() {
        return Err(invalid(format!("url host required: {field}")));
    }
    Ok(())
}

/// Validates one credential field.
fn validate_credential(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("credential must be non-empty: {field}")));
    }
    if value.len() > MAX_CREDENTIAL_LENGTH {
        return Err(invalid(format!("credential too long: {field}")));
    }
    Ok(())
}

/// Validates one timeout field.
fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_TIMEOUT_SECS {
        return Err(invalid(format!(
            "timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds: {field}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
