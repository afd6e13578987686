// crates/radgate-mcp/src/tools.rs
// ============================================================================
// Module: Tool Registry
// Description: Static registry and handlers for every named operation.
// Purpose: Route tool calls through one uniform envelope-returning surface.
// Dependencies: radgate-core, radgate-upstream, async-trait, serde_json
// ============================================================================

//! ## Overview
//! The registry is built once at startup: a map from operation name to a
//! handler value with a uniform `call(arguments) -> envelope` signature.
//! There is no runtime introspection and no dynamic registration after
//! construction. Handlers compose the credential manager, gateway clients,
//! normalizer, and validation engine; argument decoding, date rules, and
//! event-conditioned validation all run before any upstream call, and every
//! failure resolves to the failure envelope rather than crossing the tool
//! boundary as an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use radgate_core::NormalizeKind;
use radgate_core::ToolEnvelope;
use radgate_core::ToolError;
use radgate_core::dates::doi_payload_value;
use radgate_core::normalize;
use radgate_core::strip_dialing_prefix;
use radgate_core::validate_case_update;
use radgate_upstream::AuthMode;
use radgate_upstream::CasebookEndpoints;
use radgate_upstream::CredentialManager;
use radgate_upstream::Gateway;
use radgate_upstream::RadflowEndpoints;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::requests::CaseLookupRequest;
use crate::requests::CaseUpdateLogRequest;
use crate::requests::LienBalanceRequest;
use crate::requests::PatientLookupRequest;
use crate::requests::REQUIRED_FIELD_DETAILS;
use crate::requests::REQUIRED_FIELD_STUDY_DETAILS;
use crate::requests::TodoStatusRequest;

// ============================================================================
// SECTION: Tool Spec
// ============================================================================

/// Describes one tool for `tools/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Stable operation name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema of the argument object.
    pub input_schema: Value,
}

// ============================================================================
// SECTION: Handler Trait
// ============================================================================

/// Uniform surface every tool handler exposes.
///
/// # Invariants
/// - `call` never panics and never returns anything but an envelope; every
///   failure path is a `{success: false, error}` value.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Returns the tool's listing entry.
    fn spec(&self) -> ToolSpec;

    /// Executes the tool against the given argument object.
    async fn call(&self, arguments: Value) -> ToolEnvelope;
}

// ============================================================================
// SECTION: Dependencies
// ============================================================================

/// Shared dependencies handed to every handler.
pub struct ToolDeps {
    /// Gateway for the RadFlow upstream.
    pub radflow: Arc<dyn Gateway>,
    /// Gateway for the Casebook upstream.
    pub casebook: Arc<dyn Gateway>,
    /// Partner token lifecycle owner.
    pub credentials: Arc<CredentialManager>,
    /// RadFlow endpoint table.
    pub radflow_endpoints: RadflowEndpoints,
    /// Casebook endpoint table.
    pub casebook_endpoints: CasebookEndpoints,
    /// Basic-auth user for Casebook calls.
    pub casebook_user: String,
    /// Basic-auth password for Casebook calls.
    pub casebook_password: String,
}

impl ToolDeps {
    /// Builds the basic-auth mode for one Casebook call.
    fn casebook_auth(&self) -> AuthMode {
        AuthMode::Basic {
            user: self.casebook_user.clone(),
            password: self.casebook_password.clone(),
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry construction errors.
#[derive(Debug, Error)]
pub enum ToolRegistryError {
    /// Two handlers claimed the same operation name.
    #[error("tool already registered: {name}")]
    Duplicate {
        /// The contested operation name.
        name: &'static str,
    },
}

/// Static map from operation name to handler.
///
/// # Invariants
/// - Operation names are unique.
/// - The registry is immutable once the server starts serving.
pub struct ToolRegistry {
    /// Handlers keyed by operation name.
    tools: BTreeMap<&'static str, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Builds the registry with every standard tool registered.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError`] when a name collision occurs.
    pub fn with_standard_tools(deps: ToolDeps) -> Result<Self, ToolRegistryError> {
        let deps = Arc::new(deps);
        let mut registry = Self::new();
        registry.register(Arc::new(FetchPatientById::new(&deps)))?;
        registry.register(Arc::new(FetchPatientByPhone::new(&deps)))?;
        registry.register(Arc::new(FetchPatientByDetails::new(&deps)))?;
        registry.register(Arc::new(FetchStudyDetails::new(&deps)))?;
        registry.register(Arc::new(GetPatientTodoStatus::new(&deps)))?;
        registry.register(Arc::new(GetCaseUpdateDetails::new(&deps)))?;
        registry.register(Arc::new(GetPatientReport::new(&deps)))?;
        registry.register(Arc::new(GetPatientLienBillBalance::new(&deps)))?;
        registry.register(Arc::new(InsertCaseUpdateLog::new(&deps)))?;
        Ok(registry)
    }

    /// Registers one handler under its spec name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::Duplicate`] when the name is taken.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), ToolRegistryError> {
        let name = handler.spec().name;
        if self.tools.contains_key(name) {
            return Err(ToolRegistryError::Duplicate {
                name,
            });
        }
        self.tools.insert(name, handler);
        Ok(())
    }

    /// Returns every tool listing entry, sorted by name.
    #[must_use]
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|handler| handler.spec()).collect()
    }

    /// Returns true when the operation name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatches one call; `None` when the operation name is unknown.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Option<ToolEnvelope> {
        let handler = self.tools.get(name)?;
        Some(handler.call(arguments).await)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Argument Decoding
// ============================================================================

/// Decodes the argument object into a typed shape.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

/// Resolves a handler outcome to the envelope, logging failures.
fn envelope_or_log(result: Result<ToolEnvelope, ToolError>) -> ToolEnvelope {
    result.unwrap_or_else(|error| {
        tracing::warn!(kind = error.kind(), error = %error, "tool call failed");
        ToolEnvelope::from(error)
    })
}

/// Serializes a typed request payload into a JSON body.
fn request_body<T: Serialize>(payload: &T) -> Result<Value, ToolError> {
    serde_json::to_value(payload).map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

/// Builds a strict object schema for a tool listing entry.
fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Arguments keyed by patient identifier alone.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatientIdArgs {
    /// Patient identifier.
    patient_id: String,
}

// ============================================================================
// SECTION: Patient Lookup Tools
// ============================================================================

/// Handler for `fetch_patient_by_id`.
struct FetchPatientById {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl FetchPatientById {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the lookup; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        let args: PatientIdArgs = parse_args(arguments)?;
        tracing::info!(patient_id = %args.patient_id, "fetching patient by id");
        let payload = PatientLookupRequest::by_patient_id(&args.patient_id, REQUIRED_FIELD_DETAILS);
        let raw = self
            .deps
            .radflow
            .call(&self.deps.radflow_endpoints.lookup, request_body(&payload)?, AuthMode::None)
            .await;
        Ok(normalize(raw, &NormalizeKind::Patients {
            fallback_phone: None,
        }))
    }
}

#[async_trait]
impl ToolHandler for FetchPatientById {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "fetch_patient_by_id",
            description: "Fetch patient information by ID from the patient-record service.",
            input_schema: object_schema(
                json!({
                    "patient_id": {"type": "string", "description": "The patient's ID"}
                }),
                &["patient_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

/// Handler for `fetch_patient_by_phone`.
struct FetchPatientByPhone {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl FetchPatientByPhone {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the lookup; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        /// Arguments for the phone lookup.
        #[derive(Debug, Deserialize)]
        #[serde(deny_unknown_fields)]
        struct PhoneArgs {
            /// Phone number, with or without a leading `+1`.
            phone: String,
        }

        let args: PhoneArgs = parse_args(arguments)?;
        let storage_phone = strip_dialing_prefix(&args.phone).to_string();
        tracing::info!(phone = %storage_phone, "fetching patient by phone");
        let payload = PatientLookupRequest::by_phone(&args.phone);
        let raw = self
            .deps
            .radflow
            .call(&self.deps.radflow_endpoints.lookup, request_body(&payload)?, AuthMode::None)
            .await;
        Ok(normalize(raw, &NormalizeKind::Patients {
            fallback_phone: Some(storage_phone),
        }))
    }
}

#[async_trait]
impl ToolHandler for FetchPatientByPhone {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "fetch_patient_by_phone",
            description: "Fetch patient data by phone number; a leading +1 is ignored for matching.",
            input_schema: object_schema(
                json!({
                    "phone": {"type": "string", "description": "Phone number to fetch data for"}
                }),
                &["phone"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

/// Handler for `fetch_patient_by_details`.
struct FetchPatientByDetails {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl FetchPatientByDetails {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the lookup; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        /// Arguments for the name-and-injury-date lookup.
        #[derive(Debug, Deserialize)]
        #[serde(deny_unknown_fields)]
        struct DetailsArgs {
            /// Patient first name.
            first_name: String,
            /// Patient last name.
            last_name: String,
            /// Date of injury, `MM/DD/YYYY` or `YYYY-MM-DD`.
            doi: String,
        }

        let args: DetailsArgs = parse_args(arguments)?;
        // Malformed dates fail here, before any upstream call.
        let doi = doi_payload_value(&args.doi)?;
        tracing::info!(
            first_name = %args.first_name,
            last_name = %args.last_name,
            "fetching patient by details"
        );
        let payload = PatientLookupRequest::by_details(&args.first_name, &args.last_name, doi);
        let raw = self
            .deps
            .radflow
            .call(&self.deps.radflow_endpoints.lookup, request_body(&payload)?, AuthMode::None)
            .await;
        Ok(normalize(raw, &NormalizeKind::Patients {
            fallback_phone: None,
        }))
    }
}

#[async_trait]
impl ToolHandler for FetchPatientByDetails {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "fetch_patient_by_details",
            description: "Fetch patient data by first name, last name, and date of injury.",
            input_schema: object_schema(
                json!({
                    "first_name": {"type": "string", "description": "Patient first name"},
                    "last_name": {"type": "string", "description": "Patient last name"},
                    "doi": {
                        "type": "string",
                        "description": "Date of injury (MM/DD/YYYY or YYYY-MM-DD)"
                    }
                }),
                &["first_name", "last_name", "doi"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

/// Handler for `fetch_study_details`.
struct FetchStudyDetails {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl FetchStudyDetails {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the lookup; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        let args: PatientIdArgs = parse_args(arguments)?;
        tracing::info!(patient_id = %args.patient_id, "fetching study details");
        let payload =
            PatientLookupRequest::by_patient_id(&args.patient_id, REQUIRED_FIELD_STUDY_DETAILS);
        let raw = self
            .deps
            .radflow
            .call(&self.deps.radflow_endpoints.lookup, request_body(&payload)?, AuthMode::None)
            .await;
        Ok(normalize(raw, &NormalizeKind::Studies {
            patient_id: args.patient_id,
        }))
    }
}

#[async_trait]
impl ToolHandler for FetchStudyDetails {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "fetch_study_details",
            description: "Fetch imaging study details for a patient by their ID.",
            input_schema: object_schema(
                json!({
                    "patient_id": {"type": "string", "description": "Patient ID to fetch studies for"}
                }),
                &["patient_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

// ============================================================================
// SECTION: Bearer-Authenticated Tools
// ============================================================================

/// Handler for `get_patient_todo_status`.
struct GetPatientTodoStatus {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl GetPatientTodoStatus {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the lookup; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        /// Arguments for the to-do status lookup.
        #[derive(Debug, Deserialize)]
        #[serde(deny_unknown_fields)]
        struct TodoStatusArgs {
            /// Patient identifier.
            patient_id: String,
            /// Document type classifier.
            #[serde(default = "default_document_type_id")]
            document_type_id: i64,
            /// Logged-in partner identifier.
            #[serde(default = "default_logged_partner_id")]
            logged_partner_id: i64,
            /// Patient preferred language.
            #[serde(default = "default_preferred_language")]
            patient_preferred_language: String,
        }

        /// Default document type classifier.
        fn default_document_type_id() -> i64 {
            21
        }

        /// Default logged partner identifier.
        fn default_logged_partner_id() -> i64 {
            1
        }

        /// Default preferred language.
        fn default_preferred_language() -> String {
            "english".to_string()
        }

        let args: TodoStatusArgs = parse_args(arguments)?;
        tracing::info!(patient_id = %args.patient_id, "fetching patient to-do status");
        let token = self.deps.credentials.get_token().await?;
        let payload = TodoStatusRequest {
            patient_id: args.patient_id,
            document_type_id: args.document_type_id,
            logged_partner_id: args.logged_partner_id,
            jwt_token: token.clone(),
            patient_preferred_language: args.patient_preferred_language,
        };
        let raw = self
            .deps
            .radflow
            .call(
                &self.deps.radflow_endpoints.todo_status,
                request_body(&payload)?,
                AuthMode::Bearer(token),
            )
            .await;
        Ok(normalize(raw, &NormalizeKind::Passthrough))
    }
}

#[async_trait]
impl ToolHandler for GetPatientTodoStatus {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "get_patient_todo_status",
            description: "Get the to-do status for a patient; authenticates with the partner token.",
            input_schema: object_schema(
                json!({
                    "patient_id": {"type": "string", "description": "The ID of the patient"},
                    "document_type_id": {
                        "type": "integer",
                        "description": "The type ID of the document",
                        "default": 21
                    },
                    "logged_partner_id": {
                        "type": "integer",
                        "description": "The ID of the logged-in partner",
                        "default": 1
                    },
                    "patient_preferred_language": {
                        "type": "string",
                        "description": "The patient's preferred language",
                        "default": "english"
                    }
                }),
                &["patient_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

// ============================================================================
// SECTION: Casebook Tools
// ============================================================================

/// Handler for `get_case_update_details`.
struct GetCaseUpdateDetails {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl GetCaseUpdateDetails {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the lookup; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        let args: PatientIdArgs = parse_args(arguments)?;
        tracing::info!(patient_id = %args.patient_id, "fetching case update details");
        let payload = CaseLookupRequest {
            patient_id: args.patient_id,
        };
        let raw = self
            .deps
            .casebook
            .call(
                &self.deps.casebook_endpoints.case_update_details,
                request_body(&payload)?,
                self.deps.casebook_auth(),
            )
            .await;
        Ok(normalize(raw, &NormalizeKind::Passthrough))
    }
}

#[async_trait]
impl ToolHandler for GetCaseUpdateDetails {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "get_case_update_details",
            description: "Fetch case update details for a given patient.",
            input_schema: object_schema(
                json!({
                    "patient_id": {"type": "string", "description": "The ID of the patient"}
                }),
                &["patient_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

/// Handler for `get_patient_report`.
struct GetPatientReport {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl GetPatientReport {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the lookup; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        let args: PatientIdArgs = parse_args(arguments)?;
        tracing::info!(patient_id = %args.patient_id, "fetching patient report");
        let payload = CaseLookupRequest {
            patient_id: args.patient_id,
        };
        let raw = self
            .deps
            .casebook
            .call(
                &self.deps.casebook_endpoints.patient_report,
                request_body(&payload)?,
                self.deps.casebook_auth(),
            )
            .await;
        Ok(normalize(raw, &NormalizeKind::Passthrough))
    }
}

#[async_trait]
impl ToolHandler for GetPatientReport {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "get_patient_report",
            description: "Fetch the report for a given patient.",
            input_schema: object_schema(
                json!({
                    "patient_id": {"type": "string", "description": "The ID of the patient"}
                }),
                &["patient_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

/// Handler for `get_patient_lien_bill_balance`.
struct GetPatientLienBillBalance {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl GetPatientLienBillBalance {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the lookup; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        let args: PatientIdArgs = parse_args(arguments)?;
        tracing::info!(patient_id = %args.patient_id, "fetching lien bill balance");
        let payload = LienBalanceRequest {
            patient_id: args.patient_id,
        };
        let raw = self
            .deps
            .casebook
            .call(
                &self.deps.casebook_endpoints.lien_bill_balance,
                request_body(&payload)?,
                self.deps.casebook_auth(),
            )
            .await;
        Ok(normalize(raw, &NormalizeKind::Passthrough))
    }
}

#[async_trait]
impl ToolHandler for GetPatientLienBillBalance {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "get_patient_lien_bill_balance",
            description: "Get patient lien bill balance details.",
            input_schema: object_schema(
                json!({
                    "patient_id": {"type": "string", "description": "The ID of the patient"}
                }),
                &["patient_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

/// Handler for `insert_case_update_log`.
struct InsertCaseUpdateLog {
    /// Shared dependencies.
    deps: Arc<ToolDeps>,
}

impl InsertCaseUpdateLog {
    /// Creates the handler.
    fn new(deps: &Arc<ToolDeps>) -> Self {
        Self {
            deps: Arc::clone(deps),
        }
    }

    /// Runs the write; errors become failure envelopes in `call`.
    async fn run(&self, arguments: Value) -> Result<ToolEnvelope, ToolError> {
        /// Arguments for the case update log write.
        #[derive(Debug, Deserialize)]
        #[serde(deny_unknown_fields)]
        struct CaseUpdateLogArgs {
            /// Patient identifier.
            patient_id: String,
            /// User performing the update.
            user_name: String,
            /// Event classifier.
            event_id: i64,
            /// Free-form notes.
            #[serde(default)]
            notes: Option<String>,
            /// Expected liability clearance date.
            #[serde(default)]
            liability_expected_date: Option<String>,
            /// Expected payment date.
            #[serde(default)]
            expected_payment_date: Option<String>,
            /// Date the payment was sent.
            #[serde(default)]
            payment_date_sent: Option<String>,
            /// Check number.
            #[serde(default)]
            check_number: Option<String>,
            /// Check amount.
            #[serde(default)]
            check_amount: Option<f64>,
            /// Estimated payment send date.
            #[serde(default)]
            send_payment_of_estimated_date: Option<String>,
        }

        let provided = arguments
            .as_object()
            .cloned()
            .ok_or_else(|| ToolError::InvalidArguments("arguments must be an object".to_string()))?;
        let args: CaseUpdateLogArgs = parse_args(arguments)?;
        // Event-conditioned rules run before any upstream call.
        validate_case_update(args.event_id, &provided)?;
        tracing::info!(
            patient_id = %args.patient_id,
            event_id = args.event_id,
            "inserting case update log"
        );
        let payload = CaseUpdateLogRequest {
            patient_id: args.patient_id,
            user_name: args.user_name,
            event_id: args.event_id,
            event_status: args.event_id,
            notes: args.notes,
            liability_expected_date: args.liability_expected_date,
            expected_payment_date: args.expected_payment_date,
            payment_date_sent: args.payment_date_sent,
            check_number: args.check_number,
            check_amount: args.check_amount,
            send_payment_of_estimated_date: args.send_payment_of_estimated_date,
        };
        let raw = self
            .deps
            .casebook
            .call(
                &self.deps.casebook_endpoints.insert_case_update_log,
                request_body(&payload)?,
                self.deps.casebook_auth(),
            )
            .await;
        Ok(normalize(raw, &NormalizeKind::Passthrough))
    }
}

#[async_trait]
impl ToolHandler for InsertCaseUpdateLog {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "insert_case_update_log",
            description: "Insert a case update log for a patient; required fields depend on event_id.",
            input_schema: object_schema(
                json!({
                    "patient_id": {"type": "string", "description": "The ID of the patient"},
                    "user_name": {"type": "string", "description": "The name of the user performing the action"},
                    "event_id": {"type": "integer", "description": "The ID of the event"},
                    "notes": {"type": "string", "description": "Notes for the log"},
                    "liability_expected_date": {
                        "type": "string",
                        "description": "Expected date for liability clearance (MM/DD/YYYY)"
                    },
                    "expected_payment_date": {
                        "type": "string",
                        "description": "Expected date for payment (MM/DD/YYYY)"
                    },
                    "payment_date_sent": {
                        "type": "string",
                        "description": "Date when payment was sent (MM/DD/YYYY)"
                    },
                    "check_number": {"type": "string", "description": "The check number"},
                    "check_amount": {"type": "number", "description": "The amount of the check"},
                    "send_payment_of_estimated_date": {
                        "type": "string",
                        "description": "Estimated date for sending payment (MM/DD/YYYY)"
                    }
                }),
                &["patient_id", "user_name", "event_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolEnvelope {
        envelope_or_log(self.run(arguments).await)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
