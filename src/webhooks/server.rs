//! Admission webhook server.
//!
//! Provides HTTP endpoints for Kubernetes admission webhooks.
//!
//! To enable webhooks:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration and a MutatingWebhookConfiguration
//!    pointing at the paths below
//! 3. Mount the TLS certificate secret to the webhook pod at /etc/webhook/certs/

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use json_patch::Patch;
use kube::Resource;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::crd::AzureMachinePool;
use crate::error::{Error, Result};
use crate::health::HealthState;
use crate::validation::AggregateError;
use crate::webhooks::admission::MachinePoolAdmission;
use crate::webhooks::patch::rebase;

/// Path of the validating webhook
pub const VALIDATE_PATH: &str = "/validate-infrastructure-cluster-x-k8s-io-v1beta1-azuremachinepool";
/// Path of the mutating webhook
pub const MUTATE_PATH: &str = "/mutate-infrastructure-cluster-x-k8s-io-v1beta1-azuremachinepool";

const VALIDATE_WEBHOOK: &str = "validate";
const MUTATE_WEBHOOK: &str = "mutate";

type ReviewResponse = (StatusCode, Json<AdmissionReview<DynamicObject>>);

/// Shared state for webhook handlers
pub struct WebhookState {
    pub admission: MachinePoolAdmission,
    pub health: Arc<HealthState>,
}

impl WebhookState {
    pub fn new(admission: MachinePoolAdmission, health: Arc<HealthState>) -> Self {
        Self { admission, health }
    }
}

/// A rejected request, before it is rendered into a review.
struct Denial {
    reason: String,
    message: String,
}

impl Denial {
    fn invalid_request(message: &str) -> Self {
        Self {
            reason: "InvalidRequest".to_string(),
            message: message.to_string(),
        }
    }
}

impl From<AggregateError> for Denial {
    fn from(err: AggregateError) -> Self {
        Self {
            reason: err.reason().to_string(),
            message: err.to_string(),
        }
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason<T: Resource<DynamicType = ()>>(
    request: &AdmissionRequest<T>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request)
        .deny(full_message)
        .into_review()
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// The 400 response for a review that cannot be decoded.
fn invalid_review(e: impl std::fmt::Display) -> ReviewResponse {
    error!(error = %e, "Failed to extract admission request");
    (
        StatusCode::BAD_REQUEST,
        Json(AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e)).into_review()),
    )
}

/// Extract the typed request, or build the 400 response for a bad review.
#[allow(clippy::result_large_err)]
fn extract_request(
    review: AdmissionReview<AzureMachinePool>,
) -> std::result::Result<AdmissionRequest<AzureMachinePool>, ReviewResponse> {
    review.try_into().map_err(invalid_review)
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(VALIDATE_PATH, post(validate_azuremachinepool))
        .route(MUTATE_PATH, post(mutate_azuremachinepool))
        .with_state(state)
}

/// Validating webhook handler
pub async fn validate_azuremachinepool(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<AzureMachinePool>>,
) -> ReviewResponse {
    let start = Instant::now();
    let request = match extract_request(review) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let uid = &request.uid;
    let operation = operation_label(&request.operation);
    debug!(
        uid = %uid,
        operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing validation request"
    );

    let outcome = run_validation(&state.admission, &request).await;
    let response = match outcome {
        Ok(()) => {
            info!(uid = %uid, operation, "Admission request allowed");
            AdmissionResponse::from(&request).into_review()
        }
        Err(denial) => {
            warn!(
                uid = %uid,
                operation,
                reason = %denial.reason,
                message = %denial.message,
                "Admission request denied"
            );
            state.health.metrics.record_denial(VALIDATE_WEBHOOK, operation);
            deny_with_reason(&request, &denial.message, &denial.reason)
        }
    };

    state.health.metrics.record_admission(
        VALIDATE_WEBHOOK,
        operation,
        start.elapsed().as_secs_f64(),
    );
    (StatusCode::OK, Json(response))
}

async fn run_validation(
    admission: &MachinePoolAdmission,
    request: &AdmissionRequest<AzureMachinePool>,
) -> std::result::Result<(), Denial> {
    let namespace = request.namespace.as_deref();
    match request.operation {
        Operation::Create => {
            let pool = request
                .object
                .as_ref()
                .ok_or_else(|| Denial::invalid_request("Missing object in request"))?;
            admission.validate_create(pool, namespace).await?;
        }
        Operation::Update => {
            let pool = request
                .object
                .as_ref()
                .ok_or_else(|| Denial::invalid_request("Missing object in request"))?;
            let old = request
                .old_object
                .as_ref()
                .ok_or_else(|| Denial::invalid_request("Missing old object in UPDATE request"))?;
            admission.validate_update(old, pool, namespace).await?;
        }
        Operation::Delete => {
            if let Some(old) = &request.old_object {
                admission.validate_delete(old)?;
            }
        }
        Operation::Connect => {}
    }
    Ok(())
}

/// Mutating webhook handler
///
/// The review is kept as raw JSON alongside the typed view so the patch
/// targets the object exactly as the API server sent it.
pub async fn mutate_azuremachinepool(
    State(state): State<Arc<WebhookState>>,
    Json(body): Json<Value>,
) -> ReviewResponse {
    let start = Instant::now();
    let object = body
        .pointer("/request/object")
        .filter(|object| !object.is_null())
        .cloned();
    let review: AdmissionReview<AzureMachinePool> = match serde_json::from_value(body) {
        Ok(review) => review,
        Err(e) => return invalid_review(e),
    };
    let request = match extract_request(review) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let uid = &request.uid;
    let operation = operation_label(&request.operation);
    debug!(
        uid = %uid,
        operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing defaulting request"
    );

    let response = match (&request.operation, &object) {
        (Operation::Create | Operation::Update, Some(object)) => {
            let (patch, ok) = match defaulting_patch(&state.admission, object) {
                Ok(result) => result,
                Err(e) => {
                    error!(uid = %uid, error = %e, "Failed to compute defaulting patch");
                    state.health.metrics.record_denial(MUTATE_WEBHOOK, operation);
                    return (
                        StatusCode::OK,
                        Json(deny_with_reason(&request, &e.to_string(), "InternalError")),
                    );
                }
            };
            if !ok {
                state.health.metrics.record_defaulting_failure();
            }
            debug!(uid = %uid, operations = patch.0.len(), "Applying defaults");
            match AdmissionResponse::from(&request).with_patch(patch) {
                Ok(response) => response.into_review(),
                Err(e) => {
                    error!(uid = %uid, error = %e, "Failed to serialize defaulting patch");
                    state.health.metrics.record_denial(MUTATE_WEBHOOK, operation);
                    deny_with_reason(&request, &e.to_string(), "InternalError")
                }
            }
        }
        (Operation::Create | Operation::Update, None) => {
            state.health.metrics.record_denial(MUTATE_WEBHOOK, operation);
            deny_with_reason(&request, "Missing object in request", "InvalidRequest")
        }
        _ => AdmissionResponse::from(&request).into_review(),
    };

    state.health.metrics.record_admission(
        MUTATE_WEBHOOK,
        operation,
        start.elapsed().as_secs_f64(),
    );
    (StatusCode::OK, Json(response))
}

/// Compute the JSON patch that applies defaults to the raw `object`.
///
/// The patch applies to `object` as given, including fields it omits. The
/// flag is `false` if a defaulting step failed; the patch still carries every
/// default that was applied.
pub fn defaulting_patch(
    admission: &MachinePoolAdmission,
    object: &Value,
) -> Result<(Patch, bool)> {
    let pool: AzureMachinePool = serde_json::from_value(object.clone())?;
    let mut defaulted = pool.clone();
    let ok = admission.default(&mut defaulted);
    let patch = rebase(
        object,
        &serde_json::to_value(&pool)?,
        &serde_json::to_value(&defaulted)?,
    )?;
    Ok((patch, ok))
}

/// Run the webhook server with TLS
///
/// The process is ready only while the listener is bound. Readiness is
/// cleared whenever the server stops, including when it fails to start.
pub async fn run_webhook_server(
    state: Arc<WebhookState>,
    port: u16,
    cert_path: &str,
    key_path: &str,
) -> Result<()> {
    let health = state.health.clone();
    let result = serve_tls(state, port, cert_path, key_path).await;
    health.set_ready(false).await;
    result
}

async fn serve_tls(
    state: Arc<WebhookState>,
    port: u16,
    cert_path: &str,
    key_path: &str,
) -> Result<()> {
    use axum_server::Handle;
    use axum_server::tls_rustls::RustlsConfig;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let health = state.health.clone();
    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path))
        .await
        .map_err(|e| Error::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let handle = Handle::new();
    let server = axum_server::bind_rustls(addr, config)
        .handle(handle.clone())
        .serve(app.into_make_service());

    // `listening` resolves to None if the bind fails
    let mark_ready = async {
        if let Some(bound) = handle.listening().await {
            info!(port = bound.port(), "Webhook server listening with TLS");
            health.set_ready(true).await;
        }
    };

    let (served, ()) = tokio::join!(server, mark_ready);
    served.map_err(|e| Error::Server(e.to_string()))
}
