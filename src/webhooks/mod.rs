//! Admission webhooks for AzureMachinePool.
//!
//! - Mutating webhook: fills defaults (SSH key, identity, diagnostics,
//!   network interfaces) and answers with a JSON patch
//! - Validating webhook: runs every validation policy and reports all
//!   field errors in one denial

pub mod admission;
pub mod defaults;
mod patch;
pub mod policies;
mod server;

pub use admission::MachinePoolAdmission;
pub use defaults::apply_defaults;
pub use policies::{ValidationContext, ValidationResult, validate_all};
pub use server::{
    MUTATE_PATH, VALIDATE_PATH, WebhookState, create_webhook_router, defaulting_patch,
    mutate_azuremachinepool, run_webhook_server, validate_azuremachinepool,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
