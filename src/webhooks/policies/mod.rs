//! Validation policies for AzureMachinePool admission webhooks.
//!
//! Every policy checks one rule and reports field errors; none of them stop
//! the others. [`validate_all`] runs all nine and returns every failure at
//! once so a user can fix a manifest in one pass.
//!
//! Only the orchestration mode policy talks to the API server (to find the
//! parent MachinePool); the rest are pure functions of the resource.

pub mod diagnostics;
pub mod identity;
pub mod image;
pub mod network;
pub mod orchestration;
pub mod ssh_key;
pub mod strategy;
pub mod termination;

use crate::config::LookupConfig;
use crate::crd::AzureMachinePool;
use crate::lookup::ParentLookup;
use crate::validation::{AggregateError, ErrorList, FieldError, FieldPath};

/// Result of a single policy check
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Field errors found; empty when the policy passed
    pub errors: ErrorList,
}

impl ValidationResult {
    /// Create an allowed result
    pub fn allowed() -> Self {
        Self::default()
    }

    /// Create a result denied by one field error
    pub fn denied(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Create a result from the errors of a shared validator
    pub fn from_errors(errors: ErrorList) -> Self {
        Self { errors }
    }

    /// Whether the policy passed
    pub fn is_allowed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Context for validation
pub struct ValidationContext<'a> {
    /// The resource being validated
    pub resource: &'a AzureMachinePool,
    /// The resource before this change (UPDATE operations only)
    pub old_resource: Option<&'a AzureMachinePool>,
    /// The namespace of the request
    pub namespace: Option<&'a str>,
    /// Finds the parent MachinePool
    pub parents: &'a dyn ParentLookup,
    /// Retry policy for `parents`
    pub lookup: LookupConfig,
}

impl<'a> ValidationContext<'a> {
    /// Namespace to search for related resources in
    pub fn namespace(&self) -> Option<&'a str> {
        self.namespace
            .or(self.resource.metadata.namespace.as_deref())
    }
}

/// Path of `spec`
pub(crate) fn spec_path() -> FieldPath {
    FieldPath::new("spec")
}

/// Path of `spec.template`
pub(crate) fn template_path() -> FieldPath {
    spec_path().child("template")
}

/// Run all validation policies and aggregate their errors
pub async fn validate_all(ctx: &ValidationContext<'_>) -> Result<(), AggregateError> {
    let results = [
        image::validate(ctx),
        termination::validate(ctx),
        ssh_key::validate(ctx),
        identity::validate_user_assigned(ctx),
        diagnostics::validate(ctx),
        orchestration::validate(ctx).await,
        strategy::validate(ctx),
        identity::validate_system_assigned(ctx),
        network::validate(ctx),
    ];

    AggregateError::from_list(results.into_iter().flat_map(|r| r.errors).collect())
}
