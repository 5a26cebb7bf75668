//! Admission entry points for AzureMachinePool.
//!
//! One method per admission operation. The HTTP layer decodes the review and
//! calls these; tests call them directly.

use std::sync::Arc;

use tracing::debug;

use crate::config::LookupConfig;
use crate::crd::AzureMachinePool;
use crate::feature::{Feature, FeatureGates};
use crate::lookup::ParentLookup;
use crate::validation::{AggregateError, FieldError};
use crate::webhooks::defaults::apply_defaults;
use crate::webhooks::policies::{ValidationContext, spec_path, validate_all};

/// Validates and defaults AzureMachinePool resources.
#[derive(Clone)]
pub struct MachinePoolAdmission {
    feature_gates: FeatureGates,
    parents: Arc<dyn ParentLookup>,
    lookup: LookupConfig,
}

impl MachinePoolAdmission {
    pub fn new(
        feature_gates: FeatureGates,
        parents: Arc<dyn ParentLookup>,
        lookup: LookupConfig,
    ) -> Self {
        Self {
            feature_gates,
            parents,
            lookup,
        }
    }

    /// Validate a new AzureMachinePool.
    ///
    /// Rejected outright while the MachinePool feature gate is disabled.
    pub async fn validate_create(
        &self,
        pool: &AzureMachinePool,
        namespace: Option<&str>,
    ) -> Result<(), AggregateError> {
        if !self.feature_gates.enabled(Feature::MachinePool) {
            debug!(name = ?pool.metadata.name, "MachinePool feature gate disabled");
            return Err(AggregateError(vec![FieldError::forbidden(
                spec_path(),
                format!(
                    "can be set only if the {} feature flag is enabled",
                    Feature::MachinePool
                ),
            )]));
        }

        validate_all(&self.context(pool, None, namespace)).await
    }

    /// Validate a change to an existing AzureMachinePool.
    pub async fn validate_update(
        &self,
        old: &AzureMachinePool,
        new: &AzureMachinePool,
        namespace: Option<&str>,
    ) -> Result<(), AggregateError> {
        validate_all(&self.context(new, Some(old), namespace)).await
    }

    /// Validate deletion; always allowed.
    pub fn validate_delete(&self, _pool: &AzureMachinePool) -> Result<(), AggregateError> {
        Ok(())
    }

    /// Apply defaults in place. Returns `false` if a defaulting step failed.
    pub fn default(&self, pool: &mut AzureMachinePool) -> bool {
        apply_defaults(pool)
    }

    fn context<'a>(
        &'a self,
        resource: &'a AzureMachinePool,
        old_resource: Option<&'a AzureMachinePool>,
        namespace: Option<&'a str>,
    ) -> ValidationContext<'a> {
        ValidationContext {
            resource,
            old_resource,
            namespace,
            parents: self.parents.as_ref(),
            lookup: self.lookup,
        }
    }
}
