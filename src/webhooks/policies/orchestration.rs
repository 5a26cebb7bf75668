//! VM scale set orchestration mode policy.
//!
//! Flexible orchestration needs cloud-provider-azure features that ship with
//! Kubernetes 1.26, so the parent MachinePool's version is checked. This is
//! the only policy that reads cluster state.

use semver::Version;
use tracing::debug;

use super::{ValidationContext, ValidationResult, spec_path};
use crate::crd::OrchestrationMode;
use crate::lookup::find_parent_with_retry;
use crate::validation::{FieldError, parse_tolerant};

/// Minimum Kubernetes version for Flexible orchestration mode
pub const MIN_FLEXIBLE_VERSION: Version = Version::new(1, 26, 0);

/// Validate the orchestration mode against the parent's Kubernetes version
pub async fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    if ctx.resource.spec.orchestration_mode != OrchestrationMode::Flexible {
        return ValidationResult::allowed();
    }

    let path = spec_path().child("orchestrationMode");
    let name = ctx.resource.metadata.name.as_deref().unwrap_or_default();

    let parent = match find_parent_with_retry(
        ctx.parents,
        ctx.namespace(),
        name,
        ctx.lookup.attempts,
        ctx.lookup.interval,
    )
    .await
    {
        Ok(parent) => parent,
        Err(e) => {
            return ValidationResult::denied(FieldError::lookup_failure(
                path,
                format!("failed to find parent MachinePool: {}", e),
            ));
        }
    };

    let Some(raw) = parent.kubernetes_version() else {
        return ValidationResult::denied(FieldError::required(
            path,
            "could not find Kubernetes version in MachinePool",
        ));
    };

    let version = match parse_tolerant(raw) {
        Ok(version) => version,
        Err(e) => {
            return ValidationResult::denied(FieldError::malformed(
                path,
                raw,
                format!("failed to parse Kubernetes version: {}", e),
            ));
        }
    };

    debug!(name = %name, version = %version, "Checking Flexible orchestration version");

    if version < MIN_FLEXIBLE_VERSION {
        return ValidationResult::denied(FieldError::invalid(
            path,
            OrchestrationMode::Flexible,
            format!(
                "specified Kubernetes version {} must be >= {} for Flexible orchestration mode",
                version, MIN_FLEXIBLE_VERSION
            ),
        ));
    }

    ValidationResult::allowed()
}
