//! Managed identity policies.
//!
//! Two policies share this module: user-assigned identities must match the
//! identity type, and the role assignment name used with a system-assigned
//! identity must be a GUID that never changes once set.

use super::{ValidationContext, ValidationResult, spec_path};
use crate::validation::{validate_system_assigned_identity, validate_user_assigned_identity};

/// Validate the user-assigned identity list
pub fn validate_user_assigned(ctx: &ValidationContext<'_>) -> ValidationResult {
    let spec = &ctx.resource.spec;
    ValidationResult::from_errors(validate_user_assigned_identity(
        spec.identity,
        &spec.user_assigned_identities,
        &spec_path().child("userAssignedIdentities"),
    ))
}

/// Validate the system-assigned identity role assignment name
pub fn validate_system_assigned(ctx: &ValidationContext<'_>) -> ValidationResult {
    let old_role = ctx
        .old_resource
        .map(|old| old.spec.role_assignment_name.as_str())
        .unwrap_or_default();
    let spec = &ctx.resource.spec;

    ValidationResult::from_errors(validate_system_assigned_identity(
        spec.identity,
        old_role,
        &spec.role_assignment_name,
        &spec_path().child("roleAssignmentName"),
    ))
}
