//! Network configuration policy.
//!
//! The deprecated template-level `subnetName` and the `networkInterfaces`
//! list describe the same thing; only one may be used.

use super::{ValidationContext, ValidationResult, template_path};
use crate::validation::FieldError;

/// Validate that `subnetName` and `networkInterfaces` are not both set
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    let template = &ctx.resource.spec.template;

    if !template.network_interfaces.is_empty() && !template.subnet_name.is_empty() {
        return ValidationResult::denied(FieldError::invalid(
            template_path().child("networkInterfaces"),
            &template.subnet_name,
            "cannot set both NetworkInterfaces and machine SubnetName",
        ));
    }

    ValidationResult::allowed()
}
