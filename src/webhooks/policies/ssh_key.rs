//! SSH public key policy.

use super::{ValidationContext, ValidationResult, template_path};
use crate::validation::validate_ssh_key;

/// Validate the SSH public key, if one is set
///
/// An empty key is allowed here; defaulting generates one.
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    let key = &ctx.resource.spec.template.ssh_public_key;
    if key.is_empty() {
        return ValidationResult::allowed();
    }
    ValidationResult::from_errors(validate_ssh_key(
        key,
        &template_path().child("sshPublicKey"),
    ))
}
