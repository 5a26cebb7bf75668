//! OS image policy.

use super::{ValidationContext, ValidationResult, template_path};
use crate::validation::validate_image;

/// Validate the image reference, if one is set
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    match &ctx.resource.spec.template.image {
        Some(image) => {
            ValidationResult::from_errors(validate_image(image, &template_path().child("image")))
        }
        None => ValidationResult::allowed(),
    }
}
