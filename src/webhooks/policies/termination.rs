//! Termination notification timeout policy.
//!
//! Azure accepts scheduled-event notification windows between 5 and 15
//! minutes inclusive.

use super::{ValidationContext, ValidationResult, template_path};
use crate::validation::FieldError;

/// Minimum termination notification timeout in minutes
pub const MIN_TERMINATE_NOTIFICATION_TIMEOUT: i32 = 5;
/// Maximum termination notification timeout in minutes
pub const MAX_TERMINATE_NOTIFICATION_TIMEOUT: i32 = 15;

/// Validate the termination notification timeout, if one is set
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    let Some(timeout) = ctx.resource.spec.template.terminate_notification_timeout else {
        return ValidationResult::allowed();
    };
    let path = template_path().child("terminateNotificationTimeout");

    if timeout < MIN_TERMINATE_NOTIFICATION_TIMEOUT {
        return ValidationResult::denied(FieldError::invalid(
            path,
            timeout,
            format!(
                "minimum timeout {} is allowed for TerminateNotificationTimeout",
                MIN_TERMINATE_NOTIFICATION_TIMEOUT
            ),
        ));
    }

    if timeout > MAX_TERMINATE_NOTIFICATION_TIMEOUT {
        return ValidationResult::denied(FieldError::invalid(
            path,
            timeout,
            format!(
                "maximum timeout {} is allowed for TerminateNotificationTimeout",
                MAX_TERMINATE_NOTIFICATION_TIMEOUT
            ),
        ));
    }

    ValidationResult::allowed()
}
