//! Rolling update strategy policy.
//!
//! A rolling update that may neither surge nor take instances down can
//! never make progress. Only integer values are compared; percentages pass.

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use super::{ValidationContext, ValidationResult, spec_path};
use crate::crd::DeploymentStrategyType;
use crate::validation::FieldError;

/// Validate that a rolling update can make progress
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    let strategy = &ctx.resource.spec.strategy;
    if strategy.strategy_type != DeploymentStrategyType::RollingUpdate {
        return ValidationResult::allowed();
    }
    let Some(rolling) = &strategy.rolling_update else {
        return ValidationResult::allowed();
    };

    if is_int_zero(&rolling.max_surge) && is_int_zero(&rolling.max_unavailable) {
        return ValidationResult::denied(FieldError::invalid(
            spec_path()
                .child("strategy")
                .child("rollingUpdate")
                .child("maxUnavailable"),
            0,
            "rolling update strategy MaxUnavailable must not be 0 if MaxSurge is 0",
        ));
    }

    ValidationResult::allowed()
}

fn is_int_zero(value: &IntOrString) -> bool {
    matches!(value, IntOrString::Int(0))
}
