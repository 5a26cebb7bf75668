//! Managed identity validation.

use std::sync::LazyLock;

use uuid::Uuid;

use crate::crd::{UserAssignedIdentity, VmIdentity};

use super::field::{ErrorList, FieldError, FieldPath};

/// Prefix Cluster API uses for Azure provider IDs.
pub const AZURE_PROVIDER_PREFIX: &str = "azure://";

/// Check if a string is an Azure resource ID, with or without the `azure://` prefix.
///
/// Expected shape:
/// `/subscriptions/<id>/resourceGroups/<rg>/providers/<namespace>/<type>/<name>[/<type>/<name>...]`
pub fn is_valid_resource_id(id: &str) -> bool {
    // Pattern: ^/subscriptions/[^/]+/resourceGroups/[^/]+/providers/[^/]+(/[^/]+/[^/]+)+$
    static RESOURCE_ID_RE: LazyLock<Option<regex::Regex>> = LazyLock::new(|| {
        regex::Regex::new(
            r"(?i)^/subscriptions/[^/]+/resourceGroups/[^/]+/providers/[^/]+(/[^/]+/[^/]+)+$",
        )
        .ok()
    });
    let trimmed = id.strip_prefix(AZURE_PROVIDER_PREFIX).unwrap_or(id);
    RESOURCE_ID_RE
        .as_ref()
        .is_some_and(|re| re.is_match(trimmed))
}

/// Validate the user-assigned identity list against the identity type.
pub fn validate_user_assigned_identity(
    identity: VmIdentity,
    identities: &[UserAssignedIdentity],
    path: &FieldPath,
) -> ErrorList {
    let mut errs = ErrorList::new();

    if identity != VmIdentity::UserAssigned {
        if !identities.is_empty() {
            errs.push(FieldError::forbidden(
                path.clone(),
                format!(
                    "must not be set when the identity type is '{}'",
                    identity
                ),
            ));
        }
        return errs;
    }

    if identities.is_empty() {
        errs.push(FieldError::required(
            path.clone(),
            "must be specified for the 'UserAssigned' identity type",
        ));
    }

    for (i, user_identity) in identities.iter().enumerate() {
        let provider_id = &user_identity.provider_id;
        if !provider_id.is_empty() && !is_valid_resource_id(provider_id) {
            errs.push(FieldError::invalid(
                path.index(i).child("providerID"),
                provider_id,
                "must be a valid Azure resource ID",
            ));
        }
    }

    errs
}

/// Validate the role assignment name used with a system-assigned identity.
///
/// `old_role` is the name before this update, empty on create.
pub fn validate_system_assigned_identity(
    identity: VmIdentity,
    old_role: &str,
    new_role: &str,
    path: &FieldPath,
) -> ErrorList {
    let mut errs = ErrorList::new();

    if identity == VmIdentity::SystemAssigned {
        if Uuid::parse_str(new_role).is_err() {
            errs.push(FieldError::invalid(
                path.clone(),
                new_role,
                "role assignment name must be a valid GUID. It is optional and will be auto-generated when not specified",
            ));
        }
        if !old_role.is_empty() && old_role != new_role {
            errs.push(FieldError::invalid(
                path.clone(),
                new_role,
                "role assignment name should not be modified after AzureMachinePool creation",
            ));
        }
    } else if !new_role.is_empty() {
        errs.push(FieldError::forbidden(
            path.clone(),
            "role assignment name should only be set when using system assigned identity",
        ));
    }

    errs
}
