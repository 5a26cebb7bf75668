//! Boot diagnostics policy.
//!
//! A user managed storage account URI must be given exactly when the storage
//! account type is `UserManaged`.

use super::{ValidationContext, ValidationResult, template_path};
use crate::crd::BootDiagnosticsStorageAccountType;
use crate::validation::{ErrorList, FieldError};

/// Validate boot diagnostics storage settings
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    let Some(boot) = ctx
        .resource
        .spec
        .template
        .diagnostics
        .as_ref()
        .and_then(|d| d.boot.as_ref())
    else {
        return ValidationResult::allowed();
    };

    let path = template_path().child("diagnostics").child("boot");
    let storage_type = boot.storage_account_type;
    let mut errs = ErrorList::new();

    match storage_type {
        BootDiagnosticsStorageAccountType::UserManaged => match &boot.user_managed {
            None => errs.push(FieldError::required(
                path.child("userManaged"),
                format!(
                    "userManaged must be specified when storageAccountType is '{}'",
                    storage_type
                ),
            )),
            Some(user_managed) if user_managed.storage_account_uri.is_empty() => {
                errs.push(FieldError::required(
                    path.child("userManaged").child("storageAccountURI"),
                    format!(
                        "StorageAccountURI cannot be empty when storageAccountType is '{}'",
                        storage_type
                    ),
                ))
            }
            Some(_) => {}
        },
        BootDiagnosticsStorageAccountType::Managed | BootDiagnosticsStorageAccountType::Disabled => {
            if let Some(user_managed) = &boot.user_managed
                && !user_managed.storage_account_uri.is_empty()
            {
                errs.push(FieldError::invalid(
                    path.child("userManaged").child("storageAccountURI"),
                    &user_managed.storage_account_uri,
                    format!(
                        "StorageAccountURI cannot be set when storageAccountType is '{}'",
                        storage_type
                    ),
                ));
            }
        }
    }

    ValidationResult::from_errors(errs)
}
