//! Defaulting for AzureMachinePool resources.
//!
//! Runs in the mutating webhook before validation. Every step only fills
//! fields that are unset, so applying the defaults twice changes nothing.

use tracing::{debug, error};
use uuid::Uuid;

use crate::crd::{
    AzureMachinePool, AzureMachinePoolMachineTemplate, BootDiagnostics, Diagnostics,
    NetworkInterface, VmIdentity,
};
use crate::validation::{SshKeyError, generate_ssh_public_key};

/// Apply all defaults in place.
///
/// Returns `false` if a step failed. Failures are logged and the remaining
/// steps still run; a failed step never rejects the request.
pub fn apply_defaults(pool: &mut AzureMachinePool) -> bool {
    let mut ok = true;
    if let Err(e) = set_default_ssh_public_key(&mut pool.spec.template) {
        error!(
            name = ?pool.metadata.name,
            error = %e,
            "Failed to set default SSH public key"
        );
        ok = false;
    }
    set_identity_defaults(pool);
    set_diagnostics_defaults(&mut pool.spec.template);
    set_network_interface_defaults(&mut pool.spec.template);
    ok
}

/// Generate an SSH public key when none is set.
pub fn set_default_ssh_public_key(
    template: &mut AzureMachinePoolMachineTemplate,
) -> Result<(), SshKeyError> {
    if template.ssh_public_key.is_empty() {
        template.ssh_public_key = generate_ssh_public_key()?;
        debug!("Generated default SSH public key");
    }
    Ok(())
}

/// Give a system-assigned identity a role assignment name.
pub fn set_identity_defaults(pool: &mut AzureMachinePool) {
    let spec = &mut pool.spec;
    if spec.identity == VmIdentity::SystemAssigned && spec.role_assignment_name.is_empty() {
        spec.role_assignment_name = Uuid::new_v4().to_string();
    }
}

/// Enable managed boot diagnostics when nothing is configured.
pub fn set_diagnostics_defaults(template: &mut AzureMachinePoolMachineTemplate) {
    let diagnostics = template.diagnostics.get_or_insert_with(Diagnostics::default);
    if diagnostics.boot.is_none() {
        diagnostics.boot = Some(BootDiagnostics::managed());
    }
}

/// Move the deprecated template-level network settings into a NIC.
pub fn set_network_interface_defaults(template: &mut AzureMachinePoolMachineTemplate) {
    if template.network_interfaces.is_empty() {
        template.network_interfaces = vec![NetworkInterface {
            subnet_name: std::mem::take(&mut template.subnet_name),
            private_ip_configs: 1,
            accelerated_networking: template.accelerated_networking.take(),
        }];
    }

    for nic in template
        .network_interfaces
        .iter_mut()
        .filter(|nic| nic.private_ip_configs == 0)
    {
        nic.private_ip_configs = 1;
    }
}
