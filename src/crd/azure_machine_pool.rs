//! AzureMachinePool Custom Resource Definition.
//!
//! An AzureMachinePool describes a VM scale set backing a Cluster API
//! MachinePool. Only the fields the admission webhooks read or default are
//! modelled in detail.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{
    Diagnostics, Image, NetworkInterface, OsDisk, SpotVmOptions, UserAssignedIdentity, VmIdentity,
};

/// AzureMachinePool is the infrastructure for a Cluster API MachinePool.
///
/// Example:
/// ```yaml
/// apiVersion: infrastructure.cluster.x-k8s.io/v1beta1
/// kind: AzureMachinePool
/// metadata:
///   name: pool0
/// spec:
///   location: westeurope
///   template:
///     vmSize: Standard_D2s_v3
///     terminateNotificationTimeout: 10
///   strategy:
///     type: RollingUpdate
///     rollingUpdate:
///       maxSurge: 1
///       maxUnavailable: 0
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "AzureMachinePool",
    plural = "azuremachinepools",
    shortname = "amp",
    status = "AzureMachinePoolStatus",
    namespaced,
    derive = "PartialEq",
    derive = "Default",
    printcolumn = r#"{"name":"Replicas", "type":"string", "jsonPath":".status.replicas"}"#,
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.ready"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AzureMachinePoolSpec {
    /// Azure region the scale set is created in.
    #[serde(default)]
    pub location: String,

    /// Template for the VMs in the pool.
    #[serde(default)]
    pub template: AzureMachinePoolMachineTemplate,

    /// Extra tags applied to Azure resources managed for this pool.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_tags: BTreeMap<String, String>,

    /// Provider ID of the scale set.
    #[serde(rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    /// Provider IDs of the scale set instances.
    #[serde(rename = "providerIDList", default, skip_serializing_if = "Vec::is_empty")]
    pub provider_id_list: Vec<String>,

    /// Managed identity type for the VMs (default: None).
    #[serde(default)]
    pub identity: VmIdentity,

    /// User-assigned identities; required when `identity` is `UserAssigned`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_assigned_identities: Vec<UserAssignedIdentity>,

    /// Name of the role assignment for a system-assigned identity (a GUID).
    /// Generated during defaulting when left empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role_assignment_name: String,

    /// How instances are replaced when the template changes.
    #[serde(default)]
    pub strategy: AzureMachinePoolDeploymentStrategy,

    /// Scale set orchestration mode (default: Uniform).
    #[serde(default)]
    pub orchestration_mode: OrchestrationMode,

    /// Maximum time to drain a node before deleting it, e.g. "5m".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_drain_timeout: Option<String>,
}

/// VM template embedded in an AzureMachinePool.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AzureMachinePoolMachineTemplate {
    /// Azure VM size, e.g. Standard_D2s_v3.
    #[serde(default)]
    pub vm_size: String,

    /// OS image. The provider picks a default image when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,

    /// OS disk settings.
    #[serde(default)]
    pub os_disk: OsDisk,

    /// Base64-encoded OpenSSH public key. Generated during defaulting when empty.
    #[serde(default)]
    pub ssh_public_key: String,

    /// Deprecated: use `networkInterfaces[].acceleratedNetworking`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerated_networking: Option<bool>,

    /// Minutes between a scheduled termination event and the VM shutting down (5-15).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminate_notification_timeout: Option<i32>,

    /// Diagnostics settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,

    /// Deprecated: use `networkInterfaces[].subnetName`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnet_name: String,

    /// Network interfaces for each VM. Mutually exclusive with `subnetName`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interfaces: Vec<NetworkInterface>,

    /// Run the pool on spot instances.
    #[serde(rename = "spotVMOptions", skip_serializing_if = "Option::is_none")]
    pub spot_vm_options: Option<SpotVmOptions>,
}

/// Deployment strategy for an AzureMachinePool.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AzureMachinePoolDeploymentStrategy {
    /// Strategy type (default: RollingUpdate).
    #[serde(rename = "type", default)]
    pub strategy_type: DeploymentStrategyType,

    /// Rolling update parameters; only used with `RollingUpdate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolling_update: Option<MachineRollingUpdateDeployment>,
}

impl Default for AzureMachinePoolDeploymentStrategy {
    fn default() -> Self {
        Self {
            strategy_type: DeploymentStrategyType::RollingUpdate,
            rolling_update: Some(MachineRollingUpdateDeployment::default()),
        }
    }
}

/// Deployment strategy type.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum DeploymentStrategyType {
    /// Replace instances gradually, bounded by maxSurge/maxUnavailable.
    #[default]
    RollingUpdate,
    /// Delete old instances before creating new ones.
    Delete,
}

impl std::fmt::Display for DeploymentStrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentStrategyType::RollingUpdate => write!(f, "RollingUpdate"),
            DeploymentStrategyType::Delete => write!(f, "Delete"),
        }
    }
}

/// Rolling update parameters.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineRollingUpdateDeployment {
    /// Instances that may be unavailable during the update (default: 0).
    #[serde(default = "default_max_unavailable")]
    pub max_unavailable: IntOrString,

    /// Instances that may be created above the desired count (default: 1).
    #[serde(default = "default_max_surge")]
    pub max_surge: IntOrString,

    /// Which instances are removed first (default: Oldest).
    #[serde(default)]
    pub delete_policy: DeletePolicy,
}

impl Default for MachineRollingUpdateDeployment {
    fn default() -> Self {
        Self {
            max_unavailable: default_max_unavailable(),
            max_surge: default_max_surge(),
            delete_policy: DeletePolicy::default(),
        }
    }
}

fn default_max_unavailable() -> IntOrString {
    IntOrString::Int(0)
}

fn default_max_surge() -> IntOrString {
    IntOrString::Int(1)
}

/// Order in which instances are deleted during a rolling update.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum DeletePolicy {
    #[default]
    Oldest,
    Newest,
    Random,
}

/// VM scale set orchestration mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum OrchestrationMode {
    #[default]
    Uniform,
    Flexible,
}

impl std::fmt::Display for OrchestrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestrationMode::Uniform => write!(f, "Uniform"),
            OrchestrationMode::Flexible => write!(f, "Flexible"),
        }
    }
}

/// Observed state of an AzureMachinePool.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AzureMachinePoolStatus {
    /// Whether the scale set is provisioned.
    #[serde(default)]
    pub ready: bool,

    /// Number of instances in the scale set.
    #[serde(default)]
    pub replicas: i32,
}
