//! Cluster API MachinePool, the parent of an AzureMachinePool.
//!
//! This resource is owned by Cluster API; only the fields the webhooks read
//! are modelled. Unknown fields are ignored on deserialization.

use k8s_openapi::api::core::v1::ObjectReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// MachinePool groups machines that are managed as a single scale set.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "cluster.x-k8s.io",
    version = "v1beta1",
    kind = "MachinePool",
    plural = "machinepools",
    shortname = "mp",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct MachinePoolSpec {
    /// Name of the Cluster this pool belongs to.
    #[serde(default)]
    pub cluster_name: String,

    /// Desired number of machines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Template for the machines in the pool.
    #[serde(default)]
    pub template: MachineTemplateSpec,
}

/// Machine template of a MachinePool.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineTemplateSpec {
    #[serde(default)]
    pub spec: MachineSpec,
}

/// Machine specification within a MachinePool template.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    /// Cluster the machines join.
    #[serde(default)]
    pub cluster_name: String,

    /// Kubernetes version of the machines, e.g. "v1.27.3".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Reference to the infrastructure object (the AzureMachinePool).
    #[serde(default)]
    pub infrastructure_ref: ObjectReference,
}

impl MachinePool {
    /// Whether this pool's infrastructure reference points at `name`.
    pub fn references_infrastructure(&self, name: &str) -> bool {
        self.spec.template.spec.infrastructure_ref.name.as_deref() == Some(name)
    }

    /// Declared Kubernetes version of the pool's machines.
    pub fn kubernetes_version(&self) -> Option<&str> {
        self.spec.template.spec.version.as_deref()
    }
}
