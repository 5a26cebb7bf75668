//! Test fixtures and builder patterns for AzureMachinePool.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use azure_machine_pool_webhook::config::LookupConfig;
use azure_machine_pool_webhook::crd::{
    AzureMachinePool, AzureMachinePoolSpec, Diagnostics, MachinePool, MachinePoolSpec,
    NetworkInterface, OrchestrationMode, VmIdentity,
};
use azure_machine_pool_webhook::feature::FeatureGates;
use azure_machine_pool_webhook::lookup::{LookupError, ParentLookup};
use azure_machine_pool_webhook::webhooks::MachinePoolAdmission;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Builder for creating AzureMachinePool test fixtures.
///
/// # Example
/// ```
/// let pool = AzureMachinePoolBuilder::new("pool-0")
///     .namespace("test-ns")
///     .subnet_name("node-subnet")
///     .terminate_notification_timeout(10)
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct AzureMachinePoolBuilder {
    name: String,
    namespace: Option<String>,
    spec: AzureMachinePoolSpec,
}

impl AzureMachinePoolBuilder {
    /// Create a new builder with the given resource name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some("default".to_string()),
            spec: AzureMachinePoolSpec {
                location: "westeurope".to_string(),
                ..Default::default()
            },
        }
    }

    /// Set the namespace for the resource.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the template-level subnet name.
    pub fn subnet_name(mut self, subnet: impl Into<String>) -> Self {
        self.spec.template.subnet_name = subnet.into();
        self
    }

    /// Add a network interface on `subnet`.
    pub fn network_interface(mut self, subnet: impl Into<String>, private_ip_configs: i32) -> Self {
        self.spec.template.network_interfaces.push(NetworkInterface {
            subnet_name: subnet.into(),
            private_ip_configs,
            accelerated_networking: None,
        });
        self
    }

    /// Set the termination notification timeout in minutes.
    pub fn terminate_notification_timeout(mut self, minutes: i32) -> Self {
        self.spec.template.terminate_notification_timeout = Some(minutes);
        self
    }

    /// Set the (base64) SSH public key.
    pub fn ssh_public_key(mut self, key: impl Into<String>) -> Self {
        self.spec.template.ssh_public_key = key.into();
        self
    }

    /// Set the diagnostics block.
    pub fn diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.spec.template.diagnostics = Some(diagnostics);
        self
    }

    /// Set the managed identity type.
    pub fn identity(mut self, identity: VmIdentity) -> Self {
        self.spec.identity = identity;
        self
    }

    /// Set the role assignment name.
    pub fn role_assignment_name(mut self, name: impl Into<String>) -> Self {
        self.spec.role_assignment_name = name.into();
        self
    }

    /// Use Flexible orchestration.
    pub fn flexible(mut self) -> Self {
        self.spec.orchestration_mode = OrchestrationMode::Flexible;
        self
    }

    /// Build the AzureMachinePool.
    pub fn build(self) -> AzureMachinePool {
        AzureMachinePool {
            metadata: ObjectMeta {
                name: Some(self.name),
                namespace: self.namespace,
                ..Default::default()
            },
            spec: self.spec,
            status: None,
        }
    }
}

impl Default for AzureMachinePoolBuilder {
    fn default() -> Self {
        Self::new("test-pool")
    }
}

/// Create a parent MachinePool referencing the AzureMachinePool `name`.
pub fn parent_machine_pool(name: &str, version: Option<&str>) -> MachinePool {
    let mut parent = MachinePool::new(&format!("{}-parent", name), MachinePoolSpec::default());
    parent.metadata.namespace = Some("default".to_string());
    parent.spec.template.spec.infrastructure_ref.name = Some(name.to_string());
    parent.spec.template.spec.version = version.map(str::to_string);
    parent
}

/// Parent lookup that serves a fixed set of MachinePools and records queries.
#[derive(Default)]
pub struct RecordingLookup {
    pools: Vec<MachinePool>,
    queries: Mutex<Vec<String>>,
}

impl RecordingLookup {
    pub fn new(pools: Vec<MachinePool>) -> Self {
        Self {
            pools,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Names looked up so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ParentLookup for RecordingLookup {
    async fn find_parent(
        &self,
        _namespace: Option<&str>,
        name: &str,
    ) -> Result<MachinePool, LookupError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(name.to_string());
        }
        self.pools
            .iter()
            .find(|pool| pool.references_infrastructure(name))
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

/// Lookup settings that never sleep.
pub fn fast_lookup() -> LookupConfig {
    LookupConfig {
        attempts: 5,
        interval: Duration::ZERO,
    }
}

/// Admission entry points with the given gates and parents.
pub fn admission_with(gates: FeatureGates, lookup: Arc<RecordingLookup>) -> MachinePoolAdmission {
    MachinePoolAdmission::new(gates, lookup, fast_lookup())
}
