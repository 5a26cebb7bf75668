//! azure-machine-pool-webhook library crate
//!
//! Admission validation and defaulting for Cluster API AzureMachinePool
//! resources, plus the HTTP servers that expose them.

pub mod config;
pub mod crd;
pub mod error;
pub mod feature;
pub mod health;
pub mod lookup;
pub mod validation;
pub mod webhooks;

pub use config::{Config, LookupConfig};
pub use error::{Error, Result};
pub use feature::{Feature, FeatureGates};
pub use health::HealthState;
pub use lookup::{KubeParentLookup, ParentLookup};
pub use webhooks::{MachinePoolAdmission, WebhookState, run_webhook_server};

use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;

/// Create namespaced or cluster-wide API based on scope
pub fn scoped_api<T>(client: Client, namespace: Option<&str>) -> Api<T>
where
    T: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
    <T as Resource>::DynamicType: Default,
    T: Clone + DeserializeOwned + std::fmt::Debug,
{
    match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::all(client),
    }
}
