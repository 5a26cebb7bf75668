//! Parent MachinePool lookup.
//!
//! An AzureMachinePool does not point at its parent; the parent MachinePool
//! points at it through `spec.template.spec.infrastructureRef`. Finding the
//! parent therefore means listing MachinePools and matching on that reference.
//! The parent may not exist yet when the AzureMachinePool is admitted, so
//! lookups are retried a bounded number of times.

use std::time::Duration;

use async_trait::async_trait;
use kube::api::ListParams;
use kube::{Api, Client};
use thiserror::Error;
use tracing::{debug, warn};

use crate::crd::MachinePool;

/// Errors from finding a parent MachinePool
#[derive(Error, Debug)]
pub enum LookupError {
    /// Listing MachinePools failed
    #[error("failed to list MachinePools for {name}: {source}")]
    List {
        name: String,
        #[source]
        source: kube::Error,
    },

    /// No MachinePool references the AzureMachinePool
    #[error("failed to get MachinePool for {0}")]
    NotFound(String),

    /// Every attempt failed; carries the last failure
    #[error("failed to find parent MachinePool after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<LookupError>,
    },
}

/// Capability to find the MachinePool that owns an AzureMachinePool.
#[async_trait]
pub trait ParentLookup: Send + Sync {
    /// Find the MachinePool whose infrastructure reference names `name`.
    ///
    /// `namespace` scopes the search; `None` searches all namespaces.
    async fn find_parent(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<MachinePool, LookupError>;
}

/// Parent lookup backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeParentLookup {
    client: Client,
}

impl KubeParentLookup {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParentLookup for KubeParentLookup {
    async fn find_parent(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<MachinePool, LookupError> {
        let api: Api<MachinePool> = crate::scoped_api(self.client.clone(), namespace);
        let pools = api
            .list(&ListParams::default())
            .await
            .map_err(|source| LookupError::List {
                name: name.to_string(),
                source,
            })?;

        pools
            .items
            .into_iter()
            .find(|pool| pool.references_infrastructure(name))
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

/// Find the parent MachinePool, trying up to `attempts` times.
///
/// Waits `interval` between attempts. Returns the first success, or
/// [`LookupError::Exhausted`] wrapping the last failure.
pub async fn find_parent_with_retry(
    lookup: &dyn ParentLookup,
    namespace: Option<&str>,
    name: &str,
    attempts: u32,
    interval: Duration,
) -> Result<MachinePool, LookupError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match lookup.find_parent(namespace, name).await {
            Ok(parent) => {
                debug!(name = %name, attempt, "Found parent MachinePool");
                return Ok(parent);
            }
            Err(e) if attempt >= attempts => {
                return Err(LookupError::Exhausted {
                    attempts,
                    source: Box::new(e),
                });
            }
            Err(e) => {
                warn!(name = %name, attempt, error = %e, "Parent MachinePool lookup failed, retrying");
                attempt += 1;
                if !interval.is_zero() {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }
}
