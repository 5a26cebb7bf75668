//! Custom Resource Definitions used by the webhooks.
//!
//! - `AzureMachinePool`: the resource being admitted
//! - `MachinePool`: its Cluster API parent, read during validation

mod azure_machine_pool;
mod machine_pool;
mod types;

pub use azure_machine_pool::*;
pub use machine_pool::*;
pub use types::*;
