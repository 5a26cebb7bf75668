// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for azure-machine-pool-webhook.
//!
//! Uses proptest to generate random inputs and verify invariants of the
//! synchronous policies and of defaulting.

#[path = "../common/mod.rs"]
mod common;

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use proptest::prelude::*;

use azure_machine_pool_webhook::crd::{MachineRollingUpdateDeployment, VmIdentity};
use azure_machine_pool_webhook::webhooks::policies::{network, strategy, termination};
use azure_machine_pool_webhook::webhooks::{ValidationContext, apply_defaults};

use common::{AzureMachinePoolBuilder, RecordingLookup, fast_lookup};

/// Strategy for generating subnet names, including the empty one.
fn subnet_name() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z][a-z0-9-]{0,15}"]
}

/// Strategy for rolling update bounds: integers or percentages.
fn int_or_string() -> impl Strategy<Value = IntOrString> {
    prop_oneof![
        (0..5i32).prop_map(IntOrString::Int),
        (0..100i32).prop_map(|p| IntOrString::String(format!("{}%", p))),
    ]
}

fn any_identity() -> impl Strategy<Value = VmIdentity> {
    prop_oneof![
        Just(VmIdentity::None),
        Just(VmIdentity::SystemAssigned),
        Just(VmIdentity::UserAssigned),
    ]
}

macro_rules! context {
    ($pool:expr, $lookup:expr) => {
        ValidationContext {
            resource: &$pool,
            old_resource: None,
            namespace: Some("default"),
            parents: &$lookup,
            lookup: fast_lookup(),
        }
    };
}

proptest! {
    #[test]
    fn termination_timeout_bounds(timeout in -100i32..100) {
        let pool = AzureMachinePoolBuilder::default()
            .terminate_notification_timeout(timeout)
            .build();
        let lookup = RecordingLookup::default();
        let result = termination::validate(&context!(pool, lookup));
        prop_assert_eq!(result.is_allowed(), (5..=15).contains(&timeout));
    }

    #[test]
    fn network_exclusivity(subnet in subnet_name(), nics in proptest::collection::vec(subnet_name(), 0..4)) {
        let mut builder = AzureMachinePoolBuilder::default().subnet_name(subnet.clone());
        for nic in &nics {
            builder = builder.network_interface(nic.clone(), 1);
        }
        let pool = builder.build();
        let lookup = RecordingLookup::default();

        let result = network::validate(&context!(pool, lookup));
        prop_assert_eq!(result.is_allowed(), subnet.is_empty() || nics.is_empty());
    }

    #[test]
    fn strategy_rejects_only_integer_zeros(surge in int_or_string(), unavailable in int_or_string()) {
        let mut pool = AzureMachinePoolBuilder::default().build();
        pool.spec.strategy.rolling_update = Some(MachineRollingUpdateDeployment {
            max_surge: surge.clone(),
            max_unavailable: unavailable.clone(),
            ..Default::default()
        });
        let lookup = RecordingLookup::default();

        let both_zero = surge == IntOrString::Int(0) && unavailable == IntOrString::Int(0);
        let result = strategy::validate(&context!(pool, lookup));
        prop_assert_eq!(result.is_allowed(), !both_zero);
    }

    #[test]
    fn defaulting_is_idempotent(
        identity in any_identity(),
        subnet in subnet_name(),
        accelerated in proptest::option::of(any::<bool>()),
        nic_ip_configs in proptest::collection::vec(0..3i32, 0..3),
    ) {
        let mut builder = AzureMachinePoolBuilder::default()
            .identity(identity)
            // Any non-empty key; defaulting only generates keys when empty
            .ssh_public_key("c3NoLWVkMjU1MTkgQUFBQQ==");
        if nic_ip_configs.is_empty() {
            builder = builder.subnet_name(subnet);
        }
        for (i, configs) in nic_ip_configs.iter().enumerate() {
            builder = builder.network_interface(format!("subnet-{}", i), *configs);
        }
        let mut pool = builder.build();
        pool.spec.template.accelerated_networking = accelerated;

        apply_defaults(&mut pool);
        let once = pool.clone();
        apply_defaults(&mut pool);
        prop_assert_eq!(pool, once);
    }
}
