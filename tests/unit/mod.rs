// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for azure-machine-pool-webhook.
//!
//! These tests run without a Kubernetes cluster and exercise the public API:
//! the admission entry points, the shared validators and configuration.

#[path = "../common/mod.rs"]
mod common;

mod crd_tests {
    use azure_machine_pool_webhook::crd::{
        AzureMachinePool, DeploymentStrategyType, OrchestrationMode, VmIdentity,
    };
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
    use kube::Resource;

    #[test]
    fn test_api_identity() {
        assert_eq!(AzureMachinePool::group(&()), "infrastructure.cluster.x-k8s.io");
        assert_eq!(AzureMachinePool::version(&()), "v1beta1");
        assert_eq!(AzureMachinePool::kind(&()), "AzureMachinePool");
    }

    #[test]
    fn test_deserialize_manifest() {
        let pool: AzureMachinePool = serde_json::from_value(serde_json::json!({
            "apiVersion": "infrastructure.cluster.x-k8s.io/v1beta1",
            "kind": "AzureMachinePool",
            "metadata": { "name": "pool0", "namespace": "default" },
            "spec": {
                "location": "eastus",
                "identity": "SystemAssigned",
                "orchestrationMode": "Flexible",
                "strategy": {
                    "type": "RollingUpdate",
                    "rollingUpdate": { "maxSurge": "25%", "maxUnavailable": 1 }
                },
                "template": {
                    "vmSize": "Standard_D2s_v3",
                    "terminateNotificationTimeout": 10,
                    "networkInterfaces": [{ "subnetName": "nodes", "privateIPConfigs": 2 }]
                }
            }
        }))
        .unwrap();

        assert_eq!(pool.spec.identity, VmIdentity::SystemAssigned);
        assert_eq!(pool.spec.orchestration_mode, OrchestrationMode::Flexible);
        assert_eq!(pool.spec.strategy.strategy_type, DeploymentStrategyType::RollingUpdate);
        let rolling = pool.spec.strategy.rolling_update.unwrap();
        assert_eq!(rolling.max_surge, IntOrString::String("25%".to_string()));
        assert_eq!(rolling.max_unavailable, IntOrString::Int(1));
        assert_eq!(pool.spec.template.terminate_notification_timeout, Some(10));
        assert_eq!(pool.spec.template.network_interfaces[0].private_ip_configs, 2);
    }
}

mod admission_tests {
    use std::sync::Arc;

    use azure_machine_pool_webhook::crd::{
        BootDiagnostics, BootDiagnosticsStorageAccountType, Diagnostics,
        UserManagedBootDiagnostics, VmIdentity,
    };
    use azure_machine_pool_webhook::feature::FeatureGates;
    use azure_machine_pool_webhook::validation::ErrorKind;

    use crate::common::{AzureMachinePoolBuilder, RecordingLookup, admission_with, parent_machine_pool};

    fn enabled(lookup: RecordingLookup) -> azure_machine_pool_webhook::MachinePoolAdmission {
        admission_with(FeatureGates::all_enabled(), Arc::new(lookup))
    }

    #[tokio::test]
    async fn test_create_rejected_when_gate_disabled() {
        let admission = admission_with(FeatureGates::default(), Arc::new(RecordingLookup::default()));
        let pool = AzureMachinePoolBuilder::new("pool").build();

        let err = admission.validate_create(&pool, Some("default")).await.unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].kind, ErrorKind::Forbidden);
        assert_eq!(err.errors()[0].field.as_str(), "spec");
    }

    #[tokio::test]
    async fn test_create_allowed_when_gate_enabled() {
        let admission = enabled(RecordingLookup::default());
        let pool = AzureMachinePoolBuilder::new("pool")
            .network_interface("nodes", 1)
            .terminate_notification_timeout(5)
            .build();
        assert!(admission.validate_create(&pool, Some("default")).await.is_ok());
    }

    #[tokio::test]
    async fn test_independent_violations_aggregated() {
        let admission = enabled(RecordingLookup::default());
        let pool = AzureMachinePoolBuilder::new("pool")
            .subnet_name("nodes")
            .network_interface("other", 1)
            .terminate_notification_timeout(2)
            .build();

        let err = admission.validate_create(&pool, None).await.unwrap_err();
        assert_eq!(err.len(), 2);
        let rendered = err.to_string();
        assert!(rendered.starts_with('['));
        assert!(rendered.contains("minimum timeout 5 is allowed for TerminateNotificationTimeout"));
        assert!(rendered.contains("cannot set both NetworkInterfaces and machine SubnetName"));
    }

    #[tokio::test]
    async fn test_flexible_looks_up_parent_by_name() {
        let lookup = Arc::new(RecordingLookup::new(vec![parent_machine_pool(
            "pool",
            Some("v1.27.3"),
        )]));
        let admission = admission_with(FeatureGates::all_enabled(), lookup.clone());
        let pool = AzureMachinePoolBuilder::new("pool").flexible().build();

        assert!(admission.validate_create(&pool, Some("default")).await.is_ok());
        assert_eq!(lookup.queries(), vec!["pool".to_string()]);
    }

    #[tokio::test]
    async fn test_flexible_version_boundary() {
        for (version, allowed) in [("1.25.9", false), ("1.26.0", true), ("v1.26", true)] {
            let admission = enabled(RecordingLookup::new(vec![parent_machine_pool(
                "pool",
                Some(version),
            )]));
            let pool = AzureMachinePoolBuilder::new("pool").flexible().build();
            assert_eq!(
                admission.validate_create(&pool, None).await.is_ok(),
                allowed,
                "version {}",
                version
            );
        }
    }

    #[tokio::test]
    async fn test_flexible_missing_parent() {
        let lookup = Arc::new(RecordingLookup::default());
        let admission = admission_with(FeatureGates::all_enabled(), lookup.clone());
        let pool = AzureMachinePoolBuilder::new("orphan").flexible().build();

        let err = admission.validate_create(&pool, None).await.unwrap_err();
        assert_eq!(err.errors()[0].kind, ErrorKind::LookupFailure);
        assert_eq!(lookup.queries().len(), 5);
    }

    #[tokio::test]
    async fn test_uniform_never_looks_up_parent() {
        let lookup = Arc::new(RecordingLookup::default());
        let admission = admission_with(FeatureGates::all_enabled(), lookup.clone());
        let pool = AzureMachinePoolBuilder::new("pool").build();

        assert!(admission.validate_create(&pool, None).await.is_ok());
        assert!(lookup.queries().is_empty());
    }

    #[tokio::test]
    async fn test_diagnostics_rules() {
        let admission = enabled(RecordingLookup::default());
        let user_managed = |uri: Option<&str>| Diagnostics {
            boot: Some(BootDiagnostics {
                storage_account_type: BootDiagnosticsStorageAccountType::UserManaged,
                user_managed: uri.map(|u| UserManagedBootDiagnostics {
                    storage_account_uri: u.to_string(),
                }),
            }),
        };

        let pool = AzureMachinePoolBuilder::new("pool")
            .diagnostics(user_managed(None))
            .build();
        let err = admission.validate_create(&pool, None).await.unwrap_err();
        assert_eq!(err.errors()[0].kind, ErrorKind::Required);

        let pool = AzureMachinePoolBuilder::new("pool")
            .diagnostics(user_managed(Some("https://example.blob.core.windows.net/")))
            .build();
        assert!(admission.validate_create(&pool, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_role_assignment_name() {
        let admission = enabled(RecordingLookup::default());
        let old = AzureMachinePoolBuilder::new("pool")
            .identity(VmIdentity::SystemAssigned)
            .role_assignment_name("30a57d5f-ec3d-4f5c-b2f9-4a7a0e4cb8e3")
            .build();

        assert!(admission.validate_update(&old, &old.clone(), None).await.is_ok());

        let new = AzureMachinePoolBuilder::new("pool")
            .identity(VmIdentity::SystemAssigned)
            .role_assignment_name("7c8f1b52-1f4c-4c4c-9d1f-3a52a6f0d2a1")
            .build();
        let err = admission.validate_update(&old, &new, None).await.unwrap_err();
        assert_eq!(err.errors()[0].field.as_str(), "spec.roleAssignmentName");
    }

    #[test]
    fn test_delete_always_allowed() {
        let admission = admission_with(FeatureGates::default(), Arc::new(RecordingLookup::default()));
        let pool = AzureMachinePoolBuilder::new("pool")
            .terminate_notification_timeout(99)
            .build();
        assert!(admission.validate_delete(&pool).is_ok());
    }

    #[tokio::test]
    async fn test_defaulting_then_validation() {
        let admission = enabled(RecordingLookup::default());
        let mut pool = AzureMachinePoolBuilder::new("pool")
            .identity(VmIdentity::SystemAssigned)
            .subnet_name("nodes")
            .build();

        assert!(admission.default(&mut pool));
        assert!(!pool.spec.template.ssh_public_key.is_empty());
        assert!(!pool.spec.role_assignment_name.is_empty());
        assert_eq!(pool.spec.template.network_interfaces.len(), 1);
        assert!(admission.validate_create(&pool, None).await.is_ok());
    }
}

mod validation_tests {
    use azure_machine_pool_webhook::crd::{Image, VmIdentity};
    use azure_machine_pool_webhook::validation::{
        ErrorKind, FieldPath, parse_tolerant, validate_image, validate_ssh_key,
        validate_system_assigned_identity,
    };

    #[test]
    fn test_tolerant_versions() {
        for input in ["v1.26", "1.26", " 1.26.0 ", "v1.26.0"] {
            assert_eq!(parse_tolerant(input).unwrap(), semver::Version::new(1, 26, 0));
        }
        assert!(parse_tolerant("one.two").is_err());
    }

    #[test]
    fn test_image_without_source() {
        let errs = validate_image(&Image::default(), &FieldPath::new("image"));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::Required);
    }

    #[test]
    fn test_ssh_key_not_base64() {
        let errs = validate_ssh_key("%%%", &FieldPath::new("sshPublicKey"));
        assert_eq!(errs.len(), 1);
        assert!(errs[0].detail.contains("not properly base64 encoded"));
    }

    #[test]
    fn test_role_name_forbidden_without_system_identity() {
        let errs = validate_system_assigned_identity(
            VmIdentity::None,
            "",
            "30a57d5f-ec3d-4f5c-b2f9-4a7a0e4cb8e3",
            &FieldPath::new("spec").child("roleAssignmentName"),
        );
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::Forbidden);
        assert_eq!(
            errs[0].to_string(),
            "spec.roleAssignmentName: Forbidden: role assignment name should only be set when using system assigned identity"
        );
    }
}

mod config_tests {
    use std::collections::HashMap;

    use azure_machine_pool_webhook::config::Config;
    use azure_machine_pool_webhook::feature::Feature;

    #[test]
    fn test_feature_gates_from_env() {
        let vars: HashMap<&str, &str> = [("FEATURE_GATES", "MachinePool=true")].into();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert!(config.feature_gates.enabled(Feature::MachinePool));
        assert_eq!(config.webhook_port, 9443);
    }
}
