//! Azure infrastructure types shared by machine pool templates.
//!
//! These mirror the `infrastructure.cluster.x-k8s.io/v1beta1` building blocks
//! (images, disks, diagnostics, identities, network interfaces) that an
//! AzureMachinePool embeds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Operating system image for the pool's VMs.
///
/// Exactly one of `id`, `shared_gallery`, `marketplace` or `compute_gallery`
/// should be set.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Full Azure resource ID of a managed image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Image from a Shared Image Gallery in another subscription.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_gallery: Option<AzureSharedGalleryImage>,

    /// Azure Marketplace image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<AzureMarketplaceImage>,

    /// Image from an Azure Compute Gallery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_gallery: Option<AzureComputeGalleryImage>,
}

/// Shared Image Gallery reference.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AzureSharedGalleryImage {
    #[serde(rename = "subscriptionID", default)]
    pub subscription_id: String,
    #[serde(default)]
    pub resource_group: String,
    #[serde(default)]
    pub gallery: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Azure Marketplace image reference.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AzureMarketplaceImage {
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub offer: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub version: String,
    /// Whether the image is published by a third party and requires a plan.
    #[serde(default)]
    pub third_party_image: bool,
}

/// Azure Compute Gallery image reference.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AzureComputeGalleryImage {
    #[serde(default)]
    pub gallery: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "subscriptionID", skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

/// OS disk configuration.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    /// Operating system type (default: Linux).
    #[serde(default = "default_os_type")]
    pub os_type: String,

    /// Disk size in GB (default: 30).
    #[serde(rename = "diskSizeGB", default = "default_disk_size_gb")]
    pub disk_size_gb: i32,

    /// Host caching (None, ReadOnly, ReadWrite).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching_type: Option<String>,
}

impl Default for OsDisk {
    fn default() -> Self {
        Self {
            os_type: default_os_type(),
            disk_size_gb: default_disk_size_gb(),
            caching_type: None,
        }
    }
}

fn default_os_type() -> String {
    "Linux".to_string()
}

fn default_disk_size_gb() -> i32 {
    30
}

/// Diagnostics settings for the pool's VMs.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Boot diagnostics settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot: Option<BootDiagnostics>,
}

/// Boot diagnostics storage settings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootDiagnostics {
    /// Where boot diagnostics data is stored.
    pub storage_account_type: BootDiagnosticsStorageAccountType,

    /// User managed storage account; only valid with `UserManaged`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_managed: Option<UserManagedBootDiagnostics>,
}

impl BootDiagnostics {
    /// Boot diagnostics backed by an Azure managed storage account.
    pub fn managed() -> Self {
        Self {
            storage_account_type: BootDiagnosticsStorageAccountType::Managed,
            user_managed: None,
        }
    }
}

/// Storage account type for boot diagnostics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum BootDiagnosticsStorageAccountType {
    #[default]
    Managed,
    UserManaged,
    Disabled,
}

impl std::fmt::Display for BootDiagnosticsStorageAccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootDiagnosticsStorageAccountType::Managed => write!(f, "Managed"),
            BootDiagnosticsStorageAccountType::UserManaged => write!(f, "UserManaged"),
            BootDiagnosticsStorageAccountType::Disabled => write!(f, "Disabled"),
        }
    }
}

/// User managed boot diagnostics storage account.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserManagedBootDiagnostics {
    /// URI of the storage account, e.g. `https://mystorage.blob.core.windows.net/`.
    #[serde(rename = "storageAccountURI", default)]
    pub storage_account_uri: String,
}

/// Managed identity type attached to the pool's VMs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum VmIdentity {
    #[default]
    None,
    SystemAssigned,
    UserAssigned,
}

impl std::fmt::Display for VmIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VmIdentity::None => write!(f, "None"),
            VmIdentity::SystemAssigned => write!(f, "SystemAssigned"),
            VmIdentity::UserAssigned => write!(f, "UserAssigned"),
        }
    }
}

/// Reference to a user-assigned managed identity.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAssignedIdentity {
    /// Azure resource ID of the identity, optionally prefixed with `azure://`.
    #[serde(rename = "providerID", default)]
    pub provider_id: String,
}

/// Network interface attached to each VM of the pool.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    /// Subnet the interface is placed in.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnet_name: String,

    /// Number of private IP configurations (0 means unset).
    #[serde(rename = "privateIPConfigs", default)]
    pub private_ip_configs: i32,

    /// Enable accelerated networking on the interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerated_networking: Option<bool>,
}

/// Spot VM settings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotVmOptions {
    /// Maximum hourly price, as a decimal string; unset means on-demand price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
}
