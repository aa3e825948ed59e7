use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ApiEndpoint;

/// AzureClusterSpec defines the Azure infrastructure of a cluster
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug, Default)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1alpha3",
    kind = "AzureCluster",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct AzureClusterSpec {
    #[serde(default)]
    pub network_spec: NetworkSpec,

    /// Endpoint used to reach the workload cluster's API server.
    #[serde(default)]
    pub control_plane_endpoint: ApiEndpoint,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    #[serde(default)]
    pub vnet: VnetSpec,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct VnetSpec {
    /// Address ranges of the VNET; the first one is the cluster's primary range.
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
}

/// AzureMachineTemplateSpec describes the VMs created for a set of machines
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1alpha3",
    kind = "AzureMachineTemplate",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct AzureMachineTemplateSpec {
    pub template: AzureMachineTemplateResource,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AzureMachineTemplateResource {
    pub spec: AzureMachineSpec,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AzureMachineSpec {
    pub vm_size: String,

    pub os_disk: OsDisk,

    #[serde(default)]
    pub data_disks: Vec<DataDisk>,

    #[serde(default)]
    pub ssh_public_key: String,

    #[serde(default)]
    pub failure_domain: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    pub os_type: String,
    #[serde(rename = "diskSizeGB")]
    pub disk_size_gb: i32,
    #[serde(default)]
    pub managed_disk: Option<ManagedDisk>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDisk {
    pub storage_account_type: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DataDisk {
    pub name_suffix: String,
    #[serde(rename = "diskSizeGB")]
    pub disk_size_gb: i32,
    #[serde(default)]
    pub lun: Option<i32>,
}

/// AzureMachinePoolSpec describes the scale set backing a MachinePool.
///
/// Pools are only listed and cached, so no field is read.
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug, Default)]
#[kube(
    group = "exp.infrastructure.cluster.x-k8s.io",
    version = "v1alpha3",
    kind = "AzureMachinePool",
    namespaced
)]
pub struct AzureMachinePoolSpec {}
