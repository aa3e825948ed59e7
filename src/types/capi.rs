use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ApiEndpoint, Bootstrap, TemplateMeta};

/// ClusterSpec defines the desired state of a CAPI Cluster
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug, Default)]
#[kube(
    group = "cluster.x-k8s.io",
    version = "v1alpha3",
    kind = "Cluster",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Pauses reconciliation of the cluster and all of its objects.
    #[serde(default)]
    pub paused: bool,

    #[serde(default)]
    pub cluster_network: Option<ClusterNetwork>,

    #[serde(default)]
    pub control_plane_endpoint: Option<ApiEndpoint>,

    #[serde(default)]
    pub control_plane_ref: Option<ObjectReference>,

    #[serde(default)]
    pub infrastructure_ref: Option<ObjectReference>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetwork {
    #[serde(default)]
    pub api_server_port: Option<i32>,
    #[serde(default)]
    pub services: Option<NetworkRanges>,
    #[serde(default)]
    pub pods: Option<NetworkRanges>,
    #[serde(default)]
    pub service_domain: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRanges {
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
}

/// MachineDeploymentSpec defines a replicated set of worker machines
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug)]
#[kube(
    group = "cluster.x-k8s.io",
    version = "v1alpha3",
    kind = "MachineDeployment",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct MachineDeploymentSpec {
    pub cluster_name: String,

    #[serde(default)]
    pub replicas: Option<i32>,

    /// Label selector for machines owned by this deployment.
    pub selector: LabelSelector,

    pub template: MachineTemplateSpec,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MachineTemplateSpec {
    #[serde(default)]
    pub metadata: TemplateMeta,
    pub spec: MachineSpec,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    pub cluster_name: String,

    #[serde(default)]
    pub bootstrap: Bootstrap,

    pub infrastructure_ref: ObjectReference,

    /// Kubernetes version the machine's kubelet runs.
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub failure_domain: Option<String>,
}

/// MachinePoolSpec defines a pool of machines backed by a cloud scale set
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug)]
#[kube(
    group = "exp.cluster.x-k8s.io",
    version = "v1alpha3",
    kind = "MachinePool",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct MachinePoolSpec {
    pub cluster_name: String,

    #[serde(default)]
    pub replicas: Option<i32>,

    pub template: MachineTemplateSpec,

    #[serde(default)]
    pub failure_domains: Vec<String>,
}
