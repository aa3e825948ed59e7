use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ObjectReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// KubeadmControlPlaneSpec describes the control plane machines of a cluster
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug)]
#[kube(
    group = "controlplane.cluster.x-k8s.io",
    version = "v1alpha3",
    kind = "KubeadmControlPlane",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KubeadmControlPlaneSpec {
    #[serde(default)]
    pub replicas: Option<i32>,

    /// Kubernetes version of the control plane, with a leading "v".
    pub version: String,

    pub infrastructure_template: ObjectReference,

    pub kubeadm_config_spec: KubeadmConfigSpec,
}

/// KubeadmConfigTemplateSpec is the bootstrap configuration shared by worker machines
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug)]
#[kube(
    group = "bootstrap.cluster.x-k8s.io",
    version = "v1alpha3",
    kind = "KubeadmConfigTemplate",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KubeadmConfigTemplateSpec {
    pub template: KubeadmConfigTemplateResource,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct KubeadmConfigTemplateResource {
    pub spec: KubeadmConfigSpec,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct KubeadmConfigSpec {
    #[serde(default)]
    pub cluster_configuration: Option<ClusterConfiguration>,

    #[serde(default)]
    pub init_configuration: Option<NodeConfiguration>,

    #[serde(default)]
    pub join_configuration: Option<NodeConfiguration>,

    #[serde(default)]
    pub files: Vec<File>,

    #[serde(default)]
    pub pre_kubeadm_commands: Vec<String>,

    #[serde(default)]
    pub post_kubeadm_commands: Vec<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfiguration {
    #[serde(default)]
    pub cluster_name: Option<String>,

    #[serde(default)]
    pub kubernetes_version: Option<String>,

    #[serde(default)]
    pub control_plane_endpoint: Option<String>,

    #[serde(default)]
    pub image_repository: Option<String>,

    #[serde(default)]
    pub etcd: Option<Etcd>,

    #[serde(default)]
    pub networking: Option<Networking>,

    #[serde(default)]
    pub api_server: Option<ApiServer>,

    #[serde(default)]
    pub controller_manager: Option<ControlPlaneComponent>,

    #[serde(default)]
    pub scheduler: Option<ControlPlaneComponent>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Etcd {
    #[serde(default)]
    pub local: Option<LocalEtcd>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocalEtcd {
    #[serde(default)]
    pub image_repository: Option<String>,
    #[serde(default)]
    pub image_tag: Option<String>,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub extra_args: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    #[serde(default)]
    pub service_subnet: Option<String>,
    #[serde(default)]
    pub pod_subnet: Option<String>,
    #[serde(default)]
    pub dns_domain: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiServer {
    #[serde(default, rename = "certSANs")]
    pub cert_sans: Vec<String>,
    #[serde(default)]
    pub timeout_for_control_plane: Option<String>,
    #[serde(default)]
    pub extra_args: BTreeMap<String, String>,
    #[serde(default)]
    pub extra_volumes: Vec<HostPathMount>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneComponent {
    #[serde(default)]
    pub extra_args: BTreeMap<String, String>,
    #[serde(default)]
    pub extra_volumes: Vec<HostPathMount>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostPathMount {
    pub name: String,
    pub host_path: String,
    pub mount_path: String,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub path_type: Option<String>,
}

/// Shared shape of kubeadm's InitConfiguration and JoinConfiguration.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfiguration {
    #[serde(default)]
    pub node_registration: NodeRegistration,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeRegistration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kubelet_extra_args: BTreeMap<String, String>,
}

/// A file written to the machine before kubeadm runs.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub path: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_from: Option<FileSource>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FileSource {
    pub secret: SecretFileSource,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretFileSource {
    pub name: String,
    pub key: String,
}
