//! Typed views of the custom resources the migration reads and writes.
//!
//! Most kinds that are only read model just the fields this crate uses; unknown
//! fields in objects coming from the API server are ignored on deserialization.

pub mod capi;
pub mod capz;
pub mod giantswarm;
pub mod kubeadm;

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ObjectReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use capi::{Cluster, MachineDeployment, MachinePool};
pub use capz::{AzureCluster, AzureMachinePool, AzureMachineTemplate};
pub use giantswarm::{AzureConfig, Release};
pub use kubeadm::{KubeadmConfigTemplate, KubeadmControlPlane};

/// Label carrying the cluster ID on every CAPI/CAPZ object of a cluster.
pub const CLUSTER_NAME_LABEL: &str = "cluster.x-k8s.io/cluster-name";

/// Label naming the Giant Swarm release a cluster runs.
pub const RELEASE_VERSION_LABEL: &str = "release.giantswarm.io/version";

/// Host and port of a cluster's API server.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: i32,
}

/// The subset of object metadata a template (machine or pool) may carry.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// Reference pair used by machines and machine pools.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Bootstrap {
    #[serde(default)]
    pub config_ref: Option<ObjectReference>,
    #[serde(default)]
    pub data_secret_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::template;

    #[test]
    fn unread_source_fields_are_ignored() {
        let azure_config: AzureConfig = template::parse(
            "azure_config",
            r#"
apiVersion: provider.giantswarm.io/v1alpha1
kind: AzureConfig
metadata:
  name: abc123
  namespace: default
spec:
  cluster:
    id: abc123
  azure:
    virtualNetwork:
      cidr: 10.0.0.0/16
  versionBundle:
    version: 5.0.0
"#,
        )
        .unwrap();
        assert_eq!(azure_config.metadata.name.as_deref(), Some("abc123"));

        let release: Release = template::parse(
            "release",
            r#"
apiVersion: release.giantswarm.io/v1alpha1
kind: Release
metadata:
  name: "14.1.0"
spec:
  state: active
  date: "2021-03-01T10:00:00Z"
  components:
  - name: kubernetes
    version: "1.19.9"
"#,
        )
        .unwrap();
        assert_eq!(release.spec.components.len(), 1);
        assert_eq!(release.spec.components[0].version, "1.19.9");

        let azure_cluster: AzureCluster = template::parse(
            "azure_cluster",
            r#"
apiVersion: infrastructure.cluster.x-k8s.io/v1alpha3
kind: AzureCluster
metadata:
  name: abc123
spec:
  location: westeurope
  resourceGroup: abc123
  controlPlaneEndpoint:
    host: api.abc123.k8s.example.installation.com
    port: 443
  networkSpec:
    subnets:
    - name: abc123-master
      role: control-plane
    vnet:
      name: abc123-VirtualNetwork
      cidrBlocks:
      - 10.0.0.0/16
"#,
        )
        .unwrap();
        assert_eq!(azure_cluster.spec.network_spec.vnet.cidr_blocks, vec!["10.0.0.0/16"]);
        assert_eq!(azure_cluster.spec.control_plane_endpoint.port, 443);
    }
}
