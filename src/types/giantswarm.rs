//! Legacy Giant Swarm resources the migration reads from.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// AzureConfigSpec is the legacy description of an Azure tenant cluster.
///
/// The migration only checks that the object exists, so no field is read.
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug, Default)]
#[kube(
    group = "provider.giantswarm.io",
    version = "v1alpha1",
    kind = "AzureConfig",
    namespaced
)]
pub struct AzureConfigSpec {}

/// ReleaseSpec lists the component versions shipped by a Giant Swarm release
#[derive(Serialize, Deserialize, JsonSchema, CustomResource, Clone, Debug, Default)]
#[kube(group = "release.giantswarm.io", version = "v1alpha1", kind = "Release")]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSpec {
    #[serde(default)]
    pub components: Vec<ReleaseComponent>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseComponent {
    pub name: String,
    pub version: String,
}
