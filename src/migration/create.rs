use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;

use super::{CreatedObject, Migrator, Outcome};
use crate::error::{Error, Result};
use crate::fields;
use crate::store::{kind_of, ObjectStore, StoredObject};
use crate::template::{self, TemplateConfig};
use crate::types::{
    AzureMachineTemplate, KubeadmConfigTemplate, KubeadmControlPlane, MachineDeployment,
    CLUSTER_NAME_LABEL, RELEASE_VERSION_LABEL,
};

const ENCRYPTION_KEY: &str = "encryption";
const PROXY_KEY: &str = "proxy";

const PROXY_CONFIG: &str = "
apiVersion: kubeproxy.config.k8s.io/v1alpha1
clientConnection:
  kubeconfig: /etc/kubernetes/config/proxy-kubeconfig.yaml
kind: KubeProxyConfiguration
mode: iptables
metricsBindAddress: 0.0.0.0:10249";

fn encryption_config(key_material: &str) -> String {
    format!(
        "
kind: EncryptionConfiguration
apiVersion: apiserver.config.k8s.io/v1
resources:
  - resources:
    - secrets
    providers:
    - aescbc:
        keys:
        - name: key1
          secret: {}
    - identity: {{}}",
        key_material
    )
}

impl<S: ObjectStore> Migrator<S> {
    pub async fn create_encryption_config_secret(&self) -> Result<CreatedObject> {
        let original = self
            .sources
            .encryption_secret
            .as_ref()
            .ok_or(Error::SourceNotLoaded {
                kind: "encryption Secret",
            })?;
        let key_material = original
            .data
            .as_ref()
            .and_then(|data| data.get(ENCRYPTION_KEY))
            .ok_or_else(|| Error::MissingSecretKey {
                secret: original.name(),
                key: ENCRYPTION_KEY,
            })?;
        let key_material =
            String::from_utf8(key_material.0.clone()).map_err(|source| Error::InvalidKeyMaterial {
                secret: original.name(),
                source,
            })?;

        let secret = self.opaque_secret(
            format!("{}-k8s-encryption-config", self.config.cluster_id),
            ENCRYPTION_KEY,
            encryption_config(&key_material),
        );
        self.create_once(secret).await
    }

    pub async fn create_proxy_config_secret(&self) -> Result<CreatedObject> {
        let secret = self.opaque_secret(
            format!("{}-proxy-config", self.config.cluster_id),
            PROXY_KEY,
            PROXY_CONFIG.to_string(),
        );
        self.create_once(secret).await
    }

    pub async fn create_kubeadm_control_plane(&self) -> Result<CreatedObject> {
        let cluster = self
            .sources
            .azure_cluster
            .as_ref()
            .ok_or(Error::SourceNotLoaded {
                kind: "AzureCluster",
            })?;

        let base_domain = fields::base_domain(&cluster.spec.control_plane_endpoint.host)?;
        let vnet = fields::vnet_cidr(cluster)?;
        let master_ip = fields::master_ip(&vnet)?;

        let release_version =
            cluster
                .labels()
                .get(RELEASE_VERSION_LABEL)
                .ok_or_else(|| Error::MissingLabel {
                    kind: "AzureCluster",
                    name: cluster.name(),
                    label: RELEASE_VERSION_LABEL,
                })?;
        let components = fields::release_components(&self.store, release_version).await?;
        let component = |component: &'static str| {
            components
                .get(component)
                .map(|version| version.trim_start_matches('v'))
                .ok_or_else(|| Error::ReleaseComponentMissing {
                    release: release_version.clone(),
                    component,
                })
        };

        let config = self
            .template_config()
            .with("cluster_cidr", vnet.to_string())
            .with("cluster_master_ip", master_ip.to_string())
            .with("etcd_version", component("etcd")?)
            .with("k8s_version", format!("v{}", component("kubernetes")?))
            .with("installation_base_domain", base_domain);

        let kcp: KubeadmControlPlane = self
            .renderer
            .render_object(template::KUBEADM_CONTROL_PLANE, &config)?;
        self.create_once(kcp).await
    }

    pub async fn create_master_azure_machine_template(&self) -> Result<CreatedObject> {
        let amt: AzureMachineTemplate = self.renderer.render_object(
            template::CONTROL_PLANE_MACHINE_TEMPLATE,
            &self.template_config(),
        )?;
        self.create_once(amt).await
    }

    pub async fn create_workers_kubeadm_config_template(&self) -> Result<CreatedObject> {
        let kct: KubeadmConfigTemplate = self.renderer.render_object(
            template::WORKERS_KUBEADM_CONFIG_TEMPLATE,
            &self.template_config(),
        )?;
        self.create_once(kct).await
    }

    pub async fn create_workers_azure_machine_template(&self) -> Result<CreatedObject> {
        let amt: AzureMachineTemplate = self
            .renderer
            .render_object(template::WORKERS_MACHINE_TEMPLATE, &self.template_config())?;
        self.create_once(amt).await
    }

    pub async fn create_workers_machine_deployment(&self) -> Result<CreatedObject> {
        let config = self
            .template_config()
            .with("k8s_version", &self.config.worker_kubernetes_version);
        let md: MachineDeployment = self
            .renderer
            .render_object(template::WORKERS_MACHINE_DEPLOYMENT, &config)?;
        self.create_once(md).await
    }

    fn template_config(&self) -> TemplateConfig {
        TemplateConfig::new()
            .with("cluster_id", &self.config.cluster_id)
            .with("namespace", &self.config.namespace)
    }

    fn opaque_secret(&self, name: String, key: &str, content: String) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(name),
                namespace: Some(self.config.namespace.clone()),
                labels: Some(BTreeMap::from([(
                    CLUSTER_NAME_LABEL.to_string(),
                    self.config.cluster_id.clone(),
                )])),
                ..ObjectMeta::default()
            },
            type_: Some("Opaque".to_string()),
            string_data: Some(BTreeMap::from([(key.to_string(), content)])),
            ..Secret::default()
        }
    }

    /// Creates `obj`; an existing object with the same name counts as success.
    async fn create_once<K: StoredObject>(&self, obj: K) -> Result<CreatedObject> {
        let kind = kind_of::<K>();
        let name = obj.name();

        let outcome = match self.store.create(&obj).await {
            Ok(_) => Outcome::Created,
            Err(err) if err.is_already_exists() => Outcome::AlreadyExists,
            Err(source) => {
                return Err(Error::CreateObjectFailed { kind, name, source });
            }
        };

        tracing::info!(%kind, %name, %outcome, "ensured object");
        Ok(CreatedObject {
            kind,
            name,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::encryption_config;

    #[test]
    fn encryption_config_embeds_key_with_identity_fallback() {
        let config = encryption_config("c2VjcmV0LWtleQ==");
        let parsed: serde_yaml::Value = serde_yaml::from_str(&config).unwrap();

        let providers = &parsed["resources"][0]["providers"];
        assert_eq!(
            providers[0]["aescbc"]["keys"][0]["secret"].as_str(),
            Some("c2VjcmV0LWtleQ==")
        );
        assert!(providers[1]["identity"].is_mapping());
        assert_eq!(parsed["kind"].as_str(), Some("EncryptionConfiguration"));
    }
}
