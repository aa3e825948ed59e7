//! One-shot migration of an AzureConfig-managed cluster to CAPI/CAPZ objects.
//!
//! The migration first reads the legacy objects of one cluster into
//! [`SourceResources`], then creates the CAPI/CAPZ objects that describe the
//! same cluster. Every create is skipped when the object already exists, so a
//! migration that failed half-way is resumed by running it again.

mod create;
mod read;

use std::fmt;

use k8s_openapi::api::core::v1::Secret;
use tracing::Instrument;

use crate::error::{Error, Result};
use crate::store::{MatchingLabels, ObjectStore};
use crate::template::TemplateRenderer;
use crate::types::{
    AzureCluster, AzureConfig, AzureMachinePool, Cluster, MachinePool, CLUSTER_NAME_LABEL,
};

pub const DEFAULT_NAMESPACE: &str = "default";

/// Worker version used when none is configured. It is not taken from the
/// release like the control plane versions are.
pub const DEFAULT_WORKER_KUBERNETES_VERSION: &str = "v1.19.9";

#[derive(Clone, Debug)]
pub struct MigratorConfig {
    pub cluster_id: String,
    /// Namespace of the encryption secret and of every created object.
    pub namespace: String,
    pub worker_kubernetes_version: String,
}

impl MigratorConfig {
    pub fn new(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            worker_kubernetes_version: DEFAULT_WORKER_KUBERNETES_VERSION.to_string(),
        }
    }
}

/// Legacy objects read for one cluster. Filled by the read phase only.
#[derive(Clone, Debug, Default)]
pub struct SourceResources {
    pub encryption_secret: Option<Secret>,
    pub azure_config: Option<AzureConfig>,
    pub cluster: Option<Cluster>,
    pub azure_cluster: Option<AzureCluster>,
    pub machine_pools: Option<Vec<MachinePool>>,
    pub azure_machine_pools: Option<Vec<AzureMachinePool>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => f.write_str("created"),
            Outcome::AlreadyExists => f.write_str("already exists"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedObject {
    pub kind: String,
    pub name: String,
    pub outcome: Outcome,
}

/// What the write phase did, in creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub objects: Vec<CreatedObject>,
}

impl MigrationReport {
    pub fn created(&self) -> usize {
        self.objects
            .iter()
            .filter(|object| object.outcome == Outcome::Created)
            .count()
    }
}

pub struct Migrator<S> {
    store: S,
    renderer: TemplateRenderer,
    config: MigratorConfig,
    sources: SourceResources,
}

impl<S: ObjectStore> Migrator<S> {
    pub fn new(store: S, config: MigratorConfig) -> Result<Self> {
        Ok(Self {
            store,
            renderer: TemplateRenderer::new()?,
            config,
            sources: SourceResources::default(),
        })
    }

    pub fn sources(&self) -> &SourceResources {
        &self.sources
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn selector(&self) -> MatchingLabels {
        MatchingLabels::new().with(CLUSTER_NAME_LABEL, &self.config.cluster_id)
    }

    /// Reads every source object, then creates every target object.
    pub async fn migrate(&mut self) -> Result<MigrationReport> {
        let span = tracing::info_span!("migration", cluster_id = %self.config.cluster_id);
        async {
            self.read_sources().await?;
            let report = self.create_targets().await?;
            tracing::info!(
                created = report.created(),
                skipped = report.objects.len() - report.created(),
                "migration finished"
            );
            Ok::<_, Error>(report)
        }
        .instrument(span)
        .await
    }

    pub async fn read_sources(&mut self) -> Result<()> {
        self.read_encryption_secret().await?;
        self.read_azure_config().await?;
        self.read_cluster().await?;
        self.read_azure_cluster().await?;
        self.read_machine_pools().await?;
        self.read_azure_machine_pools().await?;
        Ok(())
    }

    /// Stops at the first failure; objects created before it are kept.
    pub async fn create_targets(&self) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();
        report.objects.push(self.create_encryption_config_secret().await?);
        report.objects.push(self.create_proxy_config_secret().await?);
        report.objects.push(self.create_kubeadm_control_plane().await?);
        report
            .objects
            .push(self.create_master_azure_machine_template().await?);
        report
            .objects
            .push(self.create_workers_kubeadm_config_template().await?);
        report
            .objects
            .push(self.create_workers_azure_machine_template().await?);
        report
            .objects
            .push(self.create_workers_machine_deployment().await?);
        Ok(report)
    }
}
