use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, ValueEnum};
use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing_subscriber::EnvFilter;

use crate::migration::{MigratorConfig, DEFAULT_NAMESPACE, DEFAULT_WORKER_KUBERNETES_VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Flags shared by every binary.
#[derive(Args, Clone, Debug)]
pub struct KubeArgs {
    /// Kubeconfig of the management cluster; in-cluster or default config when unset.
    #[arg(long, env = "KUBECONFIG")]
    pub kubeconfig: Option<PathBuf>,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl KubeArgs {
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        match self.log_format {
            LogFormat::Text => builder.init(),
            LogFormat::Json => builder.json().init(),
        }
    }

    pub async fn client(&self) -> anyhow::Result<kube::Client> {
        match &self.kubeconfig {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path)
                    .with_context(|| format!("reading kubeconfig {}", path.display()))?;
                let config =
                    kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                        .await
                        .context("loading kubeconfig")?;
                Ok(kube::Client::try_from(config)?)
            }
            None => Ok(kube::Client::try_default().await?),
        }
    }
}

/// Watches CAPI Cluster objects.
#[derive(Parser, Debug)]
#[command(name = "controller", version)]
pub struct ControllerArgs {
    #[command(flatten)]
    pub kube: KubeArgs,

    /// Only watch Clusters in this namespace; all namespaces when unset.
    #[arg(long, env = "WATCH_NAMESPACE")]
    pub watch_namespace: Option<String>,
}

/// Migrates one AzureConfig cluster to CAPI/CAPZ objects.
#[derive(Parser, Debug)]
#[command(name = "migrate", version)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub kube: KubeArgs,

    #[arg(long, env = "CLUSTER_ID")]
    pub cluster_id: String,

    /// Namespace holding the encryption secret and receiving the new objects.
    #[arg(long, env = "MIGRATION_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Kubernetes version of the worker MachineDeployment.
    #[arg(
        long,
        env = "WORKER_KUBERNETES_VERSION",
        default_value = DEFAULT_WORKER_KUBERNETES_VERSION
    )]
    pub worker_kubernetes_version: String,

    /// Abort the whole migration after this many seconds.
    #[arg(long, env = "MIGRATION_TIMEOUT_SECONDS")]
    pub timeout_seconds: Option<u64>,
}

impl MigrateArgs {
    pub fn migrator_config(&self) -> MigratorConfig {
        MigratorConfig {
            cluster_id: self.cluster_id.clone(),
            namespace: self.namespace.clone(),
            worker_kubernetes_version: self.worker_kubernetes_version.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
