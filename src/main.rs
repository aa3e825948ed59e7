use anyhow::Result;
use clap::Parser;
use futures_util::stream::StreamExt;
use kube::api::{Api, ListParams};
use kube::runtime::controller::{Context, Controller};

use azure_capi_migration::config::ControllerArgs;
use azure_capi_migration::reconcile::{self, ClusterReconciler, NoopClusterHandler};
use azure_capi_migration::store::KubeStore;
use azure_capi_migration::types::Cluster;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ControllerArgs::parse();
    args.kube.init_tracing();

    let client = args.kube.client().await?;

    let cluster_api = match &args.watch_namespace {
        Some(namespace) => Api::<Cluster>::namespaced(client.clone(), namespace),
        None => Api::<Cluster>::all(client.clone()),
    };

    Controller::new(cluster_api, ListParams::default())
        .shutdown_on_signal()
        .run(
            reconcile::reconcile::<KubeStore, NoopClusterHandler>,
            reconcile::error_policy::<KubeStore, NoopClusterHandler>,
            Context::new(ClusterReconciler::new(
                KubeStore::new(client),
                NoopClusterHandler,
            )),
        )
        .for_each(|res| async move {
            match res {
                Ok(o) => tracing::info!("reconciled {:?}", o),
                Err(e) => tracing::warn!("reconcile failed: {}", e),
            }
        })
        .await;

    tracing::info!("controller terminated");

    Ok(())
}
