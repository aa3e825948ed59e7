use anyhow::{Context, Result};
use clap::Parser;

use azure_capi_migration::config::MigrateArgs;
use azure_capi_migration::migration::Migrator;
use azure_capi_migration::store::KubeStore;

#[tokio::main]
async fn main() -> Result<()> {
    let args = MigrateArgs::parse();
    args.kube.init_tracing();

    let client = args.kube.client().await?;
    let mut migrator = Migrator::new(KubeStore::new(client), args.migrator_config())?;

    let migration = async {
        match args.timeout() {
            Some(timeout) => tokio::time::timeout(timeout, migrator.migrate())
                .await
                .with_context(|| format!("migration did not finish within {:?}", timeout))?
                .map_err(anyhow::Error::from),
            None => migrator.migrate().await.map_err(anyhow::Error::from),
        }
    };

    let report = tokio::select! {
        report = migration => report
            .with_context(|| format!("migrating cluster {}", args.cluster_id))?,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("migration interrupted"),
    };

    for object in &report.objects {
        tracing::info!(kind = %object.kind, name = %object.name, outcome = %object.outcome);
    }

    Ok(())
}
