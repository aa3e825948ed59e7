use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kube::runtime::controller::{Context, ReconcilerAction};
use kube::ResourceExt;
#[cfg(test)]
use mockall::automock;
use tracing::Instrument;

use crate::error::Error;
use crate::store::{self, ObjectStore};
use crate::types::Cluster;

/// Fixed retry interval used instead of the framework's backoff.
pub const REQUEUE_AFTER_ERROR: Duration = Duration::from_secs(30);

/// Business logic for live and deleting clusters.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterHandler: Send + Sync {
    async fn reconcile(&self, cluster: &Cluster) -> Result<ReconcilerAction, Error>;

    async fn reconcile_delete(&self, cluster: &Cluster) -> Result<ReconcilerAction, Error>;
}

pub struct NoopClusterHandler;

#[async_trait]
impl ClusterHandler for NoopClusterHandler {
    async fn reconcile(&self, _cluster: &Cluster) -> Result<ReconcilerAction, Error> {
        tracing::debug!("calling reconcile");
        Ok(ReconcilerAction {
            requeue_after: None,
        })
    }

    async fn reconcile_delete(&self, _cluster: &Cluster) -> Result<ReconcilerAction, Error> {
        tracing::debug!("calling reconcileDelete");
        Ok(ReconcilerAction {
            requeue_after: None,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Phase {
    Reconcile,
    ReconcileDelete,
}

impl Phase {
    pub fn of(cluster: &Cluster) -> Self {
        if cluster.metadata.deletion_timestamp.is_some() {
            Phase::ReconcileDelete
        } else {
            Phase::Reconcile
        }
    }
}

pub struct ClusterReconciler<S, H = NoopClusterHandler> {
    store: S,
    handler: H,
    loop_seq: AtomicU64,
}

impl<S: ObjectStore, H: ClusterHandler> ClusterReconciler<S, H> {
    pub fn new(store: S, handler: H) -> Self {
        Self {
            store,
            handler,
            loop_seq: AtomicU64::new(0),
        }
    }

    /// Number of reconcile loops started so far.
    pub fn loops(&self) -> u64 {
        self.loop_seq.load(Ordering::Relaxed)
    }

    pub async fn reconcile_cluster(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<ReconcilerAction, Error> {
        let seq = self.loop_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let object = match namespace {
            Some(namespace) => format!("{}/{}", namespace, name),
            None => name.to_string(),
        };
        let span = tracing::info_span!(
            "reconcile",
            controller = "cluster",
            %object,
            loop_seq = seq
        );

        async {
            let cluster: Cluster = match self.store.get(namespace, name).await {
                Ok(cluster) => cluster,
                Err(store::Error::NotFound { .. }) => {
                    tracing::debug!("cluster is gone, nothing to do");
                    return Ok(ReconcilerAction {
                        requeue_after: None,
                    });
                }
                Err(error) => return Err(Error::Store(error)),
            };

            let res = match Phase::of(&cluster) {
                Phase::ReconcileDelete => self.handler.reconcile_delete(&cluster).await,
                Phase::Reconcile => self.handler.reconcile(&cluster).await,
            };

            match res {
                Ok(action) => Ok(action),
                Err(error) => {
                    tracing::error!(
                        %error,
                        requeue_after = ?REQUEUE_AFTER_ERROR,
                        "failed to reconcile, requeuing"
                    );
                    Ok(ReconcilerAction {
                        requeue_after: Some(REQUEUE_AFTER_ERROR),
                    })
                }
            }
        }
        .instrument(span)
        .await
    }
}

pub async fn reconcile<S: ObjectStore, H: ClusterHandler>(
    cluster: Arc<Cluster>,
    ctx: Context<ClusterReconciler<S, H>>,
) -> Result<ReconcilerAction, Error> {
    ctx.get_ref()
        .reconcile_cluster(cluster.namespace().as_deref(), &cluster.name())
        .await
}

pub fn error_policy<S, H>(
    error: &Error,
    _ctx: Context<ClusterReconciler<S, H>>,
) -> ReconcilerAction {
    tracing::error!(%error);
    ReconcilerAction {
        requeue_after: Some(REQUEUE_AFTER_ERROR),
    }
}
