use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;

use super::Migrator;
use crate::error::{Error, Result};
use crate::store::{kind_of, ObjectStore, StoredObject};

impl<S: ObjectStore> Migrator<S> {
    pub async fn read_encryption_secret(&mut self) -> Result<()> {
        let name = format!("{}-encryption", self.config.cluster_id);
        let secret: Secret = self
            .store
            .get(Some(self.config.namespace.as_str()), &name)
            .await?;

        tracing::debug!(%name, "read encryption secret");
        self.sources.encryption_secret = Some(secret);
        Ok(())
    }

    pub async fn read_azure_config(&mut self) -> Result<()> {
        self.sources.azure_config = Some(self.read_unique().await?);
        Ok(())
    }

    pub async fn read_cluster(&mut self) -> Result<()> {
        self.sources.cluster = Some(self.read_unique().await?);
        Ok(())
    }

    pub async fn read_azure_cluster(&mut self) -> Result<()> {
        self.sources.azure_cluster = Some(self.read_unique().await?);
        Ok(())
    }

    pub async fn read_machine_pools(&mut self) -> Result<()> {
        self.sources.machine_pools = Some(self.read_all().await?);
        Ok(())
    }

    pub async fn read_azure_machine_pools(&mut self) -> Result<()> {
        self.sources.azure_machine_pools = Some(self.read_all().await?);
        Ok(())
    }

    /// The single object of kind `K` labelled with the cluster ID.
    async fn read_unique<K: StoredObject>(&self) -> Result<K> {
        let mut items: Vec<K> = self.store.list(None, &self.selector()).await?;
        match items.len() {
            0 => Err(Error::NotFound {
                kind: kind_of::<K>(),
                cluster_id: self.config.cluster_id.clone(),
            }),
            1 => {
                let obj = items.remove(0);
                tracing::debug!(kind = %kind_of::<K>(), name = %obj.name(), "read source object");
                Ok(obj)
            }
            count => Err(Error::MultipleFound {
                kind: kind_of::<K>(),
                cluster_id: self.config.cluster_id.clone(),
                count,
            }),
        }
    }

    async fn read_all<K: StoredObject>(&self) -> Result<Vec<K>> {
        let items: Vec<K> = self.store.list(None, &self.selector()).await?;
        tracing::debug!(kind = %kind_of::<K>(), count = items.len(), "read source objects");
        Ok(items)
    }
}
