//! Typed access to the management cluster's API server.

mod client;
#[cfg(test)]
pub mod memory;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use client::KubeStore;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} {name:?} not found")]
    NotFound { kind: String, name: String },
    #[error("{kind} {name:?} already exists")]
    AlreadyExists { kind: String, name: String },
    #[error("{kind} has no .metadata.name")]
    MissingName { kind: String },
    #[error("Kubernetes API request failed: {0}")]
    Kube(#[source] kube::Error),
    #[error("Failed to (de)serialize {kind}: {source}")]
    Serialization {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. })
    }
}

/// Everything the store needs to move an object to and from the API server.
pub trait StoredObject:
    Resource<DynamicType = ()>
    + Clone
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<K> StoredObject for K where
    K: Resource<DynamicType = ()>
        + Clone
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// Equality-based label selector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchingLabels(BTreeMap<String, String>);

impl MatchingLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.0
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }
}

impl fmt::Display for MatchingLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Get, list and create typed objects.
///
/// `AlreadyExists` is reported as an error; deciding whether that is fine is
/// up to the caller. A `None` namespace means cluster-scoped for `get` and
/// all namespaces for `list`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get<K: StoredObject>(&self, namespace: Option<&str>, name: &str) -> Result<K, Error>;

    async fn list<K: StoredObject>(
        &self,
        namespace: Option<&str>,
        selector: &MatchingLabels,
    ) -> Result<Vec<K>, Error>;

    async fn create<K: StoredObject>(&self, obj: &K) -> Result<K, Error>;
}

pub(crate) fn kind_of<K: StoredObject>() -> String {
    K::kind(&()).into_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::MatchingLabels;

    #[test]
    fn selector_renders_sorted_pairs() {
        let selector = MatchingLabels::new()
            .with("release.giantswarm.io/version", "14.1.0")
            .with("cluster.x-k8s.io/cluster-name", "abc123");

        assert_eq!(
            selector.to_string(),
            "cluster.x-k8s.io/cluster-name=abc123,release.giantswarm.io/version=14.1.0"
        );
    }

    #[test]
    fn selector_requires_every_label() {
        let selector = MatchingLabels::new().with("cluster.x-k8s.io/cluster-name", "abc123");

        let mut labels = BTreeMap::new();
        assert!(!selector.matches(&labels));

        labels.insert("cluster.x-k8s.io/cluster-name".to_string(), "other".to_string());
        assert!(!selector.matches(&labels));

        labels.insert("cluster.x-k8s.io/cluster-name".to_string(), "abc123".to_string());
        labels.insert("unrelated".to_string(), "x".to_string());
        assert!(selector.matches(&labels));

        assert!(MatchingLabels::new().matches(&BTreeMap::new()));
    }
}
