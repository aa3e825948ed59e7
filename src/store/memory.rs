//! In-memory [`ObjectStore`] standing in for the API server in tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use kube::ResourceExt;

use super::{kind_of, Error, MatchingLabels, ObjectStore, StoredObject};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ObjectKey {
    api_version: String,
    kind: String,
    namespace: Option<String>,
    name: String,
}

impl ObjectKey {
    fn of<K: StoredObject>(namespace: Option<&str>, name: &str) -> Self {
        Self {
            api_version: K::api_version(&()).into_owned(),
            kind: kind_of::<K>(),
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<ObjectKey, serde_json::Value>>,
    creates: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object, replacing any previous one with the same key.
    pub fn insert<K: StoredObject>(&self, obj: K) {
        let key = ObjectKey::of::<K>(obj.namespace().as_deref(), &obj.name());
        let value = serde_json::to_value(&obj).expect("serializable test object");
        self.objects.lock().unwrap().insert(key, value);
    }

    pub fn remove<K: StoredObject>(&self, namespace: Option<&str>, name: &str) {
        self.objects
            .lock()
            .unwrap()
            .remove(&ObjectKey::of::<K>(namespace, name));
    }

    /// All stored objects of kind `K`, in key order.
    pub fn all<K: StoredObject>(&self) -> Vec<K> {
        let kind = kind_of::<K>();
        let api_version = K::api_version(&()).into_owned();
        self.objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.kind == kind && key.api_version == api_version)
            .map(|(_, value)| serde_json::from_value(value.clone()).expect("stored test object"))
            .collect()
    }

    /// `kind/name` of every successful create, in call order.
    pub fn created(&self) -> Vec<String> {
        self.creates.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get<K: StoredObject>(&self, namespace: Option<&str>, name: &str) -> Result<K, Error> {
        let value = self
            .objects
            .lock()
            .unwrap()
            .get(&ObjectKey::of::<K>(namespace, name))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: kind_of::<K>(),
                name: name.to_string(),
            })?;
        serde_json::from_value(value).map_err(|source| Error::Serialization {
            kind: kind_of::<K>(),
            source,
        })
    }

    async fn list<K: StoredObject>(
        &self,
        namespace: Option<&str>,
        selector: &MatchingLabels,
    ) -> Result<Vec<K>, Error> {
        Ok(self
            .all::<K>()
            .into_iter()
            .filter(|obj| namespace.is_none() || obj.namespace().as_deref() == namespace)
            .filter(|obj| selector.matches(obj.labels()))
            .collect())
    }

    async fn create<K: StoredObject>(&self, obj: &K) -> Result<K, Error> {
        let name = obj.meta().name.clone().ok_or_else(|| Error::MissingName {
            kind: kind_of::<K>(),
        })?;
        let key = ObjectKey::of::<K>(obj.namespace().as_deref(), &name);
        let value = serde_json::to_value(obj).map_err(|source| Error::Serialization {
            kind: kind_of::<K>(),
            source,
        })?;

        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&key) {
            return Err(Error::AlreadyExists {
                kind: kind_of::<K>(),
                name,
            });
        }
        objects.insert(key, value);
        self.creates
            .lock()
            .unwrap()
            .push(format!("{}/{}", kind_of::<K>(), name));

        Ok(obj.clone())
    }
}
