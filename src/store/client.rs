use async_trait::async_trait;
use kube::api::{Api, ListParams, PostParams};
use kube::error::ErrorResponse;
use kube::ResourceExt;

use super::{kind_of, Error, MatchingLabels, ObjectStore, StoredObject};

/// [`ObjectStore`] backed by a live API server.
#[derive(Clone)]
pub struct KubeStore {
    client: kube::Client,
}

impl KubeStore {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn api<K: StoredObject>(&self, namespace: Option<&str>) -> Api<K> {
        match namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }
}

fn map_error<K: StoredObject>(error: kube::Error, name: &str) -> Error {
    match error {
        kube::Error::Api(ErrorResponse { reason, .. }) if reason == "NotFound" => {
            Error::NotFound {
                kind: kind_of::<K>(),
                name: name.to_string(),
            }
        }
        // Other 409s (e.g. "Conflict") mean the object was not written.
        kube::Error::Api(ErrorResponse { reason, .. }) if reason == "AlreadyExists" => {
            Error::AlreadyExists {
                kind: kind_of::<K>(),
                name: name.to_string(),
            }
        }
        error => Error::Kube(error),
    }
}

#[async_trait]
impl ObjectStore for KubeStore {
    async fn get<K: StoredObject>(&self, namespace: Option<&str>, name: &str) -> Result<K, Error> {
        self.api::<K>(namespace)
            .get(name)
            .await
            .map_err(|error| map_error::<K>(error, name))
    }

    async fn list<K: StoredObject>(
        &self,
        namespace: Option<&str>,
        selector: &MatchingLabels,
    ) -> Result<Vec<K>, Error> {
        let params = ListParams::default().labels(&selector.to_string());
        let list = self
            .api::<K>(namespace)
            .list(&params)
            .await
            .map_err(Error::Kube)?;
        Ok(list.items)
    }

    async fn create<K: StoredObject>(&self, obj: &K) -> Result<K, Error> {
        let name = obj.meta().name.clone().ok_or_else(|| Error::MissingName {
            kind: kind_of::<K>(),
        })?;
        self.api::<K>(obj.namespace().as_deref())
            .create(&PostParams::default(), obj)
            .await
            .map_err(|error| map_error::<K>(error, &name))
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::Secret;

    use super::*;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("secrets \"abc123-proxy-config\": {}", reason),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn not_found_reason_maps_to_not_found() {
        let error = map_error::<Secret>(api_error(404, "NotFound"), "abc123-proxy-config");
        assert!(
            matches!(
                &error,
                Error::NotFound { kind, name }
                    if kind == "Secret" && name == "abc123-proxy-config"
            ),
            "{:?}",
            error
        );
    }

    #[test]
    fn already_exists_reason_maps_to_already_exists() {
        let error = map_error::<Secret>(api_error(409, "AlreadyExists"), "abc123-proxy-config");
        assert!(error.is_already_exists(), "{:?}", error);
    }

    #[test]
    fn conflict_is_not_treated_as_already_exists() {
        let error = map_error::<Secret>(api_error(409, "Conflict"), "abc123-proxy-config");
        assert!(!error.is_already_exists(), "{:?}", error);
        assert!(
            matches!(&error, Error::Kube(kube::Error::Api(response)) if response.code == 409),
            "{:?}",
            error
        );
    }

    #[test]
    fn server_errors_pass_through() {
        let error = map_error::<Secret>(api_error(500, "InternalError"), "abc123-proxy-config");
        assert!(
            matches!(&error, Error::Kube(kube::Error::Api(response)) if response.code == 500),
            "{:?}",
            error
        );
    }
}
