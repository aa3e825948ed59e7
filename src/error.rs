use thiserror::Error;

use crate::store;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] store::Error),
    #[error("{kind} not found for cluster ID {cluster_id:?}")]
    NotFound { kind: String, cluster_id: String },
    #[error("more than one {kind} ({count}) for cluster ID {cluster_id:?}")]
    MultipleFound {
        kind: String,
        cluster_id: String,
        count: usize,
    },
    #[error("{kind} has not been read yet")]
    SourceNotLoaded { kind: &'static str },
    #[error("Secret {secret:?} has no {key:?} data")]
    MissingSecretKey { secret: String, key: &'static str },
    #[error("Secret {secret:?} holds non UTF-8 key material")]
    InvalidKeyMaterial {
        secret: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("{kind} {name:?} is missing label {label:?}")]
    MissingLabel {
        kind: &'static str,
        name: String,
        label: &'static str,
    },
    #[error("Release {release:?} has no {component:?} component")]
    ReleaseComponentMissing {
        release: String,
        component: &'static str,
    },
    #[error("Template {template:?} not found: {source}")]
    TemplateNotFound {
        template: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("Failed to render template {template:?}: {source}")]
    RenderTemplateFailed {
        template: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("Failed to parse rendered template {template:?}: {source}")]
    ParseRenderedObjectFailed {
        template: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("VNET CIDR not found for {cluster:?}")]
    VnetCidrMissing { cluster: String },
    #[error("Failed to parse CIDR {cidr:?}: {reason}")]
    ParseCidrFailed { cidr: String, reason: &'static str },
    #[error("can't find domain label 'k8s' in {host:?}")]
    BaseDomainNotFound { host: String },
    #[error("VNET CIDR {cidr} is IPv6, only IPv4 networks are supported")]
    Ipv6Unsupported { cidr: String },
    #[error("master IP for VNET CIDR {cidr} overflows the last octet")]
    MasterIpOutOfRange { cidr: String },
    #[error("Failed to create {kind} {name:?}: {source}")]
    CreateObjectFailed {
        kind: String,
        name: String,
        #[source]
        source: store::Error,
    },
}

impl Error {
    /// True for both a missing named object and an empty label-selected list.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::Store(store::Error::NotFound { .. })
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
