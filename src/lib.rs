//! Migration of Azure clusters from Giant Swarm's AzureConfig model to
//! Cluster API (CAPI/CAPZ) objects, plus the Cluster controller.

pub mod config;
pub mod error;
pub mod fields;
pub mod migration;
pub mod reconcile;
pub mod store;
pub mod template;
pub mod types;

pub use error::{Error, Result};
