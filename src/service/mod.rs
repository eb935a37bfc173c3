//! # Data Service
//!
//! The editor's only collaborator: a hosted table store with `product` and `pricehist`
//! collections. Records travel as JSON values in the wire shape of each collection.
//!
//! | Implementation | Backing |
//! |---|---|
//! | [`MemoryDataService`] | One `record-store` collection actor per table |
//! | [`RestDataService`] | PostgREST-style HTTP endpoint |
//! | [`MockDataService`] | Scripted replies and a call log, for tests |

pub mod memory;
pub mod mock;
pub mod rest;

pub use memory::MemoryDataService;
pub use mock::{MockDataService, ServiceCall};
pub use rest::RestDataService;

use async_trait::async_trait;
use record_store::StoreError;
use serde_json::Value;
use std::fmt::Display;

/// The collections the editor writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Product,
    PriceHistory,
}

impl Collection {
    /// Table name on the remote service.
    pub fn table(self) -> &'static str {
        match self {
            Collection::Product => "product",
            Collection::PriceHistory => "pricehist",
        }
    }

    /// Column that `update_by_key` and `delete_by_key` match on.
    pub fn key_column(self) -> &'static str {
        "prodcode"
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// Errors reported by any data service backend.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("{operation} is not supported on {collection}")]
    Unsupported {
        collection: Collection,
        operation: &'static str,
    },

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey(key) => ServiceError::DuplicateKey(key),
            StoreError::NotFound(key) => ServiceError::NotFound(key),
            StoreError::Record(source) => ServiceError::InvalidRecord(source.to_string()),
            StoreError::ActorClosed | StoreError::ActorDropped => {
                ServiceError::Unavailable(e.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::InvalidRecord(e.to_string())
    }
}

/// Generic request/response interface to the remote table store.
///
/// Keys are the `prodcode` value of the targeted row.
#[async_trait]
pub trait DataService: Send + Sync {
    async fn insert(&self, collection: Collection, record: Value) -> Result<(), ServiceError>;

    async fn update_by_key(
        &self,
        collection: Collection,
        key: &str,
        patch: Value,
    ) -> Result<(), ServiceError>;

    async fn delete_by_key(&self, collection: Collection, key: &str) -> Result<(), ServiceError>;
}
