//! # Store Errors
//!
//! Errors shared by every collection actor and client.

/// Errors that can occur within a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Collection actor closed")]
    ActorClosed,
    #[error("Collection actor dropped response channel")]
    ActorDropped,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Record error: {0}")]
    Record(Box<dyn std::error::Error + Send + Sync>),
}
