//! # StoredRecord Trait
//!
//! The `StoredRecord` trait is the contract every record type (product rows, price-history rows, …)
//! implements to live in a [`CollectionActor`](crate::CollectionActor). It names the record's key,
//! the partial-update payload and the error type, and provides the hooks the actor runs around
//! each mutation.
//!
//! # Keys
//! Unlike a generated-id store, a collection is keyed by a value the record already carries
//! (e.g. a product code). [`StoredRecord::key`] extracts it, and the actor refuses a second
//! insert with the same key the way a unique constraint would.
//!
//! # Provided Methods (Hooks)
//! - [`StoredRecord::on_insert`]
//! - [`StoredRecord::on_delete`]
//!
//! Both default to `Ok(())`. [`StoredRecord::on_update`] has no default: every record decides
//! for itself how a patch applies.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record must implement to be managed by a `CollectionActor`.
pub trait StoredRecord: Clone + Debug + Send + Sync + 'static {
    /// The unique key of the record inside its collection.
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Partial record applied by `update`.
    type Patch: Send + Sync + Debug;

    /// The error type for this record's hooks.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the key the record is stored under.
    fn key(&self) -> Self::Key;

    /// Called before the record is inserted. Reject malformed rows here.
    fn on_insert(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies a patch to the stored record.
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;

    /// Called immediately before the record is removed.
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
