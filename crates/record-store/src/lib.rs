//! # Record Store
//!
//! An in-memory, actor-backed store for keyed record collections. Each collection is a
//! [`CollectionActor`] running in its own Tokio task; callers talk to it through a cheap,
//! cloneable [`CollectionClient`].
//!
//! ## Architecture Overview
//!
//! 1. **Record Layer** ([`StoredRecord`]) - the row type, its key and how patches apply
//! 2. **Runtime Layer** ([`CollectionActor`]) - sequential request processing over a `HashMap`
//! 3. **Interface Layer** ([`CollectionClient`]) - async insert/get/update/delete/list
//!
//! The actor enforces key uniqueness on insert, which makes it a faithful stand-in for a
//! hosted table with a primary key.
//!
//! ```rust
//! use record_store::{CollectionActor, StoreError, StoredRecord};
//!
//! #[derive(Clone, Debug)]
//! struct Row { code: String, note: String }
//! #[derive(Debug)] struct RowPatch { note: Option<String> }
//! #[derive(Debug, thiserror::Error)] #[error("row error")] struct RowError;
//!
//! impl StoredRecord for Row {
//!     type Key = String;
//!     type Patch = RowPatch;
//!     type Error = RowError;
//!
//!     fn key(&self) -> String { self.code.clone() }
//!
//!     fn on_update(&mut self, patch: RowPatch) -> Result<(), RowError> {
//!         if let Some(note) = patch.note { self.note = note; }
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = CollectionActor::<Row>::new("row", 10);
//!     tokio::spawn(actor.run());
//!
//!     client.insert(Row { code: "A1".into(), note: "first".into() }).await.unwrap();
//!     let again = client.insert(Row { code: "A1".into(), note: "other".into() }).await;
//!     assert!(matches!(again, Err(StoreError::DuplicateKey(_))));
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides [`mock::MockCollection`] and raw channel helpers for testing
//! code that holds a `CollectionClient` without running an actor.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod record;

pub use actor::CollectionActor;
pub use client::CollectionClient;
pub use error::StoreError;
pub use message::{Response, StoreRequest};
pub use record::StoredRecord;
