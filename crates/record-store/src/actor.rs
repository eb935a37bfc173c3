//! # Collection Actor
//!
//! This module defines the `CollectionActor`, the server half of a record store. It owns the
//! rows of one collection and processes requests one at a time, so the map needs no lock.

use crate::client::CollectionClient;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::record::StoredRecord;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns one collection of records.
///
/// Each actor runs in its own Tokio task and processes its messages sequentially, which
/// gives it exclusive access to `rows` without any `Mutex`.
///
/// # Usage Pattern
///
/// 1.  **Create**: `CollectionActor::new()` returns the actor and a cloneable client.
/// 2.  **Run**: spawn `actor.run()` on the runtime.
/// 3.  **Stop**: drop every client; the loop ends when the channel closes.
///
/// ```rust
/// use record_store::{CollectionActor, StoredRecord};
///
/// #[derive(Clone, Debug)] struct Row { code: String, note: String }
/// #[derive(Debug)] struct RowPatch { note: String }
/// #[derive(Debug, thiserror::Error)] #[error("row error")] struct RowError;
///
/// impl StoredRecord for Row {
///     type Key = String;
///     type Patch = RowPatch;
///     type Error = RowError;
///     fn key(&self) -> String { self.code.clone() }
///     fn on_update(&mut self, patch: RowPatch) -> Result<(), RowError> {
///         self.note = patch.note;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = CollectionActor::<Row>::new("row", 10);
///     tokio::spawn(actor.run());
///
///     let row = Row { code: "A1".into(), note: "first".into() };
///     let key = client.insert(row).await.unwrap();
///     assert_eq!(key, "A1");
/// }
/// ```
///
/// ## Operations
///
/// * **Insert**: runs `on_insert`, then stores the row unless its key is already taken
///   (`StoreError::DuplicateKey`).
/// * **Get**: clone of the row, or `None`.
/// * **Update**: runs `on_update` against the stored row and returns the new state. A missing
///   key is `StoreError::NotFound`.
/// * **Delete**: runs `on_delete`, then removes the row.
/// * **List**: clones of every row, in no particular order.
pub struct CollectionActor<T: StoredRecord> {
    name: &'static str,
    receiver: mpsc::Receiver<StoreRequest<T>>,
    rows: HashMap<T::Key, T>,
}

impl<T: StoredRecord> CollectionActor<T> {
    /// Creates a new `CollectionActor` and its associated `CollectionClient`.
    ///
    /// * `name` - collection name used in log fields.
    /// * `buffer_size` - capacity of the request channel; callers wait when it is full.
    pub fn new(name: &'static str, buffer_size: usize) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name,
            receiver,
            rows: HashMap::new(),
        };
        (actor, CollectionClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        let collection = self.name;
        info!(collection, "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert {
                    mut record,
                    respond_to,
                } => {
                    debug!(collection, ?record, "Insert");
                    if let Err(e) = record.on_insert() {
                        warn!(collection, error = %e, "on_insert failed");
                        let _ = respond_to.send(Err(StoreError::Record(Box::new(e))));
                        continue;
                    }
                    let key = record.key();
                    if self.rows.contains_key(&key) {
                        warn!(collection, %key, "Duplicate key");
                        let _ = respond_to.send(Err(StoreError::DuplicateKey(key.to_string())));
                        continue;
                    }
                    self.rows.insert(key.clone(), record);
                    info!(collection, %key, size = self.rows.len(), "Inserted");
                    let _ = respond_to.send(Ok(key));
                }
                StoreRequest::Get { key, respond_to } => {
                    let row = self.rows.get(&key).cloned();
                    debug!(collection, %key, found = row.is_some(), "Get");
                    let _ = respond_to.send(Ok(row));
                }
                StoreRequest::Update {
                    key,
                    patch,
                    respond_to,
                } => {
                    debug!(collection, %key, ?patch, "Update");
                    let Some(row) = self.rows.get_mut(&key) else {
                        warn!(collection, %key, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(key.to_string())));
                        continue;
                    };
                    // Patch a copy so a rejected patch leaves the stored row untouched.
                    let mut updated = row.clone();
                    match updated.on_update(patch) {
                        Ok(()) => {
                            *row = updated.clone();
                            info!(collection, %key, "Updated");
                            let _ = respond_to.send(Ok(updated));
                        }
                        Err(e) => {
                            warn!(collection, %key, error = %e, "Update failed");
                            let _ = respond_to.send(Err(StoreError::Record(Box::new(e))));
                        }
                    }
                }
                StoreRequest::Delete { key, respond_to } => {
                    debug!(collection, %key, "Delete");
                    let Some(row) = self.rows.get(&key) else {
                        warn!(collection, %key, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(key.to_string())));
                        continue;
                    };
                    if let Err(e) = row.on_delete() {
                        warn!(collection, %key, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(StoreError::Record(Box::new(e))));
                        continue;
                    }
                    self.rows.remove(&key);
                    info!(collection, %key, size = self.rows.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                StoreRequest::List { respond_to } => {
                    debug!(collection, size = self.rows.len(), "List");
                    let _ = respond_to.send(Ok(self.rows.values().cloned().collect()));
                }
            }
        }

        info!(collection, size = self.rows.len(), "Shutdown");
    }
}
