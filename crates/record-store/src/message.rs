//! # Store Messages
//!
//! The request type a [`CollectionClient`](crate::CollectionClient) sends to its
//! [`CollectionActor`](crate::CollectionActor).

use crate::error::StoreError;
use crate::record::StoredRecord;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by collection actors.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Message sent to a collection actor.
///
/// The variants mirror what a hosted table offers: insert a row, read one back by key,
/// patch a row by key, delete a row by key, and list everything.
#[derive(Debug)]
pub enum StoreRequest<T: StoredRecord> {
    Insert {
        record: T,
        respond_to: Response<T::Key>,
    },
    Get {
        key: T::Key,
        respond_to: Response<Option<T>>,
    },
    Update {
        key: T::Key,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        key: T::Key,
        respond_to: Response<()>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
}
