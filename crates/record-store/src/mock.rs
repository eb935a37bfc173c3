//! # Mock Collections
//!
//! Two ways to test code that talks to a [`CollectionClient`] without running a real
//! [`CollectionActor`](crate::CollectionActor):
//!
//! | | [`MockCollection`] | [`create_mock_client`] |
//! |---|---|---|
//! | **Style** | Scripted responses, checked with `verify()` | Inspect each request by hand |
//! | **Good for** | Replies that do not depend on the payload | Asserting on the exact payload sent |
//! | **Error injection** | `return_err(...)` | Send any `Err` on the responder |
//!
//! ```rust
//! use record_store::mock::MockCollection;
//! use record_store::{StoreError, StoredRecord};
//!
//! #[derive(Clone, Debug)] struct Row { code: String }
//! #[derive(Debug)] struct RowPatch;
//! #[derive(Debug, thiserror::Error)] #[error("row error")] struct RowError;
//!
//! impl StoredRecord for Row {
//!     type Key = String; type Patch = RowPatch; type Error = RowError;
//!     fn key(&self) -> String { self.code.clone() }
//!     fn on_update(&mut self, _: RowPatch) -> Result<(), RowError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockCollection::<Row>::new();
//!     mock.expect_insert().return_err(StoreError::DuplicateKey("A1".into()));
//!
//!     let client = mock.client();
//!     let result = client.insert(Row { code: "A1".into() }).await;
//!     assert!(matches!(result, Err(StoreError::DuplicateKey(_))));
//!     mock.verify();
//! }
//! ```

use crate::client::CollectionClient;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::record::StoredRecord;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted reply for the next request the mock receives.
enum Expectation<T: StoredRecord> {
    Insert {
        response: Result<T::Key, StoreError>,
    },
    Get {
        key: T::Key,
        response: Result<Option<T>, StoreError>,
    },
    Update {
        key: T::Key,
        response: Result<T, StoreError>,
    },
    Delete {
        key: T::Key,
        response: Result<(), StoreError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock collection with expectation tracking.
///
/// Requests are answered in the order the expectations were registered. A request that does
/// not match the next expectation (wrong operation or wrong key) panics the mock task, which
/// surfaces in the test as `StoreError::ActorDropped`.
pub struct MockCollection<T: StoredRecord> {
    client: CollectionClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: StoredRecord> Default for MockCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoredRecord> MockCollection<T> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let pending = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = pending.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        StoreRequest::Insert { respond_to, .. },
                        Some(Expectation::Insert { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Get { key, respond_to },
                        Some(Expectation::Get {
                            key: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(key, expected, "Get for unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Update {
                            key, respond_to, ..
                        },
                        Some(Expectation::Update {
                            key: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(key, expected, "Update for unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Delete { key, respond_to },
                        Some(Expectation::Delete {
                            key: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(key, expected, "Delete for unexpected key");
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: CollectionClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> CollectionClient<T> {
        self.client.clone()
    }

    /// Expects an `insert`.
    pub fn expect_insert(&mut self) -> InsertExpectationBuilder<T> {
        InsertExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `get` for `key`.
    pub fn expect_get(&mut self, key: T::Key) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            key,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an `update` of `key`.
    pub fn expect_update(&mut self, key: T::Key) -> UpdateExpectationBuilder<T> {
        UpdateExpectationBuilder {
            key,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `delete` of `key`.
    pub fn expect_delete(&mut self, key: T::Key) -> DeleteExpectationBuilder<T> {
        DeleteExpectationBuilder {
            key,
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every expectation has been consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder for `insert` expectations.
pub struct InsertExpectationBuilder<T: StoredRecord> {
    expectations: Expectations<T>,
}

impl<T: StoredRecord> InsertExpectationBuilder<T> {
    pub fn return_ok(self, key: T::Key) {
        self.push(Ok(key));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T::Key, StoreError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Insert { response });
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: StoredRecord> {
    key: T::Key,
    expectations: Expectations<T>,
}

impl<T: StoredRecord> GetExpectationBuilder<T> {
    pub fn return_ok(self, value: Option<T>) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Option<T>, StoreError>) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            key: self.key,
            response,
        });
    }
}

/// Builder for `update` expectations.
pub struct UpdateExpectationBuilder<T: StoredRecord> {
    key: T::Key,
    expectations: Expectations<T>,
}

impl<T: StoredRecord> UpdateExpectationBuilder<T> {
    pub fn return_ok(self, updated: T) {
        self.push(Ok(updated));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, StoreError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Update {
                key: self.key,
                response,
            });
    }
}

/// Builder for `delete` expectations.
pub struct DeleteExpectationBuilder<T: StoredRecord> {
    key: T::Key,
    expectations: Expectations<T>,
}

impl<T: StoredRecord> DeleteExpectationBuilder<T> {
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), StoreError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Delete {
                key: self.key,
                response,
            });
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// Use this when the test needs to look at the payload itself: receive the request with
/// [`expect_insert`] / [`expect_update`] / [`expect_delete`], assert on it, then answer
/// through the returned responder.
pub fn create_mock_client<T: StoredRecord>(
    buffer_size: usize,
) -> (CollectionClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(sender), receiver)
}

/// Returns the next request if it is an Insert.
pub async fn expect_insert<T: StoredRecord>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T, oneshot::Sender<Result<T::Key, StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Insert { record, respond_to }) => Some((record, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is an Update.
pub async fn expect_update<T: StoredRecord>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Key, T::Patch, oneshot::Sender<Result<T, StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Update {
            key,
            patch,
            respond_to,
        }) => Some((key, patch, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is a Delete.
pub async fn expect_delete<T: StoredRecord>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Key, oneshot::Sender<Result<(), StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Delete { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        code: String,
        note: String,
    }

    #[derive(Debug)]
    struct RowPatch {
        note: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("row error")]
    struct RowError;

    impl StoredRecord for Row {
        type Key = String;
        type Patch = RowPatch;
        type Error = RowError;

        fn key(&self) -> String {
            self.code.clone()
        }

        fn on_update(&mut self, patch: RowPatch) -> Result<(), RowError> {
            self.note = patch.note;
            Ok(())
        }
    }

    fn row(code: &str, note: &str) -> Row {
        Row {
            code: code.to_string(),
            note: note.to_string(),
        }
    }

    #[tokio::test]
    async fn test_raw_insert_exposes_payload() {
        let (client, mut receiver) = create_mock_client::<Row>(10);

        let insert_task = tokio::spawn(async move { client.insert(row("A1", "first")).await });

        let (record, responder) = expect_insert(&mut receiver)
            .await
            .expect("Expected Insert request");
        assert_eq!(record, row("A1", "first"));
        responder.send(Ok("A1".to_string())).unwrap();

        let result = insert_task.await.unwrap();
        assert!(matches!(result, Ok(key) if key == "A1"));
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mut mock = MockCollection::<Row>::new();
        mock.expect_insert().return_ok("A1".to_string());
        mock.expect_update("A1".to_string())
            .return_ok(row("A1", "second"));
        mock.expect_delete("A1".to_string())
            .return_err(StoreError::NotFound("A1".to_string()));

        let client = mock.client();
        assert_eq!(client.insert(row("A1", "first")).await.unwrap(), "A1");

        let patch = RowPatch {
            note: "second".to_string(),
        };
        let updated = client.update("A1".to_string(), patch).await.unwrap();
        assert_eq!(updated.note, "second");

        let deleted = client.delete("A1".to_string()).await;
        assert!(matches!(deleted, Err(StoreError::NotFound(_))));

        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatched_request_drops_responder() {
        let mut mock = MockCollection::<Row>::new();
        mock.expect_get("A1".to_string()).return_ok(None);

        let client = mock.client();
        let result = client.insert(row("A1", "first")).await;
        assert!(matches!(result, Err(StoreError::ActorDropped)));
    }
}
