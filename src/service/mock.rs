//! # Mock Data Service
//!
//! A [`DataService`] that answers from a script and records every call, for testing code
//! that writes through the service without a store behind it.
//!
//! ```rust
//! use product_editor::service::{Collection, DataService, MockDataService, ServiceCall};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockDataService::new();
//!     mock.expect_insert(Collection::Product).return_ok();
//!
//!     let record = json!({ "prodcode": "P001", "description": "Widget", "unit": "pc" });
//!     mock.insert(Collection::Product, record.clone()).await.unwrap();
//!
//!     assert_eq!(
//!         mock.calls(),
//!         vec![ServiceCall::Insert { collection: Collection::Product, record }]
//!     );
//!     mock.verify();
//! }
//! ```

use crate::service::{Collection, DataService, ServiceError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// One call received by the mock, in the order it arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    Insert {
        collection: Collection,
        record: Value,
    },
    UpdateByKey {
        collection: Collection,
        key: String,
        patch: Value,
    },
    DeleteByKey {
        collection: Collection,
        key: String,
    },
}

impl ServiceCall {
    pub fn collection(&self) -> Collection {
        match self {
            ServiceCall::Insert { collection, .. }
            | ServiceCall::UpdateByKey { collection, .. }
            | ServiceCall::DeleteByKey { collection, .. } => *collection,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Operation {
    Insert,
    UpdateByKey,
    DeleteByKey,
}

struct Expectation {
    operation: Operation,
    collection: Collection,
    key: Option<String>,
    gate: Option<oneshot::Receiver<()>>,
    response: Result<(), ServiceError>,
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A scripted data service.
///
/// Calls are answered in the order the expectations were registered. A call that does not
/// match the next expectation (operation, collection or key) panics.
#[derive(Default)]
pub struct MockDataService {
    expectations: Expectations,
    calls: Arc<Mutex<Vec<ServiceCall>>>,
}

impl MockDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects an `insert` into `collection`.
    pub fn expect_insert(&self, collection: Collection) -> ExpectationBuilder {
        self.builder(Operation::Insert, collection, None)
    }

    /// Expects an `update_by_key` of `key` in `collection`.
    pub fn expect_update_by_key(&self, collection: Collection, key: &str) -> ExpectationBuilder {
        self.builder(Operation::UpdateByKey, collection, Some(key.to_string()))
    }

    /// Expects a `delete_by_key` of `key` in `collection`.
    pub fn expect_delete_by_key(&self, collection: Collection, key: &str) -> ExpectationBuilder {
        self.builder(Operation::DeleteByKey, collection, Some(key.to_string()))
    }

    fn builder(
        &self,
        operation: Operation,
        collection: Collection,
        key: Option<String>,
    ) -> ExpectationBuilder {
        ExpectationBuilder {
            operation,
            collection,
            key,
            gate: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Panics unless every expectation has been consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    async fn answer(
        &self,
        operation: Operation,
        call: ServiceCall,
        key: Option<&str>,
    ) -> Result<(), ServiceError> {
        let collection = call.collection();
        self.calls.lock().unwrap().push(call);

        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!("Unexpected {operation:?} on {collection}: no expectations left");
        };
        if expectation.operation != operation
            || expectation.collection != collection
            || expectation.key.as_deref() != key
        {
            panic!(
                "Expectation mismatch: expected {:?} on {} ({:?}), got {operation:?} on {collection} ({key:?})",
                expectation.operation, expectation.collection, expectation.key
            );
        }

        if let Some(gate) = expectation.gate {
            let _ = gate.await;
        }
        expectation.response
    }
}

/// Builder for one scripted reply.
pub struct ExpectationBuilder {
    operation: Operation,
    collection: Collection,
    key: Option<String>,
    gate: Option<oneshot::Receiver<()>>,
    expectations: Expectations,
}

impl ExpectationBuilder {
    /// Holds the reply until `gate` fires (or its sender is dropped).
    pub fn wait_for(mut self, gate: oneshot::Receiver<()>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    pub fn return_err(self, error: ServiceError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), ServiceError>) {
        self.expectations.lock().unwrap().push_back(Expectation {
            operation: self.operation,
            collection: self.collection,
            key: self.key,
            gate: self.gate,
            response,
        });
    }
}

#[async_trait]
impl DataService for MockDataService {
    async fn insert(&self, collection: Collection, record: Value) -> Result<(), ServiceError> {
        let call = ServiceCall::Insert { collection, record };
        self.answer(Operation::Insert, call, None).await
    }

    async fn update_by_key(
        &self,
        collection: Collection,
        key: &str,
        patch: Value,
    ) -> Result<(), ServiceError> {
        let call = ServiceCall::UpdateByKey {
            collection,
            key: key.to_string(),
            patch,
        };
        self.answer(Operation::UpdateByKey, call, Some(key)).await
    }

    async fn delete_by_key(&self, collection: Collection, key: &str) -> Result<(), ServiceError> {
        let call = ServiceCall::DeleteByKey {
            collection,
            key: key.to_string(),
        };
        self.answer(Operation::DeleteByKey, call, Some(key)).await
    }
}
