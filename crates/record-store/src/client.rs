//! # Collection Client
//!
//! The async handle used to talk to a [`CollectionActor`](crate::CollectionActor).

use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::record::StoredRecord;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for one collection.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks. Every
/// method sends one request and waits for the actor's reply on a oneshot channel.
pub struct CollectionClient<T: StoredRecord> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: StoredRecord> Clone for CollectionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: StoredRecord> CollectionClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn insert(&self, record: T) -> Result<T::Key, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Insert { record, respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn get(&self, key: T::Key) -> Result<Option<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Get { key, respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn update(&self, key: T::Key, patch: T::Patch) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Update {
                key,
                patch,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn delete(&self, key: T::Key) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete { key, respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::List { respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }
}
