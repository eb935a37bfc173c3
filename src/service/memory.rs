use crate::model::{PriceHistoryEntry, Product, ProductCode, ProductPatch};
use crate::service::{Collection, DataService, ServiceError};
use async_trait::async_trait;
use record_store::{CollectionActor, CollectionClient};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// In-process data service backed by one collection actor per table.
///
/// `product` is keyed by `prodcode`; `pricehist` by `(prodcode, effdate)` and only accepts
/// inserts, like an append-only history table.
///
/// # Example
///
/// ```ignore
/// let service = MemoryDataService::start(32);
/// service.insert(Collection::Product, json!({ "prodcode": "P001", ... })).await?;
/// let stored = service.product("P001").await?;
/// service.shutdown().await?;
/// ```
pub struct MemoryDataService {
    products: CollectionClient<Product>,
    price_history: CollectionClient<PriceHistoryEntry>,
    handles: Vec<JoinHandle<()>>,
}

impl MemoryDataService {
    /// Spawns both collection actors. Must be called inside a Tokio runtime.
    pub fn start(buffer_size: usize) -> Self {
        let (product_actor, products) =
            CollectionActor::new(Collection::Product.table(), buffer_size);
        let (price_actor, price_history) =
            CollectionActor::new(Collection::PriceHistory.table(), buffer_size);

        let handles = vec![
            tokio::spawn(product_actor.run()),
            tokio::spawn(price_actor.run()),
        ];
        info!(buffer_size, "In-memory data service started");

        Self {
            products,
            price_history,
            handles,
        }
    }

    /// Wraps existing clients without owning the actors behind them.
    pub fn from_clients(
        products: CollectionClient<Product>,
        price_history: CollectionClient<PriceHistoryEntry>,
    ) -> Self {
        Self {
            products,
            price_history,
            handles: Vec::new(),
        }
    }

    /// Reads one product back.
    pub async fn product(&self, code: &str) -> Result<Option<Product>, ServiceError> {
        Ok(self.products.get(ProductCode::from(code)).await?)
    }

    /// All products, ordered by code.
    pub async fn products(&self) -> Result<Vec<Product>, ServiceError> {
        let mut products = self.products.list().await?;
        products.sort_by(|a, b| a.code.as_str().cmp(b.code.as_str()));
        Ok(products)
    }

    /// Price history of one product, oldest first.
    pub async fn price_history(&self, code: &str) -> Result<Vec<PriceHistoryEntry>, ServiceError> {
        let mut entries: Vec<_> = self
            .price_history
            .list()
            .await?
            .into_iter()
            .filter(|entry| entry.product_code.as_str() == code)
            .collect();
        entries.sort_by_key(|entry| entry.effective_date);
        Ok(entries)
    }

    /// Closes both collections and waits for their actors to stop.
    ///
    /// Clones of the clients held elsewhere keep an actor alive until they are dropped too.
    pub async fn shutdown(self) -> Result<(), ServiceError> {
        info!("Shutting down in-memory data service...");
        drop(self.products);
        drop(self.price_history);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Collection actor failed: {:?}", e);
                return Err(ServiceError::Unavailable(format!(
                    "collection actor failed: {e}"
                )));
            }
        }

        info!("In-memory data service stopped.");
        Ok(())
    }
}

#[async_trait]
impl DataService for MemoryDataService {
    #[instrument(skip(self, record))]
    async fn insert(&self, collection: Collection, record: Value) -> Result<(), ServiceError> {
        debug!(%record, "Sending request");
        match collection {
            Collection::Product => {
                let product: Product = serde_json::from_value(record)?;
                self.products.insert(product).await?;
            }
            Collection::PriceHistory => {
                let entry: PriceHistoryEntry = serde_json::from_value(record)?;
                self.price_history.insert(entry).await?;
            }
        }
        Ok(())
    }

    #[instrument(skip(self, patch))]
    async fn update_by_key(
        &self,
        collection: Collection,
        key: &str,
        patch: Value,
    ) -> Result<(), ServiceError> {
        debug!(%patch, "Sending request");
        match collection {
            Collection::Product => {
                let patch: ProductPatch = serde_json::from_value(patch)?;
                self.products.update(ProductCode::from(key), patch).await?;
                Ok(())
            }
            Collection::PriceHistory => Err(ServiceError::Unsupported {
                collection,
                operation: "update_by_key",
            }),
        }
    }

    #[instrument(skip(self))]
    async fn delete_by_key(&self, collection: Collection, key: &str) -> Result<(), ServiceError> {
        debug!("Sending request");
        match collection {
            Collection::Product => {
                self.products.delete(ProductCode::from(key)).await?;
                Ok(())
            }
            Collection::PriceHistory => Err(ServiceError::Unsupported {
                collection,
                operation: "delete_by_key",
            }),
        }
    }
}
