use record_store::{CollectionActor, StoreError, StoredRecord};

// --- Test Record ---

#[derive(Clone, Debug, PartialEq)]
struct Item {
    sku: String,
    label: String,
}

#[derive(Debug)]
struct ItemPatch {
    sku: Option<String>,
    label: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum ItemError {
    #[error("sku must not be empty")]
    EmptySku,
    #[error("sku is immutable")]
    SkuChanged,
}

impl StoredRecord for Item {
    type Key = String;
    type Patch = ItemPatch;
    type Error = ItemError;

    fn key(&self) -> String {
        self.sku.clone()
    }

    fn on_insert(&mut self) -> Result<(), ItemError> {
        if self.sku.is_empty() {
            return Err(ItemError::EmptySku);
        }
        Ok(())
    }

    fn on_update(&mut self, patch: ItemPatch) -> Result<(), ItemError> {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(sku) = patch.sku {
            if sku != self.sku {
                return Err(ItemError::SkuChanged);
            }
        }
        Ok(())
    }
}

fn item(sku: &str, label: &str) -> Item {
    Item {
        sku: sku.to_string(),
        label: label.to_string(),
    }
}

// --- Tests ---

#[tokio::test]
async fn test_collection_full_lifecycle() {
    let (actor, client) = CollectionActor::new("item", 10);
    let handle = tokio::spawn(actor.run());

    // 1. Insert
    let key = client.insert(item("A1", "first")).await.unwrap();
    assert_eq!(key, "A1");

    // 2. Get
    let stored = client.get("A1".to_string()).await.unwrap();
    assert_eq!(stored, Some(item("A1", "first")));

    // 3. Update
    let patch = ItemPatch {
        sku: Some("A1".to_string()),
        label: Some("second".to_string()),
    };
    let updated = client.update("A1".to_string(), patch).await.unwrap();
    assert_eq!(updated.label, "second");

    // 4. List
    client.insert(item("B2", "other")).await.unwrap();
    let mut all = client.list().await.unwrap();
    all.sort_by(|a, b| a.sku.cmp(&b.sku));
    assert_eq!(all, vec![item("A1", "second"), item("B2", "other")]);

    // 5. Delete
    client.delete("A1".to_string()).await.unwrap();
    assert!(client.get("A1".to_string()).await.unwrap().is_none());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_duplicate_key_is_rejected() {
    let (actor, client) = CollectionActor::new("item", 10);
    tokio::spawn(actor.run());

    client.insert(item("A1", "first")).await.unwrap();
    let result = client.insert(item("A1", "again")).await;
    assert!(matches!(result, Err(StoreError::DuplicateKey(key)) if key == "A1"));

    // The original row is untouched
    let stored = client.get("A1".to_string()).await.unwrap().unwrap();
    assert_eq!(stored.label, "first");
}

#[tokio::test]
async fn test_rejected_hooks_leave_store_unchanged() {
    let (actor, client) = CollectionActor::new("item", 10);
    tokio::spawn(actor.run());

    let result = client.insert(item("", "nameless")).await;
    assert!(matches!(result, Err(StoreError::Record(_))));
    assert!(client.list().await.unwrap().is_empty());

    client.insert(item("A1", "first")).await.unwrap();
    let patch = ItemPatch {
        sku: Some("Z9".to_string()),
        label: Some("renamed".to_string()),
    };
    let result = client.update("A1".to_string(), patch).await;
    assert!(matches!(result, Err(StoreError::Record(_))));

    // The label change in the rejected patch must not leak into the stored row
    let stored = client.get("A1".to_string()).await.unwrap().unwrap();
    assert_eq!(stored, item("A1", "first"));
}

#[tokio::test]
async fn test_missing_keys_report_not_found() {
    let (actor, client) = CollectionActor::<Item>::new("item", 10);
    tokio::spawn(actor.run());

    let patch = ItemPatch {
        sku: None,
        label: Some("x".to_string()),
    };
    let updated = client.update("nope".to_string(), patch).await;
    assert!(matches!(updated, Err(StoreError::NotFound(key)) if key == "nope"));

    let deleted = client.delete("nope".to_string()).await;
    assert!(matches!(deleted, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_closed_actor_reports_actor_closed() {
    let (actor, client) = CollectionActor::<Item>::new("item", 10);
    drop(actor);

    let result = client.insert(item("A1", "first")).await;
    assert!(matches!(result, Err(StoreError::ActorClosed)));
}
