use chrono::NaiveDate;
use product_editor::config::EditorConfig;
use product_editor::editor::{
    notice_channel, EditorError, EditorProps, EditorState, NoticeKind, ProductEditor, SaveStage,
};
use product_editor::model::{Field, PriceHistoryEntry, Product};
use product_editor::service::{Collection, DataService, MemoryDataService, ServiceError};
use std::sync::Arc;

/// End-to-end: real editor over the in-memory data service (real collection actors).

fn march_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn create_editor(service: &Arc<MemoryDataService>, config: EditorConfig) -> ProductEditor {
    let (notices, _) = notice_channel();
    ProductEditor::new(EditorProps::new(None), service.clone(), notices)
        .with_config(config)
        .with_clock(march_first)
}

fn fill(editor: &ProductEditor, code: &str, description: &str, unit: &str, price: &str) {
    editor.set_field(Field::Code, code).unwrap();
    editor.set_field(Field::Description, description).unwrap();
    editor.set_field(Field::Unit, unit).unwrap();
    editor.set_field(Field::UnitPrice, price).unwrap();
}

#[tokio::test]
async fn test_create_then_edit_round_trip() {
    let service = Arc::new(MemoryDataService::start(10));
    let (notices, mut notice_rx) = notice_channel();

    // 1. Add
    let create = ProductEditor::new(EditorProps::new(None), service.clone(), notices.clone())
        .with_clock(march_first);
    fill(&create, "P001", "Widget", "pc", "9.99");
    create.submit().await.unwrap();

    assert_eq!(
        service.product("P001").await.unwrap(),
        Some(Product::new("P001", "Widget", "pc"))
    );
    assert_eq!(
        service.price_history("P001").await.unwrap(),
        vec![PriceHistoryEntry::new("P001", march_first(), 9.99)]
    );

    // 2. Edit, seeded from what was stored
    let stored = service.product("P001").await.unwrap().unwrap();
    let edit = ProductEditor::new(EditorProps::new(Some(stored)), service.clone(), notices)
        .with_clock(march_first);
    edit.set_field(Field::Description, "Widget v2").unwrap();
    edit.set_field(Field::Unit, "box").unwrap();
    edit.submit().await.unwrap();

    assert_eq!(
        service.products().await.unwrap(),
        vec![Product::new("P001", "Widget v2", "box")]
    );
    // Edits never add a price
    assert_eq!(service.price_history("P001").await.unwrap().len(), 1);

    let messages: Vec<_> = std::iter::from_fn(|| notice_rx.try_recv().ok())
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec!["Product added successfully", "Product updated successfully"]
    );

    drop(create);
    drop(edit);
    Arc::try_unwrap(service)
        .ok()
        .expect("editors dropped")
        .shutdown()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_price_history_conflict_leaves_product_committed() {
    let service = Arc::new(MemoryDataService::start(10));

    // A price already recorded for P001 today makes the second insert collide
    let existing = PriceHistoryEntry::new("P001", march_first(), 5.0);
    service
        .insert(
            Collection::PriceHistory,
            serde_json::to_value(&existing).unwrap(),
        )
        .await
        .unwrap();

    let editor = create_editor(&service, EditorConfig::default());
    fill(&editor, "P001", "Widget", "pc", "9.99");

    let result = editor.submit().await;
    assert!(matches!(
        result,
        Err(EditorError::SaveFailed {
            stage: SaveStage::PriceHistoryWrite,
            source: ServiceError::DuplicateKey(_),
            rolled_back: false,
        })
    ));

    // Partial success: the product is there, the new price is not
    assert_eq!(
        service.product("P001").await.unwrap(),
        Some(Product::new("P001", "Widget", "pc"))
    );
    assert_eq!(service.price_history("P001").await.unwrap(), vec![existing]);
    assert_eq!(
        editor.state(),
        EditorState::Failed(SaveStage::PriceHistoryWrite)
    );

    // Resubmitting now trips over the product's unique code
    let retry = editor.submit().await;
    assert!(matches!(
        retry,
        Err(EditorError::SaveFailed {
            stage: SaveStage::ProductWrite,
            source: ServiceError::DuplicateKey(_),
            ..
        })
    ));
}

#[tokio::test]
async fn test_compensation_removes_orphaned_product() {
    let service = Arc::new(MemoryDataService::start(10));
    let existing = PriceHistoryEntry::new("P001", march_first(), 5.0);
    service
        .insert(
            Collection::PriceHistory,
            serde_json::to_value(&existing).unwrap(),
        )
        .await
        .unwrap();

    let config = EditorConfig {
        compensate_failed_create: true,
    };
    let editor = create_editor(&service, config);
    fill(&editor, "P001", "Widget", "pc", "9.99");

    let result = editor.submit().await;
    assert!(matches!(
        result,
        Err(EditorError::SaveFailed {
            rolled_back: true,
            ..
        })
    ));
    assert_eq!(service.product("P001").await.unwrap(), None);

    // With the product gone a retry reaches the price-history step again
    let retry = editor.submit().await;
    assert!(matches!(
        retry,
        Err(EditorError::SaveFailed {
            stage: SaveStage::PriceHistoryWrite,
            rolled_back: true,
            ..
        })
    ));
}

#[tokio::test]
async fn test_duplicate_code_is_reported_to_the_user() {
    let service = Arc::new(MemoryDataService::start(10));
    service
        .insert(
            Collection::Product,
            serde_json::to_value(Product::new("P001", "Widget", "pc")).unwrap(),
        )
        .await
        .unwrap();

    let (notices, mut notice_rx) = notice_channel();
    let editor = ProductEditor::new(EditorProps::new(None), service.clone(), notices)
        .with_clock(march_first);
    fill(&editor, "P001", "Gadget", "pc", "1.50");

    assert!(editor.submit().await.is_err());

    let notice = notice_rx.try_recv().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "duplicate key: P001");
    assert!(notice_rx.try_recv().is_err());

    // Nothing was written to price history
    assert!(service.price_history("P001").await.unwrap().is_empty());
    assert!(editor.is_open());
}
