//! Demo: adds a product with its initial price, then edits its description, against the
//! backend selected in `product-editor.toml` / `PRODUCT_EDITOR_*` (in-memory by default).

use product_editor::config::{AppConfig, DataServiceConfig};
use product_editor::editor::{notice_channel, EditorProps, ProductEditor};
use product_editor::model::{Field, Product};
use product_editor::service::{DataService, MemoryDataService, RestDataService};
use product_editor::telemetry::setup_tracing;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    setup_tracing(&config.telemetry);

    info!("Starting product editor demo");

    let (memory, service): (Option<Arc<MemoryDataService>>, Arc<dyn DataService>) =
        match &config.data_service {
            DataServiceConfig::Memory(memory) => {
                let started = Arc::new(MemoryDataService::start(memory.buffer_size));
                let service: Arc<dyn DataService> = started.clone();
                (Some(started), service)
            }
            DataServiceConfig::Rest(rest) => {
                info!(url = %rest.url, "Using REST data service");
                let service: Arc<dyn DataService> = Arc::new(RestDataService::new(rest)?);
                (None, service)
            }
        };
    let (notices, mut notice_rx) = notice_channel();

    // Add
    let create = ProductEditor::new(
        EditorProps::new(None)
            .on_saved(|| info!("Container refreshes its product list"))
            .on_close(|| info!("Container closes the add dialog")),
        service.clone(),
        notices.clone(),
    )
    .with_config(config.editor.clone());

    create.set_field(Field::Code, "P001")?;
    create.set_field(Field::Description, "Widget")?;
    create.set_field(Field::Unit, "pc")?;
    create.set_field(Field::UnitPrice, "9.99")?;
    create
        .submit()
        .instrument(tracing::info_span!("add_product"))
        .await?;

    // Edit
    let edit = ProductEditor::new(
        EditorProps::new(Some(Product::new("P001", "Widget", "pc")))
            .on_close(|| info!("Container closes the edit dialog")),
        service.clone(),
        notices,
    )
    .with_config(config.editor.clone());

    edit.set_field(Field::Description, "Widget v2")?;
    edit.submit()
        .instrument(tracing::info_span!("edit_product"))
        .await?;

    while let Ok(notice) = notice_rx.try_recv() {
        info!(title = %notice.title, message = %notice.message, "Notice");
    }

    drop(create);
    drop(edit);
    drop(service);

    if let Some(memory) = memory {
        for product in memory.products().await? {
            info!(code = %product.code, description = %product.description, unit = %product.unit, "Stored product");
        }
        for entry in memory.price_history("P001").await? {
            info!(code = %entry.product_code, effdate = %entry.effective_date, unitprice = entry.unit_price, "Stored price");
        }

        match Arc::try_unwrap(memory) {
            Ok(memory) => memory.shutdown().await?,
            Err(_) => warn!("Data service still shared, skipping shutdown"),
        }
    }

    info!("Demo finished");
    Ok(())
}
