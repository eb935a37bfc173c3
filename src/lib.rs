//! # Product Editor
//!
//! > **Create or edit a product and record its initial price through a hosted table API.**
//!
//! One component, [`ProductEditor`](editor::ProductEditor), holds a four-field form, validates
//! it, writes the product, then appends a price-history row when the product is new. Every
//! submission ends in exactly one user-facing [`Notice`](editor::Notice).
//!
//! ## 🏗️ Design
//!
//! ### The data service is a seam
//! The editor only knows the [`DataService`](service::DataService) trait: `insert`,
//! `update_by_key` and `delete_by_key` over JSON records. Three backends implement it:
//! - [`MemoryDataService`](service::MemoryDataService): one `record-store` collection actor per
//!   table, each in its own Tokio task.
//! - [`RestDataService`](service::RestDataService): a PostgREST-style HTTP endpoint.
//! - [`MockDataService`](service::MockDataService): scripted replies and a call log for tests.
//!
//! ### Two writes, strictly ordered
//! The price-history insert is only sent after the product write succeeded. When it fails,
//! the product stays committed and the error says so
//! ([`SaveStage::PriceHistoryWrite`](editor::SaveStage)). Compensation is opt-in through
//! [`EditorConfig`](config::EditorConfig).
//!
//! ### Type-safe errors
//! Each layer has its own `thiserror` enum: `StoreError` in `record-store`,
//! [`ServiceError`](service::ServiceError), [`EditorError`](editor::EditorError) and
//! [`ConfigError`](config::ConfigError).
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: `Product`, `PriceHistoryEntry`, `FormDraft`, `Field`.
//! - [`service`]: the data service trait and its backends.
//! - [`editor`]: the editor, its state machine, validation, notices and form view.
//! - [`config`]: TOML file plus `PRODUCT_EDITOR_*` environment variables.
//! - [`telemetry`]: tracing subscriber setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo against the in-memory backend
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test --workspace
//! ```

pub mod config;
pub mod editor;
pub mod model;
pub mod service;
pub mod telemetry;
