//! # Observability & Tracing
//!
//! Structured logging through `tracing`. Service calls and submissions run inside spans
//! (`#[instrument]`), so every log line carries the collection, key or editor mode it
//! belongs to.

use crate::config::TelemetryConfig;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Call once, at startup.
///
/// `RUST_LOG` wins when set (e.g. `RUST_LOG=product_editor=debug`); otherwise the
/// configured `log_level` applies. Output is compact and omits the module target.
///
/// ```ignore
/// setup_tracing(&config.telemetry);
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
