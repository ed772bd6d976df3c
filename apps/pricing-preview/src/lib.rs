//! # Resello Pricing Preview
//!
//! JSON-in/JSON-out shell over `resello-core`.
//!
//! ## Module Organization
//! ```text
//! resello_preview/
//! ├── lib.rs              ◄─── You are here (run + logging setup)
//! ├── config.rs           ◄─── RESELLO_* environment → PricingConfig
//! ├── error.rs            ◄─── ApiError written on failure
//! └── commands/
//!     ├── mod.rs          ◄─── PreviewRequest + dispatch
//!     ├── order.rs        ◄─── order_totals, submit_order
//!     ├── pricing.rs      ◄─── price_item, bulk_plan
//!     └── subscription.rs ◄─── proration
//! ```

pub mod commands;
pub mod config;
pub mod error;

use chrono::{DateTime, Utc};
use resello_core::PricingConfig;
use tracing_subscriber::EnvFilter;

use commands::PreviewRequest;
use error::ApiError;

/// Parses one request document and returns the response document.
///
/// `now` is used by time-dependent commands unless the request carries its
/// own `now`.
pub fn run(input: &str, config: &PricingConfig, now: DateTime<Utc>) -> Result<String, ApiError> {
    let request: PreviewRequest = serde_json::from_str(input)?;
    let response = commands::dispatch(request, config, now)?;

    serde_json::to_string_pretty(&response)
        .map_err(|e| ApiError::internal(format!("Failed to serialize response: {e}")))
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries only the response.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=resello_core=trace` - Trace the calculators only
/// - Default: INFO, DEBUG for resello crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,resello_core=debug,resello_preview=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
