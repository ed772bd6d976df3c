//! # Preview Commands
//!
//! One handler per dashboard screen. Requests are tagged by `command`:
//!
//! ```json
//! { "command": "order_totals", "items": [...], "adjustments": {...} }
//! ```
//!
//! | command        | handler                        | response              |
//! |----------------|--------------------------------|-----------------------|
//! | `order_totals` | [`order::order_totals`]        | `OrderTotals`         |
//! | `submit_order` | [`order::submit_order`]        | `OrderSubmission`     |
//! | `price_item`   | [`pricing::price_item`]        | `PriceItemResponse`   |
//! | `bulk_plan`    | [`pricing::bulk_plan`]         | `BulkPlanResponse`    |
//! | `proration`    | [`subscription::proration`]    | `ProrationResponse`   |

pub mod order;
pub mod pricing;
pub mod subscription;

use chrono::{DateTime, Utc};
use resello_core::PricingConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

/// A request document read from stdin.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PreviewRequest {
    OrderTotals(order::OrderRequest),
    SubmitOrder(order::OrderRequest),
    PriceItem(pricing::PriceItemRequest),
    BulkPlan(pricing::BulkPlanRequest),
    Proration(subscription::ProrationInput),
}

impl PreviewRequest {
    pub fn name(&self) -> &'static str {
        match self {
            PreviewRequest::OrderTotals(_) => "order_totals",
            PreviewRequest::SubmitOrder(_) => "submit_order",
            PreviewRequest::PriceItem(_) => "price_item",
            PreviewRequest::BulkPlan(_) => "bulk_plan",
            PreviewRequest::Proration(_) => "proration",
        }
    }
}

/// Runs a request and returns its JSON response.
pub fn dispatch(
    request: PreviewRequest,
    config: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<Value, ApiError> {
    debug!(command = request.name(), "Dispatching preview request");

    match request {
        PreviewRequest::OrderTotals(req) => respond(&order::order_totals(req, config)),
        PreviewRequest::SubmitOrder(req) => respond(&order::submit_order(req, config)?),
        PreviewRequest::PriceItem(req) => respond(&pricing::price_item(req, config)?),
        PreviewRequest::BulkPlan(req) => respond(&pricing::bulk_plan(req, config)?),
        PreviewRequest::Proration(req) => respond(&subscription::proration(req, config, now)?),
    }
}

fn respond<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!("Response serialization failed: {}", e);
        ApiError::internal("Failed to serialize response")
    })
}
