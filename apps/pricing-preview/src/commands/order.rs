//! # Order Commands
//!
//! Live totals for the order form and the submission body it sends.

use resello_core::totals::{Adjustments, Discount, LineItem, OrderDraft, OrderSubmission, OrderTotals};
use resello_core::math::to_decimal;
use resello_core::{Money, PricingConfig};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;

/// The order form as the dashboard sends it.
///
/// Older dashboard builds send `discount_percent` (a JS number) and
/// `discount_amount` as two plain fields. When either is present it replaces
/// `adjustments.discount`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub adjustments: Adjustments,

    #[serde(default)]
    pub discount_percent: Option<f64>,

    #[serde(default)]
    pub discount_amount: Option<Money>,

    /// Falls back to the configured currency.
    #[serde(default)]
    pub currency: Option<String>,
}

impl OrderRequest {
    fn into_draft(self, config: &PricingConfig) -> OrderDraft {
        let mut adjustments = self.adjustments;
        if self.discount_percent.is_some() || self.discount_amount.is_some() {
            adjustments.discount = Discount::from_fields(
                self.discount_percent.map(to_decimal).unwrap_or_default(),
                self.discount_amount.unwrap_or_default(),
            );
        }

        OrderDraft {
            items: self.items,
            adjustments,
            currency: self.currency.unwrap_or_else(|| config.currency.clone()),
        }
    }
}

/// Totals for the form as currently typed. Never fails.
pub fn order_totals(request: OrderRequest, config: &PricingConfig) -> OrderTotals {
    let draft = request.into_draft(config);
    debug!(items = draft.items.len(), "order_totals command");
    draft.preview()
}

/// Validated submission body.
pub fn submit_order(request: OrderRequest, config: &PricingConfig) -> Result<OrderSubmission, ApiError> {
    let draft = request.into_draft(config);
    debug!(items = draft.items.len(), "submit_order command");
    Ok(draft.submission()?)
}
