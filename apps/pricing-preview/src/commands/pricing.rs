//! # Pricing Commands
//!
//! Single-item price editing and catalog-wide markup runs.
//!
//! ## Bulk Markup Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pick policy ──► bulk_plan ──► "Apply 20% to 143 TLDs?" ──► confirm    │
//! │                      │                                         │        │
//! │                      ▼                                         ▼        │
//! │              plan + sorted view                   updates[] saved by    │
//! │                                                   the backend in one    │
//! │                                                   batch                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use resello_core::bulk::{plan_markup, view, PriceUpdate, PricingPlan, ViewOptions};
use resello_core::markup::{resolve_price, MarkupPolicy, PricedItem, ResolvedPrice};
use resello_core::validation::validate_price;
use resello_core::{Money, PricingConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;

// =============================================================================
// price_item
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PriceItemRequest {
    pub item: PricedItem,

    /// Markup run to apply; custom prices ignore it.
    #[serde(default)]
    pub policy: Option<MarkupPolicy>,

    /// Inline edit from the price table.
    #[serde(default)]
    pub new_price: Option<Money>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceItemResponse {
    /// The item after the edit (unchanged when there was no edit).
    pub item: PricedItem,

    /// False when `new_price` matched the current price.
    pub changed: bool,

    /// `null` when the item has no wholesale price yet.
    pub price: Option<ResolvedPrice>,
}

pub fn price_item(request: PriceItemRequest, config: &PricingConfig) -> Result<PriceItemResponse, ApiError> {
    debug!(key = %request.item.key, "price_item command");

    let policy = request.policy.map(revalidate).transpose()?;

    let (item, changed) = match request.new_price {
        Some(new_price) => {
            validate_price("new_price", new_price)?;
            match request.item.edit_price(new_price, config.default_markup_percent) {
                Some(edited) => (edited, true),
                None => (request.item, false),
            }
        }
        None => (request.item, false),
    };

    let price = resolve_price(&item, policy.as_ref(), config.default_markup_percent);
    Ok(PriceItemResponse { item, changed, price })
}

// =============================================================================
// bulk_plan
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BulkPlanRequest {
    pub items: Vec<PricedItem>,
    pub policy: MarkupPolicy,

    #[serde(default)]
    pub view: ViewOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkPlanResponse {
    pub plan: PricingPlan,

    /// Keys in display order after filtering and sorting.
    pub view: Vec<String>,

    /// Replacement batch to persist atomically.
    pub updates: Vec<PriceUpdate>,

    /// Keys left out of `updates` because they have no wholesale price.
    pub unpriced: Vec<String>,
}

pub fn bulk_plan(request: BulkPlanRequest, config: &PricingConfig) -> Result<BulkPlanResponse, ApiError> {
    debug!(items = request.items.len(), "bulk_plan command");

    let policy = revalidate(request.policy)?;
    let plan = plan_markup(&request.items, &policy, config);

    let view = view(&plan.entries, &request.view, &config.popular)
        .into_iter()
        .map(|entry| entry.key.clone())
        .collect();
    let updates = plan.updates();
    let unpriced = plan.unpriced_keys().into_iter().map(str::to_string).collect();

    Ok(BulkPlanResponse {
        plan,
        view,
        updates,
        unpriced,
    })
}

/// Policies arrive as plain JSON; run them through the checked constructor.
fn revalidate(policy: MarkupPolicy) -> Result<MarkupPolicy, ApiError> {
    Ok(MarkupPolicy::new(policy.kind, policy.value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use resello_core::bulk::{PriceFilter, SortDirection, SortKey};
    use resello_core::markup::{MarkupKind, PriceClass};
    use rust_decimal_macros::dec;

    fn catalog() -> Vec<PricedItem> {
        vec![
            PricedItem::calculated(".xyz", Money::from_cents(200), None),
            PricedItem::calculated(".com", Money::from_cents(1000), None),
            PricedItem::custom(".io", Money::from_cents(3000), Money::from_cents(4500)),
            PricedItem::calculated(".shop", Money::zero(), None),
        ]
    }

    #[test]
    fn test_price_item_edit_becomes_custom() {
        let request = PriceItemRequest {
            item: PricedItem::calculated(".com", Money::from_cents(1000), None),
            policy: None,
            new_price: Some(Money::from_cents(1500)),
        };

        let response = price_item(request, &PricingConfig::default()).unwrap();
        assert!(response.changed);
        let price = response.price.unwrap();
        assert_eq!(price.classification, PriceClass::Custom);
        assert_eq!(price.markup_percent, Some(dec!(50)));
    }

    #[test]
    fn test_price_item_noop_edit() {
        // default 20% on 10.00 is already 12.00
        let request = PriceItemRequest {
            item: PricedItem::calculated(".com", Money::from_cents(1000), None),
            policy: None,
            new_price: Some(Money::from_cents(1200)),
        };

        let response = price_item(request, &PricingConfig::default()).unwrap();
        assert!(!response.changed);
        assert_eq!(response.price.unwrap().classification, PriceClass::Calculated);
    }

    #[test]
    fn test_price_item_rejects_negative_policy() {
        let request = PriceItemRequest {
            item: PricedItem::calculated(".com", Money::from_cents(1000), None),
            policy: Some(MarkupPolicy {
                kind: MarkupKind::Percentage,
                value: dec!(-5),
            }),
            new_price: None,
        };

        let err = price_item(request, &PricingConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_bulk_plan() {
        let request = BulkPlanRequest {
            items: catalog(),
            policy: MarkupPolicy::percentage(dec!(25)).unwrap(),
            view: ViewOptions {
                filter: PriceFilter::All,
                sort: Some(SortKey::Selling),
                direction: SortDirection::Desc,
            },
        };

        let response = bulk_plan(request, &PricingConfig::default()).unwrap();
        assert_eq!(response.plan.count, 4);
        assert_eq!(response.plan.priced_count, 3);
        assert_eq!(response.updates.len(), 3);
        assert_eq!(response.unpriced, vec![".shop".to_string()]);
        // .io keeps its custom 45.00, .com 12.50, .xyz 2.50, .shop unpriced
        assert_eq!(response.view, vec![".io", ".com", ".xyz", ".shop"]);
    }

    #[test]
    fn test_bulk_plan_popular_view() {
        let request = BulkPlanRequest {
            items: catalog(),
            policy: MarkupPolicy::fixed(dec!(1)).unwrap(),
            view: ViewOptions {
                filter: PriceFilter::Popular,
                ..ViewOptions::default()
            },
        };

        let response = bulk_plan(request, &PricingConfig::default()).unwrap();
        assert_eq!(response.view, vec![".com", ".io"]);
    }
}
