//! # Markup Pricing
//!
//! Derives the customer-facing selling price of a priced item (a TLD, an
//! add-on) from its wholesale cost.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PriceSource::Custom { price } ───────────────────────► price  (Custom)│
//! │          │ no                                                           │
//! │          ▼                                                              │
//! │  markup run requested? ──yes──► policy.apply(wholesale) (Calculated)   │
//! │          │ no                                                           │
//! │          ▼                                                              │
//! │  stored markup_percentage (or default 20%) ──► wholesale × (1 + m)     │
//! │                                                          (Calculated)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The markup percentage shown next to a price is always recomputed from the
//! selling and wholesale prices, so it stays truthful after an inline edit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::math::{apply_percent, percent_change, round2};
use crate::money::Money;
use crate::validation::{validate_markup_value, validate_wholesale_price, ValidationResult};

// =============================================================================
// Markup Policy
// =============================================================================

/// How a markup value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MarkupKind {
    /// `value` is a percentage of the wholesale price.
    Percentage,
    /// `value` is an absolute amount added to the wholesale price.
    Fixed,
}

/// A markup rule applied to one or many items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarkupPolicy {
    pub kind: MarkupKind,

    /// Percent or currency amount, depending on `kind`. Never negative.
    #[ts(as = "String")]
    pub value: Decimal,
}

impl MarkupPolicy {
    /// Creates a validated policy.
    ///
    /// ## Errors
    /// `ValidationError::MustNotBeNegative` when `value < 0`.
    pub fn new(kind: MarkupKind, value: Decimal) -> ValidationResult<Self> {
        validate_markup_value(value)?;
        Ok(MarkupPolicy { kind, value })
    }

    /// Percentage markup.
    pub fn percentage(value: Decimal) -> ValidationResult<Self> {
        Self::new(MarkupKind::Percentage, value)
    }

    /// Fixed-amount markup.
    pub fn fixed(value: Decimal) -> ValidationResult<Self> {
        Self::new(MarkupKind::Fixed, value)
    }

    /// Selling price for a wholesale price.
    ///
    /// A negative value that slipped past validation is treated as zero, so a
    /// policy can never price below wholesale. A markup too large to represent
    /// leaves the wholesale price unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use resello_core::markup::MarkupPolicy;
    /// use resello_core::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let policy = MarkupPolicy::percentage(Decimal::from(20)).unwrap();
    /// assert_eq!(policy.apply(Money::from_cents(1000)).cents(), 1200);
    ///
    /// let policy = MarkupPolicy::fixed(Decimal::from(5)).unwrap();
    /// assert_eq!(policy.apply(Money::from_cents(1000)).cents(), 1500);
    /// ```
    pub fn apply(&self, wholesale: Money) -> Money {
        let value = if self.value < Decimal::ZERO {
            warn!(value = %self.value, "Negative markup treated as zero");
            Decimal::ZERO
        } else {
            self.value
        };

        let base = wholesale.to_decimal();
        let markup = match self.kind {
            MarkupKind::Percentage => apply_percent(base, value),
            MarkupKind::Fixed => value,
        };

        match base.checked_add(markup).filter(|price| *price <= Money::MAX.to_decimal()) {
            Some(price) => round2(price),
            None => {
                warn!(%wholesale, markup = %value, "Markup out of range, keeping wholesale price");
                wholesale
            }
        }
    }
}

// =============================================================================
// Priced Item
// =============================================================================

/// Where an item's selling price comes from.
///
/// The two states are exclusive: an item either has an explicit custom price
/// or it is priced from a markup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PriceSource {
    /// Explicit override; wins over every policy.
    Custom { price: Money },
    /// Derived from a markup. `None` means "use the configured default".
    Calculated {
        #[serde(default)]
        #[ts(as = "Option<String>")]
        markup_percentage: Option<Decimal>,
    },
}

impl Default for PriceSource {
    fn default() -> Self {
        PriceSource::Calculated {
            markup_percentage: None,
        }
    }
}

/// The "Custom" / "Calculated" badge shown in the pricing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceClass {
    Custom,
    Calculated,
}

impl fmt::Display for PriceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceClass::Custom => f.write_str("Custom"),
            PriceClass::Calculated => f.write_str("Calculated"),
        }
    }
}

/// A sellable item with a wholesale cost, keyed by e.g. its TLD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricedItem {
    pub key: String,

    /// Registrar / supplier cost. Zero means no price is available yet.
    pub wholesale_price: Money,

    #[serde(default)]
    pub source: PriceSource,
}

/// Outcome of pricing one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResolvedPrice {
    pub key: String,
    pub wholesale_price: Money,
    pub selling_price: Money,

    /// `(selling − wholesale) / wholesale × 100`, 2 places. `None` when the
    /// wholesale price is zero.
    #[ts(as = "Option<String>")]
    pub markup_percent: Option<Decimal>,

    pub classification: PriceClass,
}

impl PricedItem {
    /// Item priced from a markup percentage (or the default when `None`).
    pub fn calculated(
        key: impl Into<String>,
        wholesale_price: Money,
        markup_percentage: Option<Decimal>,
    ) -> Self {
        PricedItem {
            key: key.into(),
            wholesale_price,
            source: PriceSource::Calculated { markup_percentage },
        }
    }

    /// Item with an explicit custom price.
    pub fn custom(key: impl Into<String>, wholesale_price: Money, price: Money) -> Self {
        PricedItem {
            key: key.into(),
            wholesale_price,
            source: PriceSource::Custom { price },
        }
    }

    /// Builds an item from the nullable columns the backend returns.
    /// A present `custom_price` always means `Custom`.
    pub fn from_fields(
        key: impl Into<String>,
        wholesale_price: Money,
        custom_price: Option<Money>,
        markup_percentage: Option<Decimal>,
    ) -> Self {
        match custom_price {
            Some(price) => Self::custom(key, wholesale_price, price),
            None => Self::calculated(key, wholesale_price, markup_percentage),
        }
    }

    pub fn classification(&self) -> PriceClass {
        match self.source {
            PriceSource::Custom { .. } => PriceClass::Custom,
            PriceSource::Calculated { .. } => PriceClass::Calculated,
        }
    }

    /// Current selling price without any markup run.
    pub fn effective_price(&self, default_markup: Decimal) -> Option<Money> {
        resolve_price(self, None, default_markup).map(|resolved| resolved.selling_price)
    }

    /// Applies an inline price edit.
    ///
    /// Returns `None` when the new price equals the current one, so the
    /// caller can tell "nothing changed" from "changed".
    pub fn edit_price(&self, new_price: Money, default_markup: Decimal) -> Option<PricedItem> {
        if self.effective_price(default_markup) == Some(new_price) {
            debug!(key = %self.key, price = %new_price, "Price edit is a no-op");
            return None;
        }

        Some(PricedItem {
            source: PriceSource::Custom { price: new_price },
            ..self.clone()
        })
    }

    /// Drops a custom price so the item is priced from a markup again.
    pub fn revert_to_calculated(&self, markup_percentage: Option<Decimal>) -> PricedItem {
        PricedItem {
            source: PriceSource::Calculated { markup_percentage },
            ..self.clone()
        }
    }
}

/// Resolves the selling price of one item.
///
/// `policy` is `Some` when a markup run was just requested.
/// Returns `None` when a calculated item has no wholesale price.
///
/// ## Example
/// ```rust
/// use resello_core::markup::{resolve_price, MarkupPolicy, PriceClass, PricedItem};
/// use resello_core::Money;
/// use rust_decimal::Decimal;
///
/// let item = PricedItem::custom(".io", Money::from_cents(500), Money::from_cents(750));
/// let policy = MarkupPolicy::percentage(Decimal::from(20)).unwrap();
///
/// let resolved = resolve_price(&item, Some(&policy), Decimal::from(20)).unwrap();
/// assert_eq!(resolved.selling_price.cents(), 750);
/// assert_eq!(resolved.classification, PriceClass::Custom);
/// ```
pub fn resolve_price(
    item: &PricedItem,
    policy: Option<&MarkupPolicy>,
    default_markup: Decimal,
) -> Option<ResolvedPrice> {
    let wholesale = item.wholesale_price;

    let selling = match (item.source, policy) {
        (PriceSource::Custom { price }, _) => price,
        _ if validate_wholesale_price(wholesale).is_err() => {
            debug!(key = %item.key, "No wholesale price, item not priced");
            return None;
        }
        (PriceSource::Calculated { .. }, Some(policy)) => policy.apply(wholesale),
        (PriceSource::Calculated { markup_percentage }, None) => MarkupPolicy {
            kind: MarkupKind::Percentage,
            value: markup_percentage.unwrap_or(default_markup),
        }
        .apply(wholesale),
    };

    Some(ResolvedPrice {
        key: item.key.clone(),
        wholesale_price: wholesale,
        selling_price: selling,
        markup_percent: percent_change(wholesale, selling),
        classification: item.classification(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
