//! # Order Totals
//!
//! Turns the line items of an order form plus its discount and tax settings
//! into the subtotal / discount / tax / total summary.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LineItem × n ──► line amount (qty × unit price) ──► subtotal          │
//! │                                                        │                │
//! │                         Discount::Percent ──┐          ▼                │
//! │                         Discount::Amount ───┼──► discount (≤ subtotal) │
//! │                         Discount::None ─────┘          │                │
//! │                                                        ▼                │
//! │                                          after discount × tax rate     │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                               total = after discount + tax             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Preview vs Submission
//! The live preview counts every line that has a valid amount, including
//! lines whose description is still blank. The submitted order only carries
//! described lines, and its totals are recomputed over exactly those lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::math::{apply_percent, clamp_percent, round2};
use crate::money::Money;
use crate::types::BillingCycle;
use crate::validation::{
    validate_percent, validate_price, validate_quantity, ValidationResult,
};
use crate::DEFAULT_CURRENCY;

// =============================================================================
// Line Item
// =============================================================================

/// One row of the order form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Free text; may be blank while the row is being edited.
    #[serde(default)]
    pub description: String,

    /// Units ordered. Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Price per unit.
    pub unit_price: Money,

    /// Catalog product this row was picked from, if any.
    #[serde(default)]
    pub product_id: Option<String>,

    /// Recurrence of the product, if it is a subscription product.
    #[serde(default)]
    pub billing_period: Option<BillingCycle>,
}

fn default_quantity() -> i64 {
    1
}

impl LineItem {
    /// Creates a line without a catalog reference.
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            unit_price,
            product_id: None,
            billing_period: None,
        }
    }

    /// `quantity × unit_price`.
    #[inline]
    pub fn amount(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Whether the line contributes to totals at all.
    ///
    /// Non-positive quantities and negative prices are input errors; they are
    /// left out instead of failing the whole preview.
    #[inline]
    pub fn is_countable(&self) -> bool {
        self.quantity > 0 && !self.unit_price.is_negative()
    }

    /// Whether the line is carried into a submitted order.
    #[inline]
    pub fn is_described(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

// =============================================================================
// Adjustments
// =============================================================================

/// Order-level discount. Percentage and fixed amount are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Discount {
    None,
    Percent {
        #[ts(as = "String")]
        percent: Decimal,
    },
    Amount {
        amount: Money,
    },
}

impl Default for Discount {
    fn default() -> Self {
        Discount::None
    }
}

impl Discount {
    /// Builds a discount from the two legacy form fields.
    ///
    /// When both are non-zero the percentage wins.
    ///
    /// ## Example
    /// ```rust
    /// use resello_core::totals::Discount;
    /// use resello_core::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let d = Discount::from_fields(Decimal::from(10), Money::from_cents(500));
    /// assert_eq!(d, Discount::Percent { percent: Decimal::from(10) });
    /// ```
    pub fn from_fields(percent: Decimal, amount: Money) -> Self {
        if percent > Decimal::ZERO {
            if amount.is_positive() {
                debug!(%percent, %amount, "Both discount fields set, using percentage");
            }
            Discount::Percent { percent }
        } else if amount.is_positive() {
            Discount::Amount { amount }
        } else {
            Discount::None
        }
    }

    /// Discount amount for a given subtotal. Never exceeds the subtotal and
    /// never goes below zero.
    pub fn resolve(&self, subtotal: Money) -> Money {
        let subtotal = subtotal.non_negative();
        match *self {
            Discount::None => Money::zero(),
            Discount::Percent { percent } => {
                let percent = clamp_percent("discount_percent", percent);
                round2(apply_percent(subtotal.to_decimal(), percent)).min(subtotal)
            }
            Discount::Amount { amount } => amount.non_negative().min(subtotal),
        }
    }

    fn validate(&self) -> ValidationResult<()> {
        match *self {
            Discount::None => Ok(()),
            Discount::Percent { percent } => validate_percent("discount_percent", percent),
            Discount::Amount { amount } => validate_price("discount_amount", amount),
        }
    }
}

/// Discount and tax settings of an order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Adjustments {
    pub discount: Discount,

    /// Percent (0-100) applied after the discount.
    #[ts(as = "String")]
    pub tax_rate: Decimal,
}

impl Adjustments {
    /// Sets a percentage discount, replacing any fixed-amount discount.
    pub fn set_discount_percent(&mut self, percent: Decimal) {
        self.discount = if percent > Decimal::ZERO {
            Discount::Percent { percent }
        } else {
            Discount::None
        };
    }

    /// Sets a fixed-amount discount, replacing any percentage discount.
    pub fn set_discount_amount(&mut self, amount: Money) {
        self.discount = if amount.is_positive() {
            Discount::Amount { amount }
        } else {
            Discount::None
        };
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Order summary. Derived, never stored.
///
/// ## Invariants
/// - `total = subtotal − discount + tax`
/// - `0 ≤ discount ≤ subtotal`
/// - `tax = round2((subtotal − discount) × tax_rate / 100)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    pub currency: String,
}

impl OrderTotals {
    /// All-zero totals.
    pub fn zero(currency: impl Into<String>) -> Self {
        OrderTotals {
            subtotal: Money::zero(),
            discount: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
            currency: currency.into(),
        }
    }

    /// `subtotal − discount`, the taxable base.
    #[inline]
    pub fn after_discount(&self) -> Money {
        self.subtotal - self.discount
    }
}

/// Computes order totals from line items and adjustments.
///
/// ## Example
/// ```rust
/// use resello_core::totals::{compute_totals, Adjustments, Discount, LineItem};
/// use resello_core::Money;
/// use rust_decimal::Decimal;
///
/// let items = vec![LineItem::new("VPS M", 1, Money::from_cents(10000))];
/// let adjustments = Adjustments {
///     discount: Discount::Percent { percent: Decimal::from(10) },
///     tax_rate: Decimal::from(8),
/// };
///
/// let totals = compute_totals(&items, &adjustments, "USD");
/// assert_eq!(totals.discount.cents(), 1000);
/// assert_eq!(totals.tax.cents(), 720);
/// assert_eq!(totals.total.cents(), 9720);
/// ```
pub fn compute_totals(items: &[LineItem], adjustments: &Adjustments, currency: &str) -> OrderTotals {
    let subtotal: Money = items
        .iter()
        .enumerate()
        .filter(|(index, item)| {
            let countable = item.is_countable();
            if !countable {
                warn!(
                    index,
                    quantity = item.quantity,
                    unit_price = %item.unit_price,
                    "Line item excluded from totals"
                );
            }
            countable
        })
        .map(|(_, item)| item.amount())
        .sum();

    let discount = adjustments.discount.resolve(subtotal);
    let after_discount = subtotal - discount;

    let tax_rate = clamp_percent("tax_rate", adjustments.tax_rate);
    let tax = round2(apply_percent(after_discount.to_decimal(), tax_rate)).non_negative();
    let total = (after_discount + tax).non_negative();

    debug!(
        items = items.len(),
        subtotal = %subtotal,
        discount = %discount,
        tax = %tax,
        total = %total,
        "Computed order totals"
    );

    OrderTotals {
        subtotal,
        discount,
        tax,
        total,
        currency: currency.to_string(),
    }
}

// =============================================================================
// Order Draft
// =============================================================================

/// The state of the order creation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDraft {
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub adjustments: Adjustments,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// The write-request body for a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderSubmission {
    pub items: Vec<LineItem>,
    pub adjustments: Adjustments,
    pub totals: OrderTotals,
}

impl OrderDraft {
    pub fn new(currency: impl Into<String>) -> Self {
        OrderDraft {
            items: Vec::new(),
            adjustments: Adjustments::default(),
            currency: currency.into(),
        }
    }

    /// Totals shown while the form is being edited.
    pub fn preview(&self) -> OrderTotals {
        compute_totals(&self.items, &self.adjustments, &self.currency)
    }

    /// Lines that would be carried into a submission.
    pub fn submittable_items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter().filter(|item| item.is_described())
    }

    /// Builds the order to send to the backend.
    ///
    /// ## Errors
    /// - `CoreError::EmptyOrder` when no line has a description
    /// - `CoreError::Validation` for an invalid quantity, price or percentage
    pub fn submission(&self) -> CoreResult<OrderSubmission> {
        let items: Vec<LineItem> = self.submittable_items().cloned().collect();
        if items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        for item in &items {
            validate_quantity(item.quantity)?;
            validate_price("unit_price", item.unit_price)?;
        }
        self.adjustments.discount.validate()?;
        validate_percent("tax_rate", self.adjustments.tax_rate)?;

        let skipped = self.items.len() - items.len();
        if skipped > 0 {
            debug!(skipped, "Blank line items left out of submission");
        }

        let totals = compute_totals(&items, &self.adjustments, &self.currency);
        Ok(OrderSubmission {
            items,
            adjustments: self.adjustments,
            totals,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use rust_decimal_macros::dec;

    fn item(description: &str, quantity: i64, cents: i64) -> LineItem {
        LineItem::new(description, quantity, Money::from_cents(cents))
    }

    fn adjustments(discount: Discount, tax_rate: Decimal) -> Adjustments {
        Adjustments { discount, tax_rate }
    }

    #[test]
    fn test_scenario_percent_discount_then_tax() {
        let items = vec![item("Hosting Pro", 1, 10000)];
        let adj = adjustments(Discount::Percent { percent: dec!(10) }, dec!(8));

        let totals = compute_totals(&items, &adj, "USD");

        assert_eq!(totals.subtotal.cents(), 10000);
        assert_eq!(totals.discount.cents(), 1000);
        assert_eq!(totals.after_discount().cents(), 9000);
        assert_eq!(totals.tax.cents(), 720);
        assert_eq!(totals.total.cents(), 9720);
        assert_eq!(totals.currency, "USD");
    }

    #[test]
    fn test_empty_order_is_all_zero() {
        let adj = adjustments(Discount::Amount { amount: Money::from_cents(500) }, dec!(20));
        assert_eq!(compute_totals(&[], &adj, "USD"), OrderTotals::zero("USD"));
    }

    #[test]
    fn test_line_amounts_are_summed() {
        let items = vec![item("Domain .com", 2, 1299), item("SSL", 1, 4999)];
        let totals = compute_totals(&items, &Adjustments::default(), "USD");
        assert_eq!(totals.subtotal.cents(), 2 * 1299 + 4999);
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_oversized_lines_saturate() {
        let items = vec![
            LineItem::new("Bulk A", i64::MAX, Money::from_cents(2)),
            LineItem::new("Bulk B", i64::MAX, Money::from_cents(2)),
        ];
        let adj = Adjustments {
            discount: Discount::Amount {
                amount: Money::from_cents(100),
            },
            tax_rate: dec!(0),
        };

        let totals = compute_totals(&items, &adj, "USD");
        assert_eq!(totals.subtotal, Money::MAX);
        assert_eq!(totals.discount.cents(), 100);
        assert_eq!(totals.total.cents(), i64::MAX - 100);
    }

    #[test]
    fn test_percent_discount_property() {
        let subtotals = [0_i64, 1, 99, 333, 12345, 100000, 987654];
        let percents = [dec!(0), dec!(0.5), dec!(10), dec!(33.33), dec!(99.99), dec!(100)];

        for &cents in &subtotals {
            for &percent in &percents {
                let subtotal = Money::from_cents(cents);
                let discount = Discount::Percent { percent }.resolve(subtotal);
                let expected = round2(subtotal.to_decimal() * percent / dec!(100));

                assert_eq!(discount, expected, "subtotal={cents} percent={percent}");
                assert!(discount <= subtotal);
            }
        }
    }

    #[test]
    fn test_amount_discount_capped_at_subtotal() {
        let items = vec![item("Email plan", 1, 2500)];
        let adj = adjustments(Discount::Amount { amount: Money::from_cents(4000) }, dec!(10));

        let totals = compute_totals(&items, &adj, "USD");

        assert_eq!(totals.discount, totals.subtotal);
        assert!(totals.tax.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let items = vec![item("VPS", 1, 1000)];

        let over = compute_totals(
            &items,
            &adjustments(Discount::Percent { percent: dec!(150) }, dec!(-5)),
            "USD",
        );
        assert_eq!(over.discount.cents(), 1000);
        assert!(over.tax.is_zero());
        assert!(over.total.is_zero());

        let negative = compute_totals(
            &items,
            &adjustments(Discount::Amount { amount: Money::from_cents(-300) }, dec!(0)),
            "USD",
        );
        assert!(negative.discount.is_zero());
        assert_eq!(negative.total.cents(), 1000);
    }

    #[test]
    fn test_invalid_lines_are_excluded() {
        let items = vec![
            item("Good", 1, 1000),
            item("Zero qty", 0, 5000),
            item("Negative qty", -2, 5000),
            item("Negative price", 1, -700),
        ];
        let totals = compute_totals(&items, &Adjustments::default(), "USD");
        assert_eq!(totals.subtotal.cents(), 1000);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 10.50 × 8.25% = 0.86625 → 0.87
        let items = vec![item("Addon", 1, 1050)];
        let totals = compute_totals(
            &items,
            &adjustments(Discount::None, dec!(8.25)),
            "USD",
        );
        assert_eq!(totals.tax.cents(), 87);
        assert_eq!(totals.total.cents(), 1137);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut draft = OrderDraft::new("EUR");
        draft.items.push(item("Reseller plan", 3, 1999));
        draft.adjustments.set_discount_percent(dec!(12.5));
        draft.adjustments.tax_rate = dec!(19);

        let first = draft.preview();
        let second = draft.preview();
        assert_eq!(first, second);
        assert_eq!(first.currency, "EUR");
    }

    #[test]
    fn test_from_fields_prefers_percent() {
        assert_eq!(
            Discount::from_fields(dec!(5), Money::from_cents(1000)),
            Discount::Percent { percent: dec!(5) }
        );
        assert_eq!(
            Discount::from_fields(dec!(0), Money::from_cents(1000)),
            Discount::Amount { amount: Money::from_cents(1000) }
        );
        assert_eq!(Discount::from_fields(dec!(0), Money::zero()), Discount::None);
    }

    #[test]
    fn test_setting_one_discount_clears_the_other() {
        let mut adj = Adjustments::default();
        adj.set_discount_amount(Money::from_cents(500));
        adj.set_discount_percent(dec!(10));
        assert_eq!(adj.discount, Discount::Percent { percent: dec!(10) });

        adj.set_discount_amount(Money::from_cents(250));
        assert_eq!(adj.discount, Discount::Amount { amount: Money::from_cents(250) });

        adj.set_discount_percent(dec!(0));
        assert_eq!(adj.discount, Discount::None);
    }

    #[test]
    fn test_blank_description_counts_in_preview_not_in_submission() {
        let mut draft = OrderDraft::new("USD");
        draft.items.push(item("Shared hosting", 1, 1000));
        draft.items.push(item("   ", 1, 500));

        assert_eq!(draft.preview().subtotal.cents(), 1500);

        let submission = draft.submission().unwrap();
        assert_eq!(submission.items.len(), 1);
        assert_eq!(submission.totals.subtotal.cents(), 1000);
    }

    #[test]
    fn test_submission_without_described_lines_fails() {
        let mut draft = OrderDraft::new("USD");
        draft.items.push(item("", 1, 500));
        assert!(matches!(draft.submission(), Err(CoreError::EmptyOrder)));
    }

    #[test]
    fn test_submission_rejects_invalid_values() {
        let mut draft = OrderDraft::new("USD");
        draft.items.push(item("Backup", 0, 500));
        assert!(matches!(
            draft.submission(),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let mut draft = OrderDraft::new("USD");
        draft.items.push(item("Backup", 1, 500));
        draft.adjustments.tax_rate = dec!(120);
        assert!(matches!(
            draft.submission(),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_line_item_wire_defaults() {
        let line: LineItem = serde_json::from_str(r#"{"unit_price": 1299}"#).unwrap();
        assert_eq!(line.quantity, 1);
        assert!(line.description.is_empty());
        assert_eq!(line.amount().cents(), 1299);

        let discount: Discount =
            serde_json::from_str(r#"{"type":"percent","percent":"7.5"}"#).unwrap();
        assert_eq!(discount, Discount::Percent { percent: dec!(7.5) });
    }
}
