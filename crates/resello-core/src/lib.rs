//! # resello-core: Pricing Logic for the Resello Dashboard
//!
//! All money math the reseller dashboard shows or submits lives here, as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Resello Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (React)                            │   │
//! │  │   Order form ──► Price editor ──► Bulk markup ──► Change plan  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               resello-preview (stdin → stdout)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ resello-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  totals   │  │  markup   │  │   bulk    │  │ proration │  │   │
//! │  │   │ OrderDraft│  │ PricedItem│  │PricingPlan│  │PlanChange │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   money • math • types • config • validation • error          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO ENV • PURE FUNCTIONS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type in integer cents
//! - [`math`] - Rounding and percentage helpers on `Decimal`
//! - [`totals`] - Order subtotal / discount / tax / total
//! - [`markup`] - Selling price from wholesale price and markup
//! - [`bulk`] - Markup over a whole catalog, plus filter/sort views
//! - [`proration`] - Mid-cycle plan change charges
//! - [`plan_change`] - Change Plan dialog workflow
//! - [`config`] - Calculator settings
//! - [`validation`] - Commit-time checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; `now` is always passed in
//! 2. **Integer Money**: stored amounts are cents; `Decimal` only in between
//! 3. **One Rounding Rule**: `math::round2`, half away from zero
//! 4. **Previews never fail**: bad input is clamped, commits are validated
//!
//! ## Example Usage
//!
//! ```rust
//! use resello_core::totals::{compute_totals, Adjustments, LineItem};
//! use resello_core::Money;
//! use rust_decimal::Decimal;
//!
//! let items = vec![LineItem::new("Shared hosting", 2, Money::from_cents(1000))];
//! let mut adjustments = Adjustments::default();
//! adjustments.set_discount_percent(Decimal::from(10));
//! adjustments.tax_rate = Decimal::from(8);
//!
//! let totals = compute_totals(&items, &adjustments, "USD");
//! assert_eq!(totals.total.cents(), 1944);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bulk;
pub mod config;
pub mod error;
pub mod markup;
pub mod math;
pub mod money;
pub mod plan_change;
pub mod proration;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::PricingConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

use rust_decimal::Decimal;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency stamped on records when the host does not configure one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Markup applied to calculated items with no stored percentage (20%).
pub const DEFAULT_MARKUP_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Days in a billing month for proration.
///
/// ## Business Reason
/// Matches what the billing backend charges. Months of 28, 29 or 31 days are
/// slightly over/under-charged; see `ProrationConvention::ActualPeriod`.
pub const PRORATION_DAYS_PER_MONTH: u32 = 30;

/// Maximum quantity on a single order line.
pub const MAX_LINE_QUANTITY: i64 = 9999;
