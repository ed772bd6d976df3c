//! # Proration Engine
//!
//! Computes what a mid-cycle plan change costs today and what the customer
//! pays next cycle.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   period_start          now                         period_end         │
//! │        │────── used ─────│──────── remaining ──────────│               │
//! │                                                                         │
//! │   days_remaining   = ceil(end − start) − ceil(now − start)   (≥ 0)     │
//! │   daily_rate       = current_price / 30                                │
//! │   unused_credit    = daily_rate × days_remaining                       │
//! │   price_difference = new_price − current_price        (signed)         │
//! │   prorated_charge  = price_difference / 30 × days_remaining            │
//! │                      (immediate only; next period ⇒ 0)                 │
//! │   next_billing     = new_price                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The 30-day month is a simplification that over/under-charges in 28, 29
//! and 31 day months. It is kept as the default; `ProrationConvention`
//! allows dividing by the real period length instead.
//!
//! `now` is always a parameter. The engine never reads the clock.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::math::round2;
use crate::money::Money;
use crate::types::{BillingCycle, ChangeTiming, SubscriptionStatus};
use crate::PRORATION_DAYS_PER_MONTH;

const MILLIS_PER_DAY: i64 = 86_400_000;

// =============================================================================
// Convention
// =============================================================================

/// Divisor used to turn a period price into a daily rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProrationConvention {
    /// Every period is `days` long, regardless of the calendar.
    FixedMonth { days: u32 },
    /// Divide by the actual length of the current period.
    ActualPeriod,
}

impl Default for ProrationConvention {
    fn default() -> Self {
        ProrationConvention::FixedMonth {
            days: PRORATION_DAYS_PER_MONTH,
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// A hosting/reseller plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Plan {
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub price_monthly: Money,

    /// Independently priced (usually discounted). When unset, yearly is
    /// `price_monthly × 12`.
    #[serde(default)]
    pub price_yearly: Option<Money>,
}

impl Plan {
    pub fn new(id: impl Into<String>, price_monthly: Money, price_yearly: Option<Money>) -> Self {
        Plan {
            id: id.into(),
            name: String::new(),
            price_monthly,
            price_yearly,
        }
    }

    /// Price of one period of `cycle`.
    ///
    /// ## Example
    /// ```rust
    /// use resello_core::proration::Plan;
    /// use resello_core::{BillingCycle, Money};
    ///
    /// let plan = Plan::new("starter", Money::from_cents(1000), None);
    /// assert_eq!(plan.price_for(BillingCycle::Yearly).cents(), 12000);
    ///
    /// let plan = Plan::new("pro", Money::from_cents(1000), Some(Money::from_cents(9900)));
    /// assert_eq!(plan.price_for(BillingCycle::Yearly).cents(), 9900);
    /// ```
    pub fn price_for(&self, cycle: BillingCycle) -> Money {
        match cycle {
            BillingCycle::Monthly => self.price_monthly,
            BillingCycle::Yearly => self.price_yearly.unwrap_or(self.price_monthly * 12),
        }
    }
}

/// The customer's current subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subscription {
    pub plan_id: String,

    #[serde(default)]
    pub billing_cycle: BillingCycle,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub current_period_start: Option<DateTime<Utc>>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub current_period_end: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: SubscriptionStatus,
}

/// A requested plan and/or billing cycle change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProrationRequest {
    pub subscription: Subscription,
    pub current_plan: Plan,
    pub target_plan: Plan,
    pub target_cycle: BillingCycle,
    #[serde(default)]
    pub timing: ChangeTiming,
}

impl ProrationRequest {
    /// True when neither the plan nor the billing cycle would change.
    pub fn is_unchanged(&self) -> bool {
        self.target_plan.id == self.subscription.plan_id
            && self.target_cycle == self.subscription.billing_cycle
    }
}

// =============================================================================
// Result
// =============================================================================

/// When the change takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectiveDate {
    Immediately,
    /// At the end of the current period (`None` if the backend did not
    /// report one).
    PeriodEnd {
        #[ts(as = "Option<String>")]
        date: Option<DateTime<Utc>>,
    },
}

/// Preview numbers for a plan change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProrationResult {
    pub days_remaining: i64,
    pub current_price: Money,
    pub new_price: Money,

    /// Value of the unused part of the current period.
    pub unused_credit: Money,

    /// `new_price − current_price`; positive for upgrades.
    pub price_difference: Money,

    /// Charged today. Negative means a credit (downgrade).
    pub prorated_charge: Money,

    pub next_billing_amount: Money,
    pub effective_date: EffectiveDate,
    pub currency: String,
}

// =============================================================================
// Engine
// =============================================================================

/// Stateless proration calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProrationEngine {
    convention: ProrationConvention,
    currency: String,
}

impl Default for ProrationEngine {
    fn default() -> Self {
        ProrationEngine::new(&PricingConfig::default())
    }
}

impl ProrationEngine {
    pub fn new(config: &PricingConfig) -> Self {
        ProrationEngine {
            convention: config.proration,
            currency: config.currency.clone(),
        }
    }

    /// Computes the proration preview.
    ///
    /// Returns `None` when the request changes nothing (same plan, same
    /// cycle), so the caller can disable its confirm action instead of
    /// showing a zero charge.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use resello_core::proration::{Plan, ProrationEngine, ProrationRequest, Subscription};
    /// use resello_core::{BillingCycle, ChangeTiming, Money, SubscriptionStatus};
    ///
    /// let request = ProrationRequest {
    ///     subscription: Subscription {
    ///         plan_id: "basic".into(),
    ///         billing_cycle: BillingCycle::Monthly,
    ///         current_period_start: Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()),
    ///         current_period_end: Some(Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap()),
    ///         status: SubscriptionStatus::Active,
    ///     },
    ///     current_plan: Plan::new("basic", Money::from_cents(1000), None),
    ///     target_plan: Plan::new("pro", Money::from_cents(2000), None),
    ///     target_cycle: BillingCycle::Monthly,
    ///     timing: ChangeTiming::Immediate,
    /// };
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap();
    /// let result = ProrationEngine::default().compute(&request, now).unwrap();
    /// assert_eq!(result.days_remaining, 15);
    /// assert_eq!(result.prorated_charge.cents(), 500);
    /// ```
    pub fn compute(&self, request: &ProrationRequest, now: DateTime<Utc>) -> Option<ProrationResult> {
        if request.is_unchanged() {
            debug!(plan_id = %request.target_plan.id, "Plan change is a no-op");
            return None;
        }

        let subscription = &request.subscription;
        let current_price = request.current_plan.price_for(subscription.billing_cycle);
        let new_price = request.target_plan.price_for(request.target_cycle);

        let start = subscription.current_period_start;
        let end = subscription.current_period_end;
        let days = days_remaining(start, end, now);
        let divisor = self.divisor(start, end);

        let unused_credit = round2(current_price.to_decimal() * Decimal::from(days) / divisor);
        let price_difference = new_price - current_price;

        let (prorated_charge, effective_date) = match request.timing {
            ChangeTiming::Immediate => (
                round2(price_difference.to_decimal() * Decimal::from(days) / divisor),
                EffectiveDate::Immediately,
            ),
            ChangeTiming::NextPeriod => (Money::zero(), EffectiveDate::PeriodEnd { date: end }),
        };

        debug!(
            from = %subscription.plan_id,
            to = %request.target_plan.id,
            cycle = %request.target_cycle,
            days_remaining = days,
            prorated_charge = %prorated_charge,
            "Computed proration"
        );

        Some(ProrationResult {
            days_remaining: days,
            current_price,
            new_price,
            unused_credit,
            price_difference,
            prorated_charge,
            next_billing_amount: new_price,
            effective_date,
            currency: self.currency.clone(),
        })
    }

    fn divisor(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Decimal {
        let days = match self.convention {
            ProrationConvention::FixedMonth { days } => i64::from(days),
            ProrationConvention::ActualPeriod => {
                period_days(start, end).unwrap_or(i64::from(PRORATION_DAYS_PER_MONTH))
            }
        };
        Decimal::from(days.max(1))
    }
}

/// Whole days left in the period, rounding partial days up on both ends.
///
/// Unknown or inverted periods yield 0. A `now` before the period start
/// counts as zero days used.
pub fn days_remaining(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let (Some(start), Some(total_days)) = (start, period_days(start, end)) else {
        return 0;
    };
    let days_used = ceil_days(now - start).max(0);
    (total_days - days_used).max(0)
}

fn period_days(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<i64> {
    match (start, end) {
        (Some(start), Some(end)) if end > start => Some(ceil_days(end - start)),
        _ => None,
    }
}

fn ceil_days(duration: Duration) -> i64 {
    (duration.num_milliseconds() + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY)
}

// =============================================================================
// Unit Tests
// =============================================================================
