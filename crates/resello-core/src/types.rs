//! # Domain Types
//!
//! Small shared enums used across the calculators.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  BillingCycle   │   │  ChangeTiming   │   │ SubscriptionSt. │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Monthly        │   │  Immediate      │   │  Active         │       │
//! │  │  Yearly         │   │  NextPeriod     │   │  Trialing ...   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Billing Cycle
// =============================================================================

/// Recurrence period of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl Default for BillingCycle {
    fn default() -> Self {
        BillingCycle::Monthly
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingCycle::Monthly => f.write_str("monthly"),
            BillingCycle::Yearly => f.write_str("yearly"),
        }
    }
}

// =============================================================================
// Change Timing
// =============================================================================

/// When a subscription plan change takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTiming {
    /// Switch now and charge (or credit) the prorated difference today.
    Immediate,
    /// Keep the current plan until the period ends; nothing is charged today.
    NextPeriod,
}

impl Default for ChangeTiming {
    fn default() -> Self {
        ChangeTiming::Immediate
    }
}

// =============================================================================
// Subscription Status
// =============================================================================

/// Lifecycle status of a subscription as reported by the backend.
///
/// Carried through for display; proration does not branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Cancelled,
    Suspended,
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        SubscriptionStatus::Active
    }
}
