//! # Subscription Commands
//!
//! Proration preview for the Change Plan dialog, and the confirmed change.

use chrono::{DateTime, Utc};
use resello_core::plan_change::{PlanChange, PlanChangeCommit};
use resello_core::proration::{ProrationEngine, ProrationRequest, ProrationResult};
use resello_core::PricingConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct ProrationInput {
    pub request: ProrationRequest,

    /// Evaluation instant. Defaults to the time the command runs.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,

    /// Also confirm the change and return the commit payload.
    #[serde(default)]
    pub commit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProrationResponse {
    /// `null` when the selection is the active plan and cycle.
    pub preview: Option<ProrationResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<PlanChangeCommit>,
}

pub fn proration(
    input: ProrationInput,
    config: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<ProrationResponse, ApiError> {
    let now = input.now.unwrap_or(now);
    let ProrationRequest {
        subscription,
        current_plan,
        target_plan,
        target_cycle,
        timing,
    } = input.request;
    debug!(from = %subscription.plan_id, to = %target_plan.id, %now, "proration command");

    let mut change = PlanChange::new(subscription, current_plan, ProrationEngine::new(config));
    let preview = change
        .select(target_plan, target_cycle, timing, now)?
        .cloned();

    let commit = if input.commit {
        Some(change.commit()?)
    } else {
        None
    };

    Ok(ProrationResponse { preview, commit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::TimeZone;
    use resello_core::proration::{Plan, Subscription};
    use resello_core::{BillingCycle, ChangeTiming, Money, SubscriptionStatus};

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 0, 0, 0).unwrap()
    }

    fn input(target: &str, commit: bool) -> ProrationInput {
        ProrationInput {
            request: ProrationRequest {
                subscription: Subscription {
                    plan_id: "basic".to_string(),
                    billing_cycle: BillingCycle::Monthly,
                    current_period_start: Some(at(1)),
                    current_period_end: Some(at(31)),
                    status: SubscriptionStatus::Active,
                },
                current_plan: Plan::new("basic", Money::from_cents(1000), None),
                target_plan: Plan::new(target, Money::from_cents(2000), None),
                target_cycle: BillingCycle::Monthly,
                timing: ChangeTiming::Immediate,
            },
            now: Some(at(16)),
            commit,
        }
    }

    #[test]
    fn test_preview_only() {
        let response = proration(input("pro", false), &PricingConfig::default(), at(2)).unwrap();
        let preview = response.preview.unwrap();
        assert_eq!(preview.days_remaining, 15);
        assert_eq!(preview.prorated_charge.cents(), 500);
        assert!(response.commit.is_none());
    }

    #[test]
    fn test_commit_payload() {
        let response = proration(input("pro", true), &PricingConfig::default(), at(2)).unwrap();
        let commit = response.commit.unwrap();
        assert_eq!(commit.to_plan_id, "pro");
        assert_eq!(commit.prorated_charge.cents(), 500);
    }

    #[test]
    fn test_noop_preview_is_null() {
        let response = proration(input("basic", false), &PricingConfig::default(), at(2)).unwrap();
        assert!(response.preview.is_none());
    }

    #[test]
    fn test_noop_commit_is_rejected() {
        let err = proration(input("basic", true), &PricingConfig::default(), at(2)).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }
}
