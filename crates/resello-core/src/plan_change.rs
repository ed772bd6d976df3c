//! # Plan Change Workflow
//!
//! Drives the "Change Plan" dialog: pick a target, see the proration, confirm.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────┐  select (real change)  ┌───────────┐   commit           │
//! │   │ Selecting │ ─────────────────────► │ Previewed │ ─────────► Committed│
//! │   └───────────┘ ◄───────────────────── └───────────┘                    │
//! │        │          select (no-op)             │                          │
//! │        │                                     │                          │
//! │        └──────────── cancel ─────────────────┴──────────► Cancelled     │
//! │                                                                         │
//! │   Committed / Cancelled are terminal: every call returns               │
//! │   CoreError::PlanChangeClosed.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::proration::{
    EffectiveDate, Plan, ProrationEngine, ProrationRequest, ProrationResult, Subscription,
};
use crate::types::{BillingCycle, ChangeTiming};
use crate::validation::{validate_period, validate_price};

/// Where the workflow currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanChangeState {
    /// Waiting for a target. `unchanged` is set when the last selection was
    /// the plan and cycle already active.
    Selecting { unchanged: bool },
    Previewed {
        request: Box<ProrationRequest>,
        result: ProrationResult,
    },
    Committed,
    Cancelled,
}

impl PlanChangeState {
    fn name(&self) -> &'static str {
        match self {
            PlanChangeState::Selecting { .. } => "selecting",
            PlanChangeState::Previewed { .. } => "previewed",
            PlanChangeState::Committed => "committed",
            PlanChangeState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanChangeState::Committed | PlanChangeState::Cancelled)
    }
}

/// What the caller sends to the backend once the change is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlanChangeCommit {
    pub from_plan_id: String,
    pub to_plan_id: String,
    pub billing_cycle: BillingCycle,
    pub timing: ChangeTiming,
    pub prorated_charge: Money,
    pub next_billing_amount: Money,
    pub effective_date: EffectiveDate,
    pub currency: String,
}

/// One open "Change Plan" dialog.
#[derive(Debug, Clone)]
pub struct PlanChange {
    subscription: Subscription,
    current_plan: Plan,
    engine: ProrationEngine,
    state: PlanChangeState,
}

impl PlanChange {
    pub fn new(subscription: Subscription, current_plan: Plan, engine: ProrationEngine) -> Self {
        PlanChange {
            subscription,
            current_plan,
            engine,
            state: PlanChangeState::Selecting { unchanged: false },
        }
    }

    pub fn state(&self) -> &PlanChangeState {
        &self.state
    }

    /// The current preview, if a real change is selected.
    pub fn preview(&self) -> Option<&ProrationResult> {
        match &self.state {
            PlanChangeState::Previewed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Selects a target and recomputes the preview.
    ///
    /// Returns `Ok(None)` when the target is the active plan and cycle.
    pub fn select(
        &mut self,
        target_plan: Plan,
        target_cycle: BillingCycle,
        timing: ChangeTiming,
        now: DateTime<Utc>,
    ) -> CoreResult<Option<&ProrationResult>> {
        self.ensure_open()?;

        let request = ProrationRequest {
            subscription: self.subscription.clone(),
            current_plan: self.current_plan.clone(),
            target_plan,
            target_cycle,
            timing,
        };

        self.state = match self.engine.compute(&request, now) {
            Some(result) => PlanChangeState::Previewed {
                request: Box::new(request),
                result,
            },
            None => PlanChangeState::Selecting { unchanged: true },
        };

        debug!(state = self.state.name(), "Plan change selection updated");
        Ok(self.preview())
    }

    /// Confirms the previewed change.
    ///
    /// ## Errors
    /// - `NoPlanChange` if the last selection was the active plan
    /// - `NoPreview` if nothing has been selected
    /// - `Validation` if the target plan price or the period is malformed
    /// - `PlanChangeClosed` after commit or cancel
    pub fn commit(&mut self) -> CoreResult<PlanChangeCommit> {
        self.ensure_open()?;

        let (request, result) = match &self.state {
            PlanChangeState::Previewed { request, result } => (request, result),
            PlanChangeState::Selecting { unchanged: true } => return Err(CoreError::NoPlanChange),
            _ => return Err(CoreError::NoPreview),
        };

        validate_price("price_monthly", request.target_plan.price_monthly)?;
        if let Some(yearly) = request.target_plan.price_yearly {
            validate_price("price_yearly", yearly)?;
        }
        if let (Some(start), Some(end)) = (
            request.subscription.current_period_start,
            request.subscription.current_period_end,
        ) {
            validate_period(start, end)?;
        }

        let commit = PlanChangeCommit {
            from_plan_id: request.subscription.plan_id.clone(),
            to_plan_id: request.target_plan.id.clone(),
            billing_cycle: request.target_cycle,
            timing: request.timing,
            prorated_charge: result.prorated_charge,
            next_billing_amount: result.next_billing_amount,
            effective_date: result.effective_date,
            currency: result.currency.clone(),
        };

        info!(
            from = %commit.from_plan_id,
            to = %commit.to_plan_id,
            charge = %commit.prorated_charge,
            "Plan change committed"
        );

        self.state = PlanChangeState::Committed;
        Ok(commit)
    }

    /// Abandons the dialog.
    pub fn cancel(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.state = PlanChangeState::Cancelled;
        Ok(())
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.state.is_terminal() {
            return Err(CoreError::PlanChangeClosed {
                state: self.state.name().to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
