//! # Error Types
//!
//! Domain-specific error types for resello-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  resello-core errors (this file)                                       │
//! │  ├── CoreError        - Workflow / commit failures                     │
//! │  └── ValidationError  - Input rejected at commit time                  │
//! │                                                                         │
//! │  resello-preview errors (app)                                          │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Dashboard              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## When errors are raised
//! Preview computations never fail: bad numbers are clamped or the offending
//! line is excluded so a half-typed form still renders. Errors only come out
//! of the *commit* paths (`OrderDraft::submission`, `PlanChange::commit`,
//! `MarkupPolicy::new`), where the caller is about to send something to the
//! backend.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order was submitted without any line that has a description.
    #[error("Order has no submittable line items")]
    EmptyOrder,

    /// The selected plan and billing cycle are the ones already active.
    ///
    /// ## User Workflow
    /// ```text
    /// Change Plan dialog
    ///      │
    ///      ▼
    /// Select "Pro (monthly)" while already on "Pro (monthly)"
    ///      │
    ///      ▼
    /// preview → None, commit → NoPlanChange
    ///      │
    ///      ▼
    /// UI keeps the "Confirm" button disabled
    /// ```
    #[error("Selected plan is already active; nothing to change")]
    NoPlanChange,

    /// Commit was requested before any preview was computed.
    #[error("No plan change preview has been computed")]
    NoPreview,

    /// The plan change workflow already reached a terminal state.
    #[error("Plan change is already {state}")]
    PlanChangeClosed { state: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// A billing period whose end is not after its start.
    #[error("billing period must end after it starts")]
    InvalidPeriod,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
