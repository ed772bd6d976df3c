//! # API Error Type
//!
//! Unified error type written to stdout when a request fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stdin ──► serde_json ─── malformed? ──► INVALID_REQUEST ──┐           │
//! │                │                                            │           │
//! │                ▼                                            │           │
//! │  RESELLO_* ──► config ─── bad value? ──► CONFIGURATION ────┤           │
//! │                │                                            │           │
//! │                ▼                                            ▼           │
//! │  resello-core commit ─── CoreError ──► VALIDATION_ERROR   ApiError     │
//! │                                        BUSINESS_LOGIC      (stdout,    │
//! │                                                             exit 1)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use resello_core::{CoreError, ValidationError};
use serde::Serialize;

use crate::config::ConfigError;

/// Error document returned to the caller.
///
/// ## Serialization
/// ```json
/// {
///   "code": "BUSINESS_LOGIC",
///   "message": "Order has no submittable line items"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected at commit time
    ValidationError,

    /// Valid input, but the operation makes no sense in the current state
    BusinessLogic,

    /// Request document could not be parsed
    InvalidRequest,

    /// `RESELLO_*` environment is malformed
    Configuration,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::from(e),
            e @ (CoreError::EmptyOrder
            | CoreError::NoPlanChange
            | CoreError::NoPreview
            | CoreError::PlanChangeClosed { .. }) => {
                ApiError::new(ErrorCode::BusinessLogic, e.to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::Configuration, err.to_string())
    }
}

/// Parse failures of the request document.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_request(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
