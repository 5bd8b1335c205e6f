//! Domain-level error type shared by every booking operation.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses (or any other envelope); the domain only picks the category.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A referenced patient, practitioner or appointment does not exist.
    NotFound,
    /// The referenced practitioner exists but no longer takes bookings.
    InactiveResource,
    /// An interval is malformed: bad ordering, bad date range or a broken
    /// working calendar.
    InvalidInterval,
    /// The proposed interval overlaps a scheduled appointment.
    Conflict,
    /// The appointment's current status forbids the requested transition.
    InvalidTransition,
    /// The caller exceeded its request allowance.
    RateLimited,
    /// A backing store is unreachable.
    ServiceUnavailable,
    /// An unexpected failure; details stay server-side.
    InternalError,
}

/// Domain error payload.
///
/// # Examples
/// ```
/// use clinic_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("appointment missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "appointment missing");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use clinic_backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::conflict("slot taken").with_details(json!({ "practitionerId": "p-1" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InactiveResource`].
    pub fn inactive_resource(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InactiveResource, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidInterval`].
    pub fn invalid_interval(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInterval, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidTransition`].
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTransition, message)
    }

    /// Convenience constructor for [`ErrorCode::RateLimited`].
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RateLimited, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
