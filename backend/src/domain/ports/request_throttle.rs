//! Port for per-client request throttling.
//!
//! Throttling is decided per scope (appointment writes or general reads) and
//! per partition key, normally the client address.

use std::time::Duration;

use thiserror::Error;

/// Request class a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrottleScope {
    /// Appointment creation and status changes.
    AppointmentWrites,
    /// Everything else, availability reads included.
    General,
}

impl ThrottleScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppointmentWrites => "appointment_writes",
            Self::General => "general",
        }
    }
}

/// Rule construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThrottleRuleError {
    #[error("throttle limit must be at least 1")]
    ZeroLimit,
    #[error("throttle window must be longer than zero")]
    ZeroWindow,
}

/// At most `limit` requests per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleRule {
    limit: u32,
    window: Duration,
}

impl ThrottleRule {
    pub fn new(limit: u32, window: Duration) -> Result<Self, ThrottleRuleError> {
        if limit == 0 {
            return Err(ThrottleRuleError::ZeroLimit);
        }
        if window.is_zero() {
            return Err(ThrottleRuleError::ZeroWindow);
        }
        Ok(Self { limit, window })
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }

    pub const fn window(&self) -> Duration {
        self.window
    }
}

/// Rules for every scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    pub appointment_writes: ThrottleRule,
    pub general: ThrottleRule,
}

impl ThrottlePolicy {
    /// Rule governing `scope`.
    pub const fn rule(&self, scope: ThrottleScope) -> ThrottleRule {
        match scope {
            ThrottleScope::AppointmentWrites => self.appointment_writes,
            ThrottleScope::General => self.general,
        }
    }
}

impl Default for ThrottlePolicy {
    /// Ten appointment writes and sixty general requests per minute.
    fn default() -> Self {
        let minute = Duration::from_secs(60);
        Self {
            appointment_writes: ThrottleRule { limit: 10, window: minute },
            general: ThrottleRule { limit: 60, window: minute },
        }
    }
}

/// Outcome of a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Request admitted; `remaining` more fit in the current window.
    Allowed { remaining: u32 },
    /// Request refused until the window resets.
    Limited { retry_after: Duration },
}

/// Port deciding whether a client may issue another request.
#[cfg_attr(test, mockall::automock)]
pub trait RequestThrottle: Send + Sync {
    /// Record a request from `partition` in `scope` and decide on it.
    fn check(&self, scope: ThrottleScope, partition: &str) -> ThrottleDecision;
}

/// Throttle that admits every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlimitedThrottle;

impl RequestThrottle for UnlimitedThrottle {
    fn check(&self, _scope: ThrottleScope, _partition: &str) -> ThrottleDecision {
        ThrottleDecision::Allowed {
            remaining: u32::MAX,
        }
    }
}
