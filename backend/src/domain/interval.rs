//! Half-open UTC time intervals.
//!
//! Every booking, busy range and availability slot is a `[start, end)`
//! interval: the end instant is excluded, so an appointment ending at 10:30
//! and another starting at 10:30 do not overlap.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;

/// Validation errors raised when constructing a [`TimeInterval`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    /// The end instant is equal to or earlier than the start instant.
    #[error("interval end {end} must be after start {start}")]
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Non-empty half-open interval `[start, end)` in UTC.
///
/// ## Invariants
/// - `end > start`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use clinic_backend::domain::TimeInterval;
///
/// let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap();
/// let booked = TimeInterval::new(at(10, 0), at(10, 30)).unwrap();
/// let adjacent = TimeInterval::new(at(10, 30), at(11, 0)).unwrap();
/// let clashing = TimeInterval::new(at(10, 15), at(10, 45)).unwrap();
///
/// assert!(!booked.overlaps(&adjacent));
/// assert!(booked.overlaps(&clashing));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(rename = "startUtc")]
    start: DateTime<Utc>,
    #[serde(rename = "endUtc")]
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, rejecting empty or inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if end <= start {
            return Err(IntervalError::EndNotAfterStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive start instant.
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end instant.
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the interval.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether the two intervals share at least one instant.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Read-only projection of a scheduled appointment's interval.
///
/// Busy ranges only ever come from the appointment store; they feed the
/// overlap check and slot computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BusyRange(TimeInterval);

impl BusyRange {
    /// Wrap the interval of a scheduled appointment.
    pub const fn new(interval: TimeInterval) -> Self {
        Self(interval)
    }

    /// The occupied interval.
    pub const fn interval(&self) -> &TimeInterval {
        &self.0
    }

    /// Whether the busy range blocks any part of `candidate`.
    pub fn blocks(&self, candidate: &TimeInterval) -> bool {
        self.0.overlaps(candidate)
    }
}
