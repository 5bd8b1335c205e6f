//! Driving port for practitioner availability reads.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{AvailabilitySlot, Error, PractitionerId};

/// Request for free slots over a closed range of local dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub practitioner_id: PractitionerId,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Free slots of one practitioner.
///
/// `window_start` and `window_end` bound the UTC window used to fetch busy
/// ranges: opening time on the first date to closing time on the last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PractitionerAvailability {
    pub practitioner_id: PractitionerId,
    #[serde(rename = "fromUtc")]
    pub window_start: DateTime<Utc>,
    #[serde(rename = "toUtc")]
    pub window_end: DateTime<Utc>,
    pub slot_minutes: u32,
    pub slots: Vec<AvailabilitySlot>,
}

/// Driving port for availability reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityQuery: Send + Sync {
    /// Compute free slots for the practitioner between `from_date` and
    /// `to_date` inclusive.
    async fn get_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<PractitionerAvailability, Error>;
}
