//! Driving port for appointment mutations.
//!
//! Creation goes through the conflict guard; cancellation and completion go
//! through the status state machine. Every failure is a domain [`Error`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Appointment, AppointmentId, Error, PatientId, PractitionerId};

/// Request to book a practitioner's time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: PatientId,
    pub practitioner_id: PractitionerId,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Driving port for appointment write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentCommand: Send + Sync {
    /// Book a new scheduled appointment.
    ///
    /// Fails with `NotFound` for unknown patients or practitioners,
    /// `InactiveResource` for inactive practitioners, `InvalidInterval` when
    /// the end is not after the start, and `Conflict` when the interval
    /// overlaps a scheduled booking of the same practitioner.
    async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, Error>;

    /// Cancel an appointment. Cancelling twice returns the cancelled record.
    async fn cancel_appointment(&self, id: AppointmentId) -> Result<Appointment, Error>;

    /// Mark an appointment completed. Completing twice returns the completed
    /// record.
    async fn complete_appointment(&self, id: AppointmentId) -> Result<Appointment, Error>;
}
