//! Port for appointment persistence.
//!
//! Adapters must make `insert` atomic with respect to the no-overlap rule:
//! two concurrent inserts of overlapping scheduled intervals for the same
//! practitioner must not both succeed. The loser reports
//! [`AppointmentRepositoryError::Overlap`].

use async_trait::async_trait;

use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, BusyRange, PractitionerId, TimeInterval,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "appointment repository query failed: {message}",
        /// The store rejected an insert that overlaps a scheduled booking.
        Overlap { message: String } =>
            "appointment overlaps a scheduled booking: {message}",
    }
}

/// Port for reading and writing appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Scheduled intervals of `practitioner_id` overlapping `window`, sorted
    /// by start.
    async fn list_scheduled_overlapping(
        &self,
        practitioner_id: &PractitionerId,
        window: &TimeInterval,
    ) -> Result<Vec<BusyRange>, AppointmentRepositoryError>;

    /// Persist a new appointment.
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError>;

    /// Find an appointment by id.
    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// Move an appointment from `expected` to `next`.
    ///
    /// Returns the updated record, or `None` when the appointment is missing
    /// or no longer in `expected`.
    async fn update_status(
        &self,
        id: &AppointmentId,
        expected: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn overlap_error_formats_message() {
        let err = AppointmentRepositoryError::overlap("ex_appointments_no_overlap");
        assert!(err.to_string().contains("ex_appointments_no_overlap"));
    }
}
