//! Booking admission checks.
//!
//! The guard runs the ordered pre-checks for a new booking (patient,
//! practitioner, interval) and then looks for scheduled appointments that
//! overlap the proposed interval. That lookup is only a fast path: two
//! concurrent requests can both pass it. The repository's atomic insert is
//! authoritative, and its overlap signal is reported as the same `Conflict`
//! the fast path produces.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::domain::port_errors::{map_directory_error, map_repository_error};
use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, ClinicDirectory, CreateAppointmentRequest,
};
use crate::domain::{Appointment, Error, PractitionerId, TimeInterval};

/// Message shared by both conflict paths.
const OVERLAP_MESSAGE: &str = "the requested interval overlaps an existing appointment";

fn overlap_error(practitioner_id: PractitionerId, interval: &TimeInterval) -> Error {
    Error::conflict(OVERLAP_MESSAGE).with_details(json!({
        "practitionerId": practitioner_id,
        "startUtc": interval.start(),
        "endUtc": interval.end(),
    }))
}

/// Validates booking requests against the directory and existing bookings.
pub struct ConflictGuard<D, R> {
    directory: Arc<D>,
    appointments: Arc<R>,
}

impl<D, R> Clone for ConflictGuard<D, R> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            appointments: Arc::clone(&self.appointments),
        }
    }
}

impl<D, R> ConflictGuard<D, R>
where
    D: ClinicDirectory,
    R: AppointmentRepository,
{
    pub fn new(directory: Arc<D>, appointments: Arc<R>) -> Self {
        Self {
            directory,
            appointments,
        }
    }

    /// Run the pre-checks and the overlap fast path.
    ///
    /// Checks run in a fixed order and stop at the first failure: unknown
    /// patient, unknown practitioner, inactive practitioner, end not after
    /// start, overlap. Returns the validated interval.
    pub async fn vet(&self, request: &CreateAppointmentRequest) -> Result<TimeInterval, Error> {
        self.directory
            .find_patient(&request.patient_id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("patient {} not found", request.patient_id)))?;

        let practitioner = self
            .directory
            .find_practitioner(&request.practitioner_id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| {
                Error::not_found(format!(
                    "practitioner {} not found",
                    request.practitioner_id
                ))
            })?;
        if !practitioner.is_active() {
            return Err(Error::inactive_resource(format!(
                "practitioner {} is not accepting bookings",
                practitioner.id()
            )));
        }

        let interval = TimeInterval::new(request.start_utc, request.end_utc)
            .map_err(|err| Error::invalid_interval(err.to_string()))?;

        let busy = self
            .appointments
            .list_scheduled_overlapping(&request.practitioner_id, &interval)
            .await
            .map_err(map_repository_error)?;
        if busy.iter().any(|range| range.blocks(&interval)) {
            warn!(
                practitioner_id = %request.practitioner_id,
                start_utc = %interval.start(),
                end_utc = %interval.end(),
                "booking rejected by overlap pre-check"
            );
            return Err(overlap_error(request.practitioner_id, &interval));
        }

        Ok(interval)
    }

    /// Persist a vetted appointment, reporting a store-detected overlap as
    /// `Conflict`.
    pub async fn commit(&self, appointment: &Appointment) -> Result<(), Error> {
        match self.appointments.insert(appointment).await {
            Ok(()) => Ok(()),
            Err(AppointmentRepositoryError::Overlap { message }) => {
                warn!(
                    practitioner_id = %appointment.practitioner_id(),
                    start_utc = %appointment.start_utc(),
                    end_utc = %appointment.end_utc(),
                    %message,
                    "booking rejected by store exclusion rule"
                );
                Err(overlap_error(
                    appointment.practitioner_id(),
                    appointment.interval(),
                ))
            }
            Err(other) => Err(map_repository_error(other)),
        }
    }
}

#[cfg(test)]
#[path = "conflict_guard_tests.rs"]
mod tests;
