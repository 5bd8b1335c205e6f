//! Appointment lifecycle service.
//!
//! Implements the [`AppointmentCommand`] driving port: creation through the
//! [`ConflictGuard`], and cancellation or completion through the status
//! state machine with a compare-and-set write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::conflict_guard::ConflictGuard;
use crate::domain::port_errors::map_repository_error;
use crate::domain::ports::{
    AppointmentCommand, AppointmentRepository, ClinicDirectory, CreateAppointmentRequest,
};
use crate::domain::{
    Appointment, AppointmentDraft, AppointmentId, AppointmentStatus, Error, LifecycleAction,
    TransitionPlan,
};

/// Domain service implementing appointment commands.
pub struct AppointmentService<D, R> {
    guard: ConflictGuard<D, R>,
    appointments: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<D, R> Clone for AppointmentService<D, R> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            appointments: Arc::clone(&self.appointments),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<D, R> AppointmentService<D, R>
where
    D: ClinicDirectory,
    R: AppointmentRepository,
{
    /// Create a service over the directory and appointment store.
    pub fn new(directory: Arc<D>, appointments: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            guard: ConflictGuard::new(directory, Arc::clone(&appointments)),
            appointments,
            clock,
        }
    }

    async fn load(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.appointments
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("appointment {id} not found")))
    }

    /// Apply `action` with a compare-and-set write. When a concurrent
    /// transition wins the race the record is re-read and the state machine
    /// evaluated once more.
    async fn transition(
        &self,
        id: AppointmentId,
        action: LifecycleAction,
    ) -> Result<Appointment, Error> {
        let current = self.load(id).await?;
        let next = match plan(&current, action)? {
            TransitionPlan::AlreadyDone => return Ok(current),
            TransitionPlan::Apply(next) => next,
        };

        if let Some(updated) = self
            .appointments
            .update_status(&id, current.status(), next)
            .await
            .map_err(map_repository_error)?
        {
            info!(
                appointment_id = %id,
                from = %current.status(),
                to = %next,
                "appointment status changed"
            );
            return Ok(updated);
        }

        warn!(
            appointment_id = %id,
            action = action.verb(),
            "appointment status changed concurrently; re-reading"
        );
        let latest = self.load(id).await?;
        match plan(&latest, action)? {
            TransitionPlan::AlreadyDone => Ok(latest),
            // Terminal states never lead back to `Scheduled`.
            TransitionPlan::Apply(_) => Err(Error::internal(format!(
                "appointment {id} is still {} after a lost update",
                latest.status()
            ))),
        }
    }
}

fn plan(appointment: &Appointment, action: LifecycleAction) -> Result<TransitionPlan, Error> {
    appointment
        .status()
        .plan(action)
        .map_err(|err| Error::invalid_transition(err.to_string()))
}

#[async_trait]
impl<D, R> AppointmentCommand for AppointmentService<D, R>
where
    D: ClinicDirectory,
    R: AppointmentRepository,
{
    async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, Error> {
        let interval = self.guard.vet(&request).await?;

        let appointment = Appointment::new(AppointmentDraft {
            id: AppointmentId::random(),
            patient_id: request.patient_id,
            practitioner_id: request.practitioner_id,
            start_utc: interval.start(),
            end_utc: interval.end(),
            status: AppointmentStatus::Scheduled,
            notes: request.notes,
            created_at_utc: self.clock.utc(),
        })
        .map_err(|err| Error::invalid_interval(err.to_string()))?;

        self.guard.commit(&appointment).await?;
        info!(
            appointment_id = %appointment.id(),
            practitioner_id = %appointment.practitioner_id(),
            start_utc = %appointment.start_utc(),
            end_utc = %appointment.end_utc(),
            "appointment booked"
        );
        Ok(appointment)
    }

    async fn cancel_appointment(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.transition(id, LifecycleAction::Cancel).await
    }

    async fn complete_appointment(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.transition(id, LifecycleAction::Complete).await
    }
}

#[cfg(test)]
#[path = "appointment_service_tests.rs"]
mod tests;
