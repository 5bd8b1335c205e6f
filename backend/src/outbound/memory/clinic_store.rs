//! Mutex-guarded store implementing the directory and appointment ports.
//!
//! Every mutation runs under one lock, so the overlap check in `insert` and
//! the write it guards are atomic: of two concurrent overlapping inserts for
//! the same practitioner exactly one succeeds.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, ClinicDirectory, ClinicDirectoryError,
};
use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, BusyRange, Patient, PatientId, Practitioner,
    PractitionerId, TimeInterval,
};

#[derive(Debug, Default)]
struct ClinicState {
    patients: HashMap<PatientId, Patient>,
    practitioners: HashMap<PractitionerId, Practitioner>,
    appointments: HashMap<AppointmentId, Appointment>,
}

impl ClinicState {
    fn scheduled_for<'a>(
        &'a self,
        practitioner_id: &'a PractitionerId,
        window: &'a TimeInterval,
    ) -> impl Iterator<Item = &'a Appointment> + 'a {
        self.appointments.values().filter(move |appointment| {
            appointment.practitioner_id() == *practitioner_id
                && appointment.status() == AppointmentStatus::Scheduled
                && appointment.interval().overlaps(window)
        })
    }
}

/// In-memory clinic store.
#[derive(Debug, Default)]
pub struct InMemoryClinicStore {
    state: Mutex<ClinicState>,
}

const POISONED: &str = "in-memory clinic store lock poisoned";

impl InMemoryClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ClinicState>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }

    /// Register or replace a patient.
    pub fn add_patient(&self, patient: Patient) -> Result<(), ClinicDirectoryError> {
        let mut state = self.lock().map_err(ClinicDirectoryError::query)?;
        state.patients.insert(patient.id(), patient);
        Ok(())
    }

    /// Register or replace a practitioner.
    pub fn add_practitioner(&self, practitioner: Practitioner) -> Result<(), ClinicDirectoryError> {
        let mut state = self.lock().map_err(ClinicDirectoryError::query)?;
        state.practitioners.insert(practitioner.id(), practitioner);
        Ok(())
    }
}

#[async_trait]
impl ClinicDirectory for InMemoryClinicStore {
    async fn find_patient(&self, id: &PatientId) -> Result<Option<Patient>, ClinicDirectoryError> {
        let state = self.lock().map_err(ClinicDirectoryError::query)?;
        Ok(state.patients.get(id).cloned())
    }

    async fn find_practitioner(
        &self,
        id: &PractitionerId,
    ) -> Result<Option<Practitioner>, ClinicDirectoryError> {
        let state = self.lock().map_err(ClinicDirectoryError::query)?;
        Ok(state.practitioners.get(id).cloned())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryClinicStore {
    async fn list_scheduled_overlapping(
        &self,
        practitioner_id: &PractitionerId,
        window: &TimeInterval,
    ) -> Result<Vec<BusyRange>, AppointmentRepositoryError> {
        let state = self.lock().map_err(AppointmentRepositoryError::query)?;
        let mut busy: Vec<BusyRange> = state
            .scheduled_for(practitioner_id, window)
            .map(|appointment| BusyRange::new(*appointment.interval()))
            .collect();
        busy.sort_by_key(|range| range.interval().start());
        Ok(busy)
    }

    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut state = self.lock().map_err(AppointmentRepositoryError::query)?;
        if state.appointments.contains_key(&appointment.id()) {
            return Err(AppointmentRepositoryError::query(format!(
                "appointment {} already exists",
                appointment.id()
            )));
        }
        if appointment.status() == AppointmentStatus::Scheduled {
            let practitioner_id = appointment.practitioner_id();
            if let Some(existing) = state
                .scheduled_for(&practitioner_id, appointment.interval())
                .next()
            {
                return Err(AppointmentRepositoryError::overlap(format!(
                    "overlaps appointment {}",
                    existing.id()
                )));
            }
        }
        state
            .appointments
            .insert(appointment.id(), appointment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let state = self.lock().map_err(AppointmentRepositoryError::query)?;
        Ok(state.appointments.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        expected: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut state = self.lock().map_err(AppointmentRepositoryError::query)?;
        let Some(stored) = state.appointments.get_mut(id) else {
            return Ok(None);
        };
        if stored.status() != expected {
            return Ok(None);
        }
        *stored = stored.clone().with_status(next);
        Ok(Some(stored.clone()))
    }
}
