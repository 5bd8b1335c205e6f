//! PostgreSQL-backed `AppointmentRepository` implementation using Diesel ORM.
//!
//! The `ex_appointments_no_overlap` exclusion constraint makes inserts
//! atomic with respect to overlapping scheduled bookings; its violation is
//! reported as [`AppointmentRepositoryError::Overlap`]. Status changes are a
//! single conditional `UPDATE ... WHERE status = expected RETURNING *`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{
    Appointment, AppointmentDraft, AppointmentId, AppointmentStatus, BusyRange, PatientId,
    PractitionerId, TimeInterval,
};

use super::diesel_basic_error_mapping::{
    is_overlap_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AppointmentRow, BusyRow, NewAppointmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::appointments;

/// Diesel-backed implementation of the `AppointmentRepository` port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AppointmentRepositoryError {
    map_basic_pool_error(error, AppointmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AppointmentRepositoryError {
    map_basic_diesel_error(
        error,
        AppointmentRepositoryError::query,
        AppointmentRepositoryError::connection,
    )
}

fn row_to_appointment(row: AppointmentRow) -> Result<Appointment, AppointmentRepositoryError> {
    let status = row.status.parse::<AppointmentStatus>().map_err(|err| {
        warn!(appointment_id = %row.id, error = %err, "stored appointment status rejected");
        AppointmentRepositoryError::query("stored appointment status is invalid")
    })?;
    Appointment::new(AppointmentDraft {
        id: AppointmentId::from_uuid(row.id),
        patient_id: PatientId::from_uuid(row.patient_id),
        practitioner_id: PractitionerId::from_uuid(row.practitioner_id),
        start_utc: row.start_utc,
        end_utc: row.end_utc,
        status,
        notes: row.notes,
        created_at_utc: row.created_at_utc,
    })
    .map_err(|err| {
        warn!(appointment_id = %row.id, error = %err, "stored appointment interval rejected");
        AppointmentRepositoryError::query("stored appointment interval is invalid")
    })
}

fn row_to_busy_range(row: BusyRow) -> Result<BusyRange, AppointmentRepositoryError> {
    TimeInterval::new(row.start_utc, row.end_utc)
        .map(BusyRange::new)
        .map_err(|_| AppointmentRepositoryError::query("stored appointment interval is invalid"))
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn list_scheduled_overlapping(
        &self,
        practitioner_id: &PractitionerId,
        window: &TimeInterval,
    ) -> Result<Vec<BusyRange>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BusyRow> = appointments::table
            .filter(appointments::practitioner_id.eq(practitioner_id.as_uuid()))
            .filter(appointments::status.eq(AppointmentStatus::Scheduled.as_str()))
            .filter(appointments::start_utc.lt(window.end()))
            .filter(appointments::end_utc.gt(window.start()))
            .order(appointments::start_utc.asc())
            .select((appointments::start_utc, appointments::end_utc))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_busy_range).collect()
    }

    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewAppointmentRow {
            id: *appointment.id().as_uuid(),
            patient_id: *appointment.patient_id().as_uuid(),
            practitioner_id: *appointment.practitioner_id().as_uuid(),
            start_utc: appointment.start_utc(),
            end_utc: appointment.end_utc(),
            status: appointment.status().as_str(),
            notes: appointment.notes(),
            created_at_utc: appointment.created_at_utc(),
        };

        match diesel::insert_into(appointments::table)
            .values(&row)
            .execute(&mut conn)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_overlap_violation(&err) => {
                debug!(
                    appointment_id = %appointment.id(),
                    practitioner_id = %appointment.practitioner_id(),
                    "insert rejected by no-overlap constraint"
                );
                Err(AppointmentRepositoryError::overlap(
                    "scheduled interval already taken",
                ))
            }
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AppointmentRow> = appointments::table
            .filter(appointments::id.eq(id.as_uuid()))
            .select(AppointmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_appointment).transpose()
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        expected: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AppointmentRow> = diesel::update(
            appointments::table
                .filter(appointments::id.eq(id.as_uuid()))
                .filter(appointments::status.eq(expected.as_str())),
        )
        .set(appointments::status.eq(next.as_str()))
        .returning(AppointmentRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_appointment).transpose()
    }
}
