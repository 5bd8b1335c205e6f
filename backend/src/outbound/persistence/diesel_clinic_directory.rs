//! PostgreSQL-backed `ClinicDirectory` implementation using Diesel ORM.
//!
//! Practitioner rows carry their working calendar inline. Rows are validated
//! into [`WorkingCalendar`] on read, so a bad stored calendar surfaces as
//! [`ClinicDirectoryError::InvalidCalendar`] instead of wrong availability.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ClinicDirectory, ClinicDirectoryError};
use crate::domain::{
    Patient, PatientId, Practitioner, PractitionerId, TimeZonePolicy, WorkingCalendar,
    WorkingCalendarDraft, WorkingDays,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{PatientRow, PractitionerRow};
use super::pool::{DbPool, PoolError};
use super::schema::{patients, practitioners};

/// Diesel-backed implementation of the `ClinicDirectory` port.
#[derive(Clone)]
pub struct DieselClinicDirectory {
    pool: DbPool,
    policy: TimeZonePolicy,
}

impl DieselClinicDirectory {
    /// Create a directory that resolves stored zones under `policy`.
    pub fn new(pool: DbPool, policy: TimeZonePolicy) -> Self {
        Self { pool, policy }
    }
}

fn map_pool_error(error: PoolError) -> ClinicDirectoryError {
    map_basic_pool_error(error, ClinicDirectoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ClinicDirectoryError {
    map_basic_diesel_error(
        error,
        ClinicDirectoryError::query,
        ClinicDirectoryError::connection,
    )
}

fn row_to_patient(row: PatientRow) -> Patient {
    Patient::new(
        PatientId::from_uuid(row.id),
        row.full_name,
        row.email,
        row.phone,
    )
}

fn row_to_practitioner(
    row: PractitionerRow,
    policy: TimeZonePolicy,
) -> Result<Practitioner, ClinicDirectoryError> {
    let lunch_break = match (row.lunch_start, row.lunch_end) {
        (Some(start), Some(end)) => Some((start, end)),
        (None, None) => None,
        _ => {
            return Err(ClinicDirectoryError::invalid_calendar(
                "lunch break must set both start and end",
            ));
        }
    };
    let slot_minutes = u32::try_from(row.slot_minutes)
        .map_err(|_| ClinicDirectoryError::invalid_calendar("slot length must be positive"))?;
    let working_days = u8::try_from(row.working_days)
        .map(WorkingDays::from_bits)
        .map_err(|_| ClinicDirectoryError::invalid_calendar("working day mask out of range"))?;

    let draft = WorkingCalendarDraft {
        time_zone_id: row.time_zone_id,
        open: row.open_time,
        close: row.close_time,
        lunch_break,
        slot_minutes,
        working_days,
    };
    let calendar = WorkingCalendar::new(draft, policy).map_err(|err| {
        warn!(practitioner_id = %row.id, error = %err, "stored calendar rejected");
        ClinicDirectoryError::invalid_calendar(err.to_string())
    })?;

    Ok(Practitioner::new(
        PractitionerId::from_uuid(row.id),
        row.full_name,
        row.specialty,
        row.is_active,
        calendar,
    ))
}

#[async_trait]
impl ClinicDirectory for DieselClinicDirectory {
    async fn find_patient(&self, id: &PatientId) -> Result<Option<Patient>, ClinicDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PatientRow> = patients::table
            .filter(patients::id.eq(id.as_uuid()))
            .select(PatientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_patient))
    }

    async fn find_practitioner(
        &self,
        id: &PractitionerId,
    ) -> Result<Option<Practitioner>, ClinicDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PractitionerRow> = practitioners::table
            .filter(practitioners::id.eq(id.as_uuid()))
            .select(PractitionerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row_to_practitioner(row, self.policy))
            .transpose()
    }
}
