//! Diesel row types. Internal to the persistence adapters.

use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{appointments, patients, practitioners};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatientRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = practitioners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PractitionerRow {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: Option<String>,
    pub is_active: bool,
    pub time_zone_id: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub lunch_start: Option<NaiveTime>,
    pub lunch_end: Option<NaiveTime>,
    pub slot_minutes: i32,
    pub working_days: i16,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub practitioner_id: Uuid,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}

/// Insertable appointment borrowed from the domain value.
#[derive(Debug, Insertable)]
#[diesel(table_name = appointments)]
pub(crate) struct NewAppointmentRow<'a> {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub practitioner_id: Uuid,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub created_at_utc: DateTime<Utc>,
}

/// Busy interval projection.
#[derive(Debug, Clone, Copy, Queryable)]
pub(crate) struct BusyRow {
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}
