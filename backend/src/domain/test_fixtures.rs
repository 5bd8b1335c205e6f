//! Shared builders for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::CreateAppointmentRequest;
use crate::domain::{
    Appointment, AppointmentDraft, AppointmentId, AppointmentStatus, Patient, PatientId,
    Practitioner, PractitionerId, TimeZonePolicy, WorkingCalendar, WorkingCalendarDraft,
};

/// 2026-03-02 (a Monday) at the given UTC wall time.
pub(crate) fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: monday_at(7, 45),
    })
}

pub(crate) fn patient(id: PatientId) -> Patient {
    Patient::new(id, "Ada Byron", Some("ada@example.test".to_owned()), None)
}

pub(crate) fn practitioner(id: PractitionerId, is_active: bool) -> Practitioner {
    let calendar = WorkingCalendar::new(
        WorkingCalendarDraft::clinic_default(),
        TimeZonePolicy::Strict,
    )
    .expect("default calendar");
    Practitioner::new(
        id,
        "Dr. Grace Hopper",
        Some("General practice".to_owned()),
        is_active,
        calendar,
    )
}

pub(crate) fn booking_request(
    patient_id: PatientId,
    practitioner_id: PractitionerId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id,
        practitioner_id,
        start_utc: start,
        end_utc: end,
        notes: None,
    }
}

pub(crate) fn appointment(
    practitioner_id: PractitionerId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: AppointmentStatus,
) -> Appointment {
    Appointment::new(AppointmentDraft {
        id: AppointmentId::random(),
        patient_id: PatientId::random(),
        practitioner_id,
        start_utc: start,
        end_utc: end,
        status,
        notes: None,
        created_at_utc: monday_at(7, 0),
    })
    .expect("valid appointment")
}
