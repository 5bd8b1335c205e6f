//! Patients and practitioners referenced by bookings.

use serde::Serialize;

use super::calendar::WorkingCalendar;
use super::ids::{PatientId, PractitionerId};

/// A patient who may hold appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    id: PatientId,
    full_name: String,
    email: Option<String>,
    phone: Option<String>,
}

impl Patient {
    pub fn new(
        id: PatientId,
        full_name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email,
            phone,
        }
    }

    pub const fn id(&self) -> PatientId {
        self.id
    }

    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

/// A practitioner whose time is booked.
///
/// Inactive practitioners keep their history but accept no new bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Practitioner {
    id: PractitionerId,
    full_name: String,
    specialty: Option<String>,
    is_active: bool,
    calendar: WorkingCalendar,
}

impl Practitioner {
    pub fn new(
        id: PractitionerId,
        full_name: impl Into<String>,
        specialty: Option<String>,
        is_active: bool,
        calendar: WorkingCalendar,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            specialty,
            is_active,
            calendar,
        }
    }

    pub const fn id(&self) -> PractitionerId {
        self.id
    }

    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    pub fn specialty(&self) -> Option<&str> {
        self.specialty.as_deref()
    }

    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    pub const fn calendar(&self) -> &WorkingCalendar {
        &self.calendar
    }
}
