//! Appointment aggregate and its status state machine.
//!
//! Appointments start `Scheduled` and may move once to a terminal state:
//! `Cancelled` or `Completed`. Repeating the transition that produced the
//! current terminal state is a no-op; crossing between terminal states is
//! refused.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::{AppointmentId, PatientId, PractitionerId};
use super::interval::{BusyRange, IntervalError, TimeInterval};

/// Booking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether no further transition can leave this status.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown appointment status `{0}`")]
pub struct ParseStatusError(String);

impl FromStr for AppointmentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// Transition requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    Cancel,
    Complete,
}

impl LifecycleAction {
    /// Status this action moves a scheduled appointment into.
    pub const fn target(self) -> AppointmentStatus {
        match self {
            Self::Cancel => AppointmentStatus::Cancelled,
            Self::Complete => AppointmentStatus::Completed,
        }
    }

    /// Verb used in log lines and messages.
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Complete => "complete",
        }
    }
}

/// The state machine refused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {} an appointment that is {from}", .action.verb())]
pub struct TransitionError {
    pub from: AppointmentStatus,
    pub action: LifecycleAction,
}

/// Outcome of evaluating an action against the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Write the new status.
    Apply(AppointmentStatus),
    /// Already in the target status; return the record unchanged.
    AlreadyDone,
}

impl AppointmentStatus {
    /// Decide what `action` does from this status.
    ///
    /// # Examples
    /// ```
    /// use clinic_backend::domain::{AppointmentStatus, LifecycleAction, TransitionPlan};
    ///
    /// let plan = AppointmentStatus::Scheduled.plan(LifecycleAction::Cancel).unwrap();
    /// assert_eq!(plan, TransitionPlan::Apply(AppointmentStatus::Cancelled));
    /// assert!(AppointmentStatus::Completed.plan(LifecycleAction::Cancel).is_err());
    /// ```
    pub fn plan(self, action: LifecycleAction) -> Result<TransitionPlan, TransitionError> {
        let target = action.target();
        match self {
            Self::Scheduled => Ok(TransitionPlan::Apply(target)),
            current if current == target => Ok(TransitionPlan::AlreadyDone),
            from => Err(TransitionError { from, action }),
        }
    }
}

/// Unvalidated appointment fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub practitioner_id: PractitionerId,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}

/// A booked interval of a practitioner's time.
///
/// ## Invariants
/// - `end_utc > start_utc`, enforced through [`TimeInterval`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    id: AppointmentId,
    patient_id: PatientId,
    practitioner_id: PractitionerId,
    #[serde(flatten)]
    interval: TimeInterval,
    status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    created_at_utc: DateTime<Utc>,
}

impl Appointment {
    /// Validate a draft into an appointment.
    pub fn new(draft: AppointmentDraft) -> Result<Self, IntervalError> {
        let AppointmentDraft {
            id,
            patient_id,
            practitioner_id,
            start_utc,
            end_utc,
            status,
            notes,
            created_at_utc,
        } = draft;
        let interval = TimeInterval::new(start_utc, end_utc)?;
        Ok(Self {
            id,
            patient_id,
            practitioner_id,
            interval,
            status,
            notes,
            created_at_utc,
        })
    }

    /// Appointment identifier.
    pub const fn id(&self) -> AppointmentId {
        self.id
    }

    /// Patient the appointment is booked for.
    pub const fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    /// Practitioner seeing the patient.
    pub const fn practitioner_id(&self) -> PractitionerId {
        self.practitioner_id
    }

    /// Booked UTC interval.
    pub const fn interval(&self) -> &TimeInterval {
        &self.interval
    }

    /// Start instant.
    pub const fn start_utc(&self) -> DateTime<Utc> {
        self.interval.start()
    }

    /// End instant, exclusive.
    pub const fn end_utc(&self) -> DateTime<Utc> {
        self.interval.end()
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> AppointmentStatus {
        self.status
    }

    /// Free-text notes, if any.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// When the booking was recorded.
    pub const fn created_at_utc(&self) -> DateTime<Utc> {
        self.created_at_utc
    }

    /// Copy of the appointment carrying `status`.
    #[must_use]
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Busy range occupied by this appointment while it is scheduled.
    pub fn busy_range(&self) -> Option<BusyRange> {
        (self.status == AppointmentStatus::Scheduled).then(|| BusyRange::new(self.interval))
    }
}
