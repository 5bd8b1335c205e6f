//! Booking domain: entities, the slot calculator, the conflict guard and the
//! appointment lifecycle.
//!
//! Purpose: keep every booking rule transport and storage agnostic. Services
//! talk to the outside world only through `ports`.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: the single failure type returned by every
//!   operation.
//! - `WorkingCalendar`, `compute_availability`: pure slot generation.
//! - `ConflictGuard`: ordered booking pre-checks plus the overlap fast path.
//! - `AppointmentService`, `AvailabilityService`: driving-port
//!   implementations.

pub mod appointment;
pub mod appointment_service;
pub mod availability;
pub mod availability_service;
pub mod calendar;
pub mod clinic;
pub mod conflict_guard;
pub mod error;
pub mod ids;
pub mod interval;
mod port_errors;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::appointment::{
    Appointment, AppointmentDraft, AppointmentStatus, LifecycleAction, ParseStatusError,
    TransitionError, TransitionPlan,
};
pub use self::appointment_service::AppointmentService;
pub use self::availability::{AvailabilitySlot, compute_availability};
pub use self::availability_service::AvailabilityService;
pub use self::calendar::{
    CalendarValidationError, DateRangeError, LocalDateRange, LunchBreak, MAX_SLOT_MINUTES,
    MIN_SLOT_MINUTES, TimeZonePolicy, TimeZonePolicyParseError, WorkingCalendar,
    WorkingCalendarDraft, WorkingDays,
};
pub use self::clinic::{Patient, Practitioner};
pub use self::conflict_guard::ConflictGuard;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{AppointmentId, PatientId, PractitionerId};
pub use self::interval::{BusyRange, IntervalError, TimeInterval};

/// Result alias for inbound handlers.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use clinic_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such appointment"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
