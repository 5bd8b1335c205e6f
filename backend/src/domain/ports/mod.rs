//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`ClinicDirectory`, `AppointmentRepository`,
//! `RequestThrottle`) are implemented by outbound adapters. Driving ports
//! (`AppointmentCommand`, `AvailabilityQuery`) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod appointment_command;
mod appointment_repository;
mod availability_query;
mod clinic_directory;
mod request_throttle;

#[cfg(test)]
pub use appointment_command::MockAppointmentCommand;
pub use appointment_command::{AppointmentCommand, CreateAppointmentRequest};
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentRepository, AppointmentRepositoryError};
#[cfg(test)]
pub use availability_query::MockAvailabilityQuery;
pub use availability_query::{AvailabilityQuery, AvailabilityRequest, PractitionerAvailability};
#[cfg(test)]
pub use clinic_directory::MockClinicDirectory;
pub use clinic_directory::{ClinicDirectory, ClinicDirectoryError};
#[cfg(test)]
pub use request_throttle::MockRequestThrottle;
pub use request_throttle::{
    RequestThrottle, ThrottleDecision, ThrottlePolicy, ThrottleRule, ThrottleRuleError,
    ThrottleScope, UnlimitedThrottle,
};
