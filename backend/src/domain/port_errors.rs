//! Translation of driven-port failures into domain errors.

use tracing::{debug, error};

use crate::domain::Error;
use crate::domain::ports::{AppointmentRepositoryError, ClinicDirectoryError};

pub(crate) fn map_directory_error(err: ClinicDirectoryError) -> Error {
    match err {
        ClinicDirectoryError::Connection { message } => {
            debug!(%message, "clinic directory unreachable");
            Error::service_unavailable("clinic directory unavailable")
        }
        ClinicDirectoryError::Query { message } => {
            error!(%message, "clinic directory query failed");
            Error::internal(format!("clinic directory error: {message}"))
        }
        ClinicDirectoryError::InvalidCalendar { message } => {
            Error::invalid_interval(format!("practitioner calendar is invalid: {message}"))
        }
    }
}

pub(crate) fn map_repository_error(err: AppointmentRepositoryError) -> Error {
    match err {
        AppointmentRepositoryError::Connection { message } => {
            debug!(%message, "appointment repository unreachable");
            Error::service_unavailable("appointment repository unavailable")
        }
        AppointmentRepositoryError::Query { message } => {
            error!(%message, "appointment repository query failed");
            Error::internal(format!("appointment repository error: {message}"))
        }
        AppointmentRepositoryError::Overlap { message } => {
            Error::conflict(format!("appointment overlaps a scheduled booking: {message}"))
        }
    }
}
