//! Shared Diesel and pool error classification for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Name of the exclusion constraint that forbids overlapping scheduled
/// appointments for one practitioner.
pub(crate) const NO_OVERLAP_CONSTRAINT: &str = "ex_appointments_no_overlap";

/// Map a pool failure onto a repository's connection error.
pub(crate) fn map_basic_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure onto a repository's query or connection error.
///
/// Driver details are logged at debug level and never leave the adapter.
pub(crate) fn map_basic_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::DeserializationError(_) => query("stored row could not be decoded"),
        _ => query("database error"),
    }
}

/// Whether `error` is a violation of the no-overlap exclusion constraint.
///
/// PostgreSQL reports exclusion violations as SQLSTATE 23P01, which Diesel
/// does not classify, so the constraint name is checked first and the
/// server message second.
pub(crate) fn is_overlap_violation(error: &DieselError) -> bool {
    let DieselError::DatabaseError(_, info) = error else {
        return false;
    };
    info.constraint_name() == Some(NO_OVERLAP_CONSTRAINT)
        || info.message().contains(NO_OVERLAP_CONSTRAINT)
        || info.message().contains("exclusion constraint")
}
