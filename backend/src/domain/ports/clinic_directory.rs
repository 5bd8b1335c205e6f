//! Port for resolving patients and practitioners.

use async_trait::async_trait;

use crate::domain::{Patient, PatientId, Practitioner, PractitionerId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by clinic directory adapters.
    pub enum ClinicDirectoryError {
        /// Directory store could not be reached.
        Connection { message: String } =>
            "clinic directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "clinic directory query failed: {message}",
        /// A stored working calendar failed validation.
        InvalidCalendar { message: String } =>
            "practitioner calendar is invalid: {message}",
    }
}

/// Read access to the people a booking references.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClinicDirectory: Send + Sync {
    /// Find a patient by id.
    async fn find_patient(&self, id: &PatientId) -> Result<Option<Patient>, ClinicDirectoryError>;

    /// Find a practitioner, with their working calendar, by id.
    async fn find_practitioner(
        &self,
        id: &PractitionerId,
    ) -> Result<Option<Practitioner>, ClinicDirectoryError>;
}
