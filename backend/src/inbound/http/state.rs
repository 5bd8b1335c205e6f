//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AppointmentCommand, AvailabilityQuery, RequestThrottle};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub appointments: Arc<dyn AppointmentCommand>,
    pub availability: Arc<dyn AvailabilityQuery>,
    pub throttle: Arc<dyn RequestThrottle>,
}

impl HttpState {
    pub fn new(
        appointments: Arc<dyn AppointmentCommand>,
        availability: Arc<dyn AvailabilityQuery>,
        throttle: Arc<dyn RequestThrottle>,
    ) -> Self {
        Self {
            appointments,
            availability,
            throttle,
        }
    }
}
