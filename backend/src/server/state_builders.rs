//! Builders wiring domain services to the configured adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use clinic_backend::domain::ports::{AppointmentRepository, ClinicDirectory, RequestThrottle};
use clinic_backend::domain::{AppointmentService, AvailabilityService};
use clinic_backend::inbound::http::state::HttpState;
use clinic_backend::outbound::memory::InMemoryClinicStore;
use clinic_backend::outbound::persistence::{DieselAppointmentRepository, DieselClinicDirectory};
use clinic_backend::outbound::throttle::FixedWindowThrottle;

use super::ServerConfig;

/// Build the command and query services over one directory and one
/// appointment store.
fn build_services<D, R>(
    directory: Arc<D>,
    appointments: Arc<R>,
    clock: Arc<dyn Clock>,
    throttle: Arc<dyn RequestThrottle>,
) -> HttpState
where
    D: ClinicDirectory + 'static,
    R: AppointmentRepository + 'static,
{
    let commands = AppointmentService::new(Arc::clone(&directory), Arc::clone(&appointments), clock);
    let queries = AvailabilityService::new(directory, appointments);
    HttpState::new(Arc::new(commands), Arc::new(queries), throttle)
}

/// Build handler state: Diesel adapters when a pool is configured,
/// otherwise the in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let throttle: Arc<dyn RequestThrottle> =
        Arc::new(FixedWindowThrottle::new(config.throttle_policy));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let state = match &config.db_pool {
        Some(pool) => {
            info!(policy = ?config.time_zone_policy, "using PostgreSQL clinic store");
            build_services(
                Arc::new(DieselClinicDirectory::new(
                    pool.clone(),
                    config.time_zone_policy,
                )),
                Arc::new(DieselAppointmentRepository::new(pool.clone())),
                clock,
                throttle,
            )
        }
        None => {
            warn!("no database configured; using an empty in-memory clinic store");
            let store = Arc::new(InMemoryClinicStore::new());
            build_services(Arc::clone(&store), store, clock, throttle)
        }
    };
    web::Data::new(state)
}
