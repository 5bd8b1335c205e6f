//! Backend entry-point: loads settings, prepares storage and serves the
//! booking API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clinic_backend::inbound::http::health::HealthState;
use clinic_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ClinicSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ClinicSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(
        bind_addr,
        settings.time_zone_policy()?,
        settings.throttle_policy()?,
    );

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
        )
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "clinic backend listening");
    server.await
}
