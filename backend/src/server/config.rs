//! Startup settings and the HTTP server configuration built from them.

use std::net::SocketAddr;
use std::time::Duration;

use clinic_backend::domain::ports::{ThrottlePolicy, ThrottleRule, ThrottleRuleError};
use clinic_backend::domain::{TimeZonePolicy, TimeZonePolicyParseError};
use clinic_backend::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_WRITE_LIMIT: u32 = 10;
const DEFAULT_READ_LIMIT: u32 = 60;
const DEFAULT_THROTTLE_WINDOW_SECS: u64 = 60;

/// Settings read from `CLINIC_*` environment variables and flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLINIC")]
pub struct ClinicSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the service runs on the in-memory store.
    pub database_url: Option<String>,
    /// `strict` or `fallback-utc`.
    pub time_zone_policy: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Appointment writes admitted per client and window.
    pub write_limit: Option<u32>,
    /// Other requests admitted per client and window.
    pub read_limit: Option<u32>,
    /// Throttle window length in seconds.
    pub throttle_window_secs: Option<u64>,
}

/// Settings that parse but do not make sense.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}")]
    BindAddr { value: String },
    #[error(transparent)]
    TimeZonePolicy(#[from] TimeZonePolicyParseError),
    #[error("invalid throttle settings: {0}")]
    Throttle(#[from] ThrottleRuleError),
}

impl From<SettingsError> for std::io::Error {
    fn from(error: SettingsError) -> Self {
        std::io::Error::other(error.to_string())
    }
}

impl ClinicSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|_| SettingsError::BindAddr {
            value: value.to_owned(),
        })
    }

    pub fn time_zone_policy(&self) -> Result<TimeZonePolicy, SettingsError> {
        match self.time_zone_policy.as_deref() {
            Some(value) => Ok(value.parse()?),
            None => Ok(TimeZonePolicy::default()),
        }
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn throttle_policy(&self) -> Result<ThrottlePolicy, SettingsError> {
        let window = Duration::from_secs(
            self.throttle_window_secs
                .unwrap_or(DEFAULT_THROTTLE_WINDOW_SECS),
        );
        Ok(ThrottlePolicy {
            appointment_writes: ThrottleRule::new(
                self.write_limit.unwrap_or(DEFAULT_WRITE_LIMIT),
                window,
            )?,
            general: ThrottleRule::new(self.read_limit.unwrap_or(DEFAULT_READ_LIMIT), window)?,
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) time_zone_policy: TimeZonePolicy,
    pub(crate) throttle_policy: ThrottlePolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        time_zone_policy: TimeZonePolicy,
        throttle_policy: ThrottlePolicy,
    ) -> Self {
        Self {
            bind_addr,
            time_zone_policy,
            throttle_policy,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; the Diesel adapters replace the
    /// in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
