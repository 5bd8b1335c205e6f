//! HTTP inbound adapter exposing REST endpoints.

pub mod appointments;
pub mod availability;
pub mod error;
pub mod health;
pub mod state;
mod throttle;

pub use error::ApiResult;
