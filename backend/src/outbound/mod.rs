//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed directory and appointment store
//!   using Diesel ORM
//! - **memory**: in-process store for database-less deployments and tests
//! - **throttle**: fixed-window request throttling
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod throttle;
