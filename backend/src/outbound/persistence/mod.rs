//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the clinic ports backed by PostgreSQL via
//! `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Booking rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Store-level exclusion**: the `ex_appointments_no_overlap` constraint
//!   rejects overlapping scheduled rows, closing the race between the
//!   conflict pre-check and the insert.
//!
//! # Example
//!
//! ```ignore
//! use clinic_backend::domain::TimeZonePolicy;
//! use clinic_backend::outbound::persistence::{
//!     DbPool, DieselAppointmentRepository, DieselClinicDirectory, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clinic")).await?;
//! let directory = DieselClinicDirectory::new(pool.clone(), TimeZonePolicy::Strict);
//! let appointments = DieselAppointmentRepository::new(pool);
//! ```

mod diesel_appointment_repository;
mod diesel_basic_error_mapping;
mod diesel_clinic_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_clinic_directory::DieselClinicDirectory;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
