//! In-process adapters.
//!
//! Used when no database is configured and by tests that exercise the
//! services end to end without PostgreSQL.

mod clinic_store;

pub use clinic_store::InMemoryClinicStore;
