//! Clinic booking backend library.
//!
//! Books practitioner time intervals without ever letting two scheduled
//! appointments overlap, and computes free slots inside each practitioner's
//! working calendar. The `domain` module is transport agnostic; `inbound`
//! and `outbound` hold the adapters at the edges of the hexagon.

pub mod domain;
pub mod inbound;
pub mod outbound;
