//! Entity generators. Each one consumes the shared [`RandomSource`]
//! sequentially, so the call order below is fixed.
//!
//! [`RandomSource`]: crate::random::RandomSource

pub mod incidents;
pub mod stations;

pub use incidents::{IncidentBatch, IncidentGenerator};
pub use stations::generate_stations;
