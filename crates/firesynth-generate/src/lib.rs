//! Seeded synthetic emergency-response dataset generation.
//!
//! One [`RandomSource`](random::RandomSource) drives every draw: stations are
//! generated first, then incidents with their units, assets and notes. The
//! resulting [`GeneratedDataset`](firesynth_core::GeneratedDataset) is written
//! as one CSV (or, with the `parquet` feature, Parquet) file per entity.

pub mod checks;
pub mod engine;
pub mod errors;
pub mod faker;
pub mod generators;
pub mod geo;
pub mod model;
pub mod output;
pub mod random;

pub use checks::{IntegrityReport, Violation, check_dataset};
pub use engine::{GenerationEngine, GenerationResult, generate_dataset};
pub use errors::GenerationError;
pub use model::{EntityReport, GenerationReport};
pub use output::{PersistedFile, TableWriter, persist_dataset, writer_for};
pub use random::RandomSource;
