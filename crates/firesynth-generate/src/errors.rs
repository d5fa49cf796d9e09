use firesynth_core::ConfigError;
use thiserror::Error;

use crate::checks::IntegrityReport;

/// Errors emitted by the generation engine and the persistence adapter.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(
        "{format} output requires the optional '{capability}' capability, which this build does not include; {hint}"
    )]
    FormatUnavailable {
        format: &'static str,
        capability: &'static str,
        hint: &'static str,
    },
    #[error("geohash error: {0}")]
    Geohash(#[from] geohash::GeohashError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[cfg(feature = "parquet")]
    #[error("parquet error: {0}")]
    Parquet(#[from] polars::prelude::PolarsError),
    #[error("dataset failed integrity checks ({} violations)", .0.violations.len())]
    Integrity(IntegrityReport),
}
