use thiserror::Error;

/// Reasons a configuration is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("incident_count must be at least 1 (got {0})")]
    IncidentCount(u32),
    #[error("station_count must be at least 1 (got {0})")]
    StationCount(u32),
    #[error("units_per_incident_min must be at least 1 (got {0})")]
    UnitsMin(u32),
    #[error("units_per_incident_max must be >= units_per_incident_min (got max {max}, min {min})")]
    UnitsMax { min: u32, max: u32 },
    #[error("{field} must be between 0 and 1 (got {value})")]
    Probability { field: &'static str, value: f64 },
    #[error("geohash_precision must be between 3 and 12 (got {0})")]
    GeohashPrecision(u8),
    #[error("window_days must be at least 1 and start within the calendar range (got {0})")]
    WindowDays(u32),
    #[error("output_format must be either 'csv' or 'parquet' (got '{0}')")]
    OutputFormat(String),
}

/// Convenience alias for configuration results.
pub type Result<T> = std::result::Result<T, ConfigError>;
