use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const DEFAULT_INCIDENT_COUNT: u32 = 10_000;
pub const DEFAULT_STATION_COUNT: u32 = 25;
pub const DEFAULT_UNITS_MIN: u32 = 1;
pub const DEFAULT_UNITS_MAX: u32 = 3;
pub const DEFAULT_ASSETS_PROBABILITY: f64 = 0.35;
pub const DEFAULT_NOTES_PROBABILITY: f64 = 0.55;
pub const DEFAULT_WINDOW_DAYS: u32 = 90;
pub const DEFAULT_GEOHASH_PRECISION: u8 = 8;
pub const GEOHASH_PRECISION_RANGE: std::ops::RangeInclusive<u8> = 3..=12;

/// File format used by the persistence adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(ConfigError::OutputFormat(value.to_string())),
        }
    }
}

/// Mutable staging area for a [`SyntheticDataConfig`].
///
/// Every field starts at its documented default; `build` checks the
/// combination and freezes it.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    pub output_dir: PathBuf,
    pub incident_count: u32,
    pub station_count: u32,
    pub units_per_incident_min: u32,
    pub units_per_incident_max: u32,
    pub assets_probability: f64,
    pub notes_probability: f64,
    /// `None` seeds from OS entropy and the run is not reproducible.
    pub rng_seed: Option<u64>,
    pub window_days: u32,
    /// End of the occurrence window.
    pub window_end: DateTime<Utc>,
    pub include_units: bool,
    pub include_assets: bool,
    pub include_notes: bool,
    pub geohash_precision: u8,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data/generated"),
            incident_count: DEFAULT_INCIDENT_COUNT,
            station_count: DEFAULT_STATION_COUNT,
            units_per_incident_min: DEFAULT_UNITS_MIN,
            units_per_incident_max: DEFAULT_UNITS_MAX,
            assets_probability: DEFAULT_ASSETS_PROBABILITY,
            notes_probability: DEFAULT_NOTES_PROBABILITY,
            rng_seed: None,
            window_days: DEFAULT_WINDOW_DAYS,
            window_end: Utc::now(),
            include_units: true,
            include_assets: true,
            include_notes: true,
            geohash_precision: DEFAULT_GEOHASH_PRECISION,
            output_format: OutputFormat::Csv,
            verbose: true,
        }
    }
}

impl ConfigBuilder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Validate the staged values and produce an immutable configuration.
    pub fn build(self) -> Result<SyntheticDataConfig> {
        if self.incident_count < 1 {
            return Err(ConfigError::IncidentCount(self.incident_count));
        }
        if self.station_count < 1 {
            return Err(ConfigError::StationCount(self.station_count));
        }
        if self.units_per_incident_min < 1 {
            return Err(ConfigError::UnitsMin(self.units_per_incident_min));
        }
        if self.units_per_incident_max < self.units_per_incident_min {
            return Err(ConfigError::UnitsMax {
                min: self.units_per_incident_min,
                max: self.units_per_incident_max,
            });
        }
        check_probability("assets_probability", self.assets_probability)?;
        check_probability("notes_probability", self.notes_probability)?;
        if !GEOHASH_PRECISION_RANGE.contains(&self.geohash_precision) {
            return Err(ConfigError::GeohashPrecision(self.geohash_precision));
        }
        if self.window_days < 1 || self.window_start().is_none() || self.window_slack().is_none()
        {
            return Err(ConfigError::WindowDays(self.window_days));
        }

        Ok(SyntheticDataConfig { inner: self })
    }
}

impl ConfigBuilder {
    fn window_start(&self) -> Option<DateTime<Utc>> {
        TimeDelta::try_days(i64::from(self.window_days))
            .and_then(|span| self.window_end.checked_sub_signed(span))
    }

    /// Event chains run up to a few hours past the window end.
    fn window_slack(&self) -> Option<DateTime<Utc>> {
        self.window_end.checked_add_signed(TimeDelta::days(1))
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<()> {
    // NaN fails the range check as well.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

/// Validated, immutable generation settings.
#[derive(Debug, Clone)]
pub struct SyntheticDataConfig {
    inner: ConfigBuilder,
}

impl SyntheticDataConfig {
    pub fn builder(output_dir: impl Into<PathBuf>) -> ConfigBuilder {
        ConfigBuilder::new(output_dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.inner.output_dir
    }

    pub fn incident_count(&self) -> u32 {
        self.inner.incident_count
    }

    pub fn station_count(&self) -> u32 {
        self.inner.station_count
    }

    pub fn units_per_incident_min(&self) -> u32 {
        self.inner.units_per_incident_min
    }

    pub fn units_per_incident_max(&self) -> u32 {
        self.inner.units_per_incident_max
    }

    pub fn assets_probability(&self) -> f64 {
        self.inner.assets_probability
    }

    pub fn notes_probability(&self) -> f64 {
        self.inner.notes_probability
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.inner.rng_seed
    }

    pub fn window_days(&self) -> u32 {
        self.inner.window_days
    }

    pub fn window_end(&self) -> DateTime<Utc> {
        self.inner.window_end
    }

    pub fn include_units(&self) -> bool {
        self.inner.include_units
    }

    pub fn include_assets(&self) -> bool {
        self.inner.include_assets
    }

    pub fn include_notes(&self) -> bool {
        self.inner.include_notes
    }

    pub fn geohash_precision(&self) -> u8 {
        self.inner.geohash_precision
    }

    pub fn output_format(&self) -> OutputFormat {
        self.inner.output_format
    }

    pub fn verbose(&self) -> bool {
        self.inner.verbose
    }

    /// Copy the settings back into a builder, e.g. to derive a variant.
    pub fn to_builder(&self) -> ConfigBuilder {
        self.inner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ConfigBuilder::new("out").build().expect("defaults build");
        assert_eq!(config.incident_count(), DEFAULT_INCIDENT_COUNT);
        assert_eq!(config.output_format(), OutputFormat::Csv);
        assert!(config.rng_seed().is_none());
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!(" Parquet ".parse::<OutputFormat>(), Ok(OutputFormat::Parquet));
        assert_eq!(
            "xlsx".parse::<OutputFormat>(),
            Err(ConfigError::OutputFormat("xlsx".to_string()))
        );
    }

    #[test]
    fn nan_probability_is_rejected() {
        let mut builder = ConfigBuilder::new("out");
        builder.notes_probability = f64::NAN;
        let err = builder.build().expect_err("nan must fail");
        assert!(matches!(
            err,
            ConfigError::Probability {
                field: "notes_probability",
                ..
            }
        ));
    }
}
