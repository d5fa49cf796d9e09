use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;

/// Optional TOML defaults; any key a flag also sets is overridden by the flag.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub output_dir: Option<PathBuf>,
    pub incident_count: Option<u32>,
    pub station_count: Option<u32>,
    pub seed: Option<u64>,
    pub output_format: Option<String>,
    pub window_days: Option<u32>,
    /// RFC 3339 end of the occurrence window.
    pub start_datetime: Option<String>,
    pub include_units: Option<bool>,
    pub include_assets: Option<bool>,
    pub include_notes: Option<bool>,
    pub units_min: Option<u32>,
    pub units_max: Option<u32>,
    pub assets_probability: Option<f64>,
    pub notes_probability: Option<f64>,
    pub geohash_precision: Option<u8>,
    pub verbose: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents).map_err(|source| CliError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let file = ConfigFile::parse(
            r#"
            incident_count = 500
            seed = 42
            output_format = "parquet"
            include_notes = false
            assets_probability = 0.5
            "#,
        )
        .expect("parse");
        assert_eq!(file.incident_count, Some(500));
        assert_eq!(file.seed, Some(42));
        assert_eq!(file.output_format.as_deref(), Some("parquet"));
        assert_eq!(file.include_notes, Some(false));
        assert_eq!(file.assets_probability, Some(0.5));
        assert_eq!(file.station_count, None);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(ConfigFile::parse("incidents = 3").is_err());
    }

    #[test]
    fn empty_file_sets_nothing() {
        assert_eq!(ConfigFile::parse("").expect("parse"), ConfigFile::default());
    }
}
