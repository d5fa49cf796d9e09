mod config_file;
mod logging;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::Parser;
use thiserror::Error;

use firesynth_core::{ConfigBuilder, ConfigError, OutputFormat, SyntheticDataConfig};
use firesynth_generate::{GenerationEngine, GenerationError};

use config_file::ConfigFile;
use logging::{LogFormat, init_logging};

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("logging init failed: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "firesynth",
    version,
    about = "Generate synthetic incidents, stations, and related datasets."
)]
struct Cli {
    /// Directory where output files will be written [default: data/generated].
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Number of incidents to generate [default: 10000].
    #[arg(long)]
    incident_count: Option<u32>,
    /// Number of stations to generate [default: 25].
    #[arg(long)]
    station_count: Option<u32>,
    /// Seed value for deterministic output.
    #[arg(long)]
    seed: Option<u64>,
    /// Output file format: csv or parquet [default: csv].
    #[arg(long, value_name = "FORMAT")]
    output_format: Option<String>,
    /// Interval (in days) to distribute incident timestamps [default: 90].
    #[arg(long)]
    window_days: Option<u32>,
    /// RFC 3339 timestamp marking the end of the window [default: now].
    #[arg(long, value_name = "DATETIME")]
    start_datetime: Option<String>,
    /// Generate incident_units records.
    #[arg(long, overrides_with = "no_include_units")]
    include_units: bool,
    #[arg(long, overrides_with = "include_units", hide = true)]
    no_include_units: bool,
    /// Generate incident_assets records.
    #[arg(long, overrides_with = "no_include_assets")]
    include_assets: bool,
    #[arg(long, overrides_with = "include_assets", hide = true)]
    no_include_assets: bool,
    /// Generate incident_notes records.
    #[arg(long, overrides_with = "no_include_notes")]
    include_notes: bool,
    #[arg(long, overrides_with = "include_notes", hide = true)]
    no_include_notes: bool,
    /// Minimum units dispatched per incident [default: 1].
    #[arg(long)]
    units_min: Option<u32>,
    /// Maximum units dispatched per incident [default: 3].
    #[arg(long)]
    units_max: Option<u32>,
    /// Probability an incident has assets, 0-1 [default: 0.35].
    #[arg(long)]
    assets_probability: Option<f64>,
    /// Probability an incident has notes, 0-1 [default: 0.55].
    #[arg(long)]
    notes_probability: Option<f64>,
    /// Geohash precision for incident locations, 3-12 [default: 8].
    #[arg(long)]
    geohash_precision: Option<u8>,
    /// Log generation progress.
    #[arg(long, overrides_with = "no_verbose")]
    verbose: bool,
    #[arg(long, overrides_with = "verbose", hide = true)]
    no_verbose: bool,
    /// TOML file with defaults for any of the options above.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Run integrity checks and refuse to write a failing dataset.
    #[arg(long)]
    verify: bool,
    /// Write the generation report as JSON to this path.
    #[arg(long, value_name = "FILE")]
    report_path: Option<PathBuf>,
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<(), CliError> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let config = resolve_config(&cli, &file)?;
    init_logging(cli.log_format, config.verbose())?;

    let engine = GenerationEngine::new(config.clone()).with_verification(cli.verify);
    let result = match engine.run() {
        Ok(result) => result,
        Err(GenerationError::Integrity(report)) => {
            for violation in &report.violations {
                tracing::warn!(
                    code = %violation.code,
                    path = %violation.path,
                    message = %violation.message,
                    "integrity violation"
                );
            }
            return Err(GenerationError::Integrity(report).into());
        }
        Err(err) => return Err(err.into()),
    };
    if let Some(path) = &cli.report_path {
        std::fs::write(path, serde_json::to_vec_pretty(&result.report)?)?;
        tracing::info!(path = %path.display(), "report written");
    }

    let out_dir = std::fs::canonicalize(config.output_dir())
        .unwrap_or_else(|_| config.output_dir().to_path_buf());
    println!("Generated {} files in {}", result.files.len(), out_dir.display());
    for file in &result.files {
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(" - {name}");
    }
    Ok(())
}

/// Flag, then config file, then built-in default.
fn resolve_config(cli: &Cli, file: &ConfigFile) -> Result<SyntheticDataConfig, CliError> {
    let mut builder = ConfigBuilder::default();

    if let Some(dir) = cli.output_dir.clone().or_else(|| file.output_dir.clone()) {
        builder.output_dir = dir;
    }
    if let Some(count) = cli.incident_count.or(file.incident_count) {
        builder.incident_count = count;
    }
    if let Some(count) = cli.station_count.or(file.station_count) {
        builder.station_count = count;
    }
    builder.rng_seed = cli.seed.or(file.seed);
    if let Some(format) = cli.output_format.as_deref().or(file.output_format.as_deref()) {
        builder.output_format = format.parse::<OutputFormat>()?;
    }
    if let Some(days) = cli.window_days.or(file.window_days) {
        builder.window_days = days;
    }
    if let Some(raw) = cli
        .start_datetime
        .as_deref()
        .or(file.start_datetime.as_deref())
    {
        builder.window_end = parse_window_end(raw)?;
    }
    if let Some(value) = toggle(cli.include_units, cli.no_include_units).or(file.include_units) {
        builder.include_units = value;
    }
    if let Some(value) = toggle(cli.include_assets, cli.no_include_assets).or(file.include_assets) {
        builder.include_assets = value;
    }
    if let Some(value) = toggle(cli.include_notes, cli.no_include_notes).or(file.include_notes) {
        builder.include_notes = value;
    }
    if let Some(min) = cli.units_min.or(file.units_min) {
        builder.units_per_incident_min = min;
    }
    if let Some(max) = cli.units_max.or(file.units_max) {
        builder.units_per_incident_max = max;
    }
    if let Some(probability) = cli.assets_probability.or(file.assets_probability) {
        builder.assets_probability = probability;
    }
    if let Some(probability) = cli.notes_probability.or(file.notes_probability) {
        builder.notes_probability = probability;
    }
    if let Some(precision) = cli.geohash_precision.or(file.geohash_precision) {
        builder.geohash_precision = precision;
    }
    if let Some(value) = toggle(cli.verbose, cli.no_verbose).or(file.verbose) {
        builder.verbose = value;
    }

    Ok(builder.build()?)
}

/// `--x` / `--no-x` pair; the last one given wins via `overrides_with`.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC.
fn parse_window_end(raw: &str) -> Result<DateTime<Utc>, CliError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            CliError::InvalidArgument(format!(
                "start datetime '{raw}' is not an RFC 3339 timestamp"
            ))
        })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("firesynth").chain(args.iter().copied()))
            .expect("parse args")
    }

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let config = resolve_config(&parse(&[]), &ConfigFile::default()).expect("config");
        assert_eq!(config.output_dir(), std::path::Path::new("data/generated"));
        assert_eq!(config.incident_count(), 10_000);
        assert_eq!(config.station_count(), 25);
        assert_eq!(config.rng_seed(), None);
        assert!(config.include_units() && config.include_assets() && config.include_notes());
        assert!(config.verbose());
    }

    #[test]
    fn flags_override_file_values() {
        let file = ConfigFile {
            incident_count: Some(500),
            station_count: Some(4),
            seed: Some(7),
            include_notes: Some(false),
            ..ConfigFile::default()
        };
        let cli = parse(&["--incident-count", "20", "--include-notes", "--seed", "9"]);
        let config = resolve_config(&cli, &file).expect("config");
        assert_eq!(config.incident_count(), 20);
        assert_eq!(config.station_count(), 4);
        assert_eq!(config.rng_seed(), Some(9));
        assert!(config.include_notes());
    }

    #[test]
    fn negated_flags_disable_children() {
        let cli = parse(&["--no-include-units", "--no-include-assets", "--no-verbose"]);
        let config = resolve_config(&cli, &ConfigFile::default()).expect("config");
        assert!(!config.include_units());
        assert!(!config.include_assets());
        assert!(config.include_notes());
        assert!(!config.verbose());
    }

    #[test]
    fn last_toggle_wins() {
        let cli = parse(&["--include-units", "--no-include-units"]);
        assert_eq!(toggle(cli.include_units, cli.no_include_units), Some(false));
        let cli = parse(&["--no-include-units", "--include-units"]);
        assert_eq!(toggle(cli.include_units, cli.no_include_units), Some(true));
    }

    #[test]
    fn invalid_values_surface_config_errors() {
        let cli = parse(&["--units-min", "3", "--units-max", "2"]);
        assert!(matches!(
            resolve_config(&cli, &ConfigFile::default()),
            Err(CliError::Config(ConfigError::UnitsMax { min: 3, max: 2 }))
        ));
        let cli = parse(&["--output-format", "xlsx"]);
        assert!(matches!(
            resolve_config(&cli, &ConfigFile::default()),
            Err(CliError::Config(ConfigError::OutputFormat(_)))
        ));
    }

    #[test]
    fn window_end_accepts_rfc3339_and_naive() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_window_end("2024-03-01T12:00:00Z").expect("rfc3339"), expected);
        assert_eq!(
            parse_window_end("2024-03-01T14:00:00+02:00").expect("offset"),
            expected
        );
        assert_eq!(parse_window_end("2024-03-01T12:00:00").expect("naive"), expected);
        assert!(matches!(
            parse_window_end("yesterday"),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
