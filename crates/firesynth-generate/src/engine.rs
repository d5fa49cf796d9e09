use std::time::Instant;

use tracing::{info, warn};

use firesynth_core::{Entity, GeneratedDataset, SyntheticDataConfig};

use crate::checks::check_dataset;
use crate::errors::GenerationError;
use crate::generators::{IncidentGenerator, generate_stations};
use crate::model::{EntityReport, GenerationReport};
use crate::output::{PersistedFile, persist_dataset};
use crate::random::RandomSource;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub dataset: GeneratedDataset,
    pub files: Vec<PersistedFile>,
    pub report: GenerationReport,
}

/// Entry point for generating and persisting a synthetic dataset.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    config: SyntheticDataConfig,
    verify: bool,
}

impl GenerationEngine {
    pub fn new(config: SyntheticDataConfig) -> Self {
        Self {
            config,
            verify: false,
        }
    }

    /// Run integrity checks between generation and persistence; a failing
    /// dataset is never written.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn config(&self) -> &SyntheticDataConfig {
        &self.config
    }

    /// Build the dataset in memory: stations first, then incidents.
    pub fn generate(&self) -> Result<GeneratedDataset, GenerationError> {
        let config = &self.config;
        let mut rng = RandomSource::new(config.rng_seed());

        let stations = generate_stations(config.station_count(), config.window_end(), &mut rng);
        let batch = IncidentGenerator::new(config, &stations)?.generate(&mut rng)?;

        Ok(GeneratedDataset {
            stations,
            incidents: batch.incidents,
            incident_units: batch.units,
            incident_assets: batch.assets,
            incident_notes: batch.notes,
        })
    }

    /// Generate, then write every enabled collection to the output directory.
    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(
            run_id.clone(),
            self.config.rng_seed(),
            self.config.output_format(),
        );

        info!(
            run_id = %run_id,
            incidents = self.config.incident_count(),
            stations = self.config.station_count(),
            seed = ?self.config.rng_seed(),
            format = %self.config.output_format(),
            "generation started"
        );
        if self.config.rng_seed().is_none() {
            warn!(run_id = %run_id, "no seed configured; output is not reproducible");
        }

        let outcome = self.generate().and_then(|dataset| {
            self.verify_dataset(&dataset)?;
            let files = persist_dataset(&dataset, &self.config)?;
            Ok((dataset, files))
        });
        let (dataset, files) = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(run_id = %run_id, error = %err, "generation failed");
                return Err(err);
            }
        };

        report.tables = Entity::ALL
            .into_iter()
            .map(|entity| {
                let file = files.iter().find(|file| file.entity == entity);
                EntityReport {
                    entity,
                    rows: row_count(&dataset, entity),
                    path: file.map(|file| file.path.clone()),
                    bytes: file.map(|file| file.bytes),
                }
            })
            .collect();
        report.bytes_written = files.iter().map(|file| file.bytes).sum();
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            files = files.len(),
            incidents = dataset.incidents.len(),
            units = dataset.incident_units.len(),
            assets = dataset.incident_assets.len(),
            notes = dataset.incident_notes.len(),
            duration_ms = report.duration_ms,
            bytes_written = report.bytes_written,
            "generation completed"
        );

        Ok(GenerationResult {
            dataset,
            files,
            report,
        })
    }
}

impl GenerationEngine {
    fn verify_dataset(&self, dataset: &GeneratedDataset) -> Result<(), GenerationError> {
        if !self.verify {
            return Ok(());
        }
        let report = check_dataset(dataset, &self.config);
        if !report.is_ok() {
            return Err(GenerationError::Integrity(report));
        }
        info!(checked = ?report.checked, "integrity checks passed");
        Ok(())
    }
}

/// Generate a dataset without persisting it.
pub fn generate_dataset(config: &SyntheticDataConfig) -> Result<GeneratedDataset, GenerationError> {
    GenerationEngine::new(config.clone()).generate()
}

fn row_count(dataset: &GeneratedDataset, entity: Entity) -> u64 {
    let rows = match entity {
        Entity::Stations => dataset.stations.len(),
        Entity::Incidents => dataset.incidents.len(),
        Entity::IncidentUnits => dataset.incident_units.len(),
        Entity::IncidentAssets => dataset.incident_assets.len(),
        Entity::IncidentNotes => dataset.incident_notes.len(),
    };
    rows as u64
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use firesynth_core::ConfigBuilder;

    use super::*;

    fn builder() -> ConfigBuilder {
        let mut builder = ConfigBuilder::new("unused");
        builder.incident_count = 40;
        builder.station_count = 4;
        builder.rng_seed = Some(42);
        builder.window_end = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        builder.verbose = false;
        builder
    }

    #[test]
    fn seeded_generation_is_repeatable() {
        let config = builder().build().expect("config");
        let first = generate_dataset(&config).expect("first");
        let second = generate_dataset(&config).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn disabled_children_stay_empty() {
        let mut builder = builder();
        builder.include_units = false;
        builder.include_assets = false;
        builder.include_notes = false;
        let dataset = generate_dataset(&builder.build().expect("config")).expect("generate");
        assert_eq!(dataset.incidents.len(), 40);
        assert!(dataset.incident_units.is_empty());
        assert!(dataset.incident_assets.is_empty());
        assert!(dataset.incident_notes.is_empty());
    }

    #[test]
    fn disabling_a_child_leaves_earlier_draws_untouched() {
        let full = generate_dataset(&builder().build().expect("config")).expect("full");
        let mut builder = builder();
        builder.include_notes = false;
        let partial = generate_dataset(&builder.build().expect("config")).expect("partial");
        assert_eq!(full.stations, partial.stations);
        assert_eq!(full.incidents.first(), partial.incidents.first());
    }

    #[test]
    fn run_reports_every_entity() {
        let dir = std::env::temp_dir().join(format!("firesynth_engine_{}", uuid::Uuid::new_v4()));
        let mut builder = builder();
        builder.output_dir = dir.clone();
        builder.include_assets = false;
        let result = GenerationEngine::new(builder.build().expect("config"))
            .run()
            .expect("run");

        assert_eq!(result.files.len(), 4);
        assert_eq!(result.report.tables.len(), 5);
        let assets = result
            .report
            .table(Entity::IncidentAssets)
            .expect("assets entry");
        assert_eq!(assets.rows, 0);
        assert!(assets.path.is_none());
        assert_eq!(result.report.seed, Some(42));
        assert!(dir.join("incidents.csv").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn verified_run_writes_clean_dataset() {
        let dir = std::env::temp_dir().join(format!("firesynth_engine_{}", uuid::Uuid::new_v4()));
        let mut builder = builder();
        builder.output_dir = dir.clone();
        let result = GenerationEngine::new(builder.build().expect("config"))
            .with_verification(true)
            .run()
            .expect("verified run");
        assert_eq!(result.files.len(), 5);

        std::fs::remove_dir_all(&dir).ok();
    }
}
