use std::path::PathBuf;

use serde::Serialize;

use firesynth_core::{Entity, OutputFormat};

/// Row count of one generated collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    pub entity: Entity,
    pub rows: u64,
    /// Set once the collection has been persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: String,
    /// `None` when the run drew its seed from OS entropy.
    pub seed: Option<u64>,
    pub output_format: OutputFormat,
    pub tables: Vec<EntityReport>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: Option<u64>, output_format: OutputFormat) -> Self {
        Self {
            run_id,
            seed,
            output_format,
            tables: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn table(&self, entity: Entity) -> Option<&EntityReport> {
        self.tables.iter().find(|table| table.entity == entity)
    }
}
