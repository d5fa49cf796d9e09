//! Persistence of a generated dataset, one file per entity.

pub mod csv;
#[cfg(feature = "parquet")]
pub mod parquet;
pub mod rows;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use firesynth_core::{ColumnSpec, Entity, GeneratedDataset, OutputFormat, SyntheticDataConfig};

use crate::errors::GenerationError;
use crate::output::rows::{CellValue, ToRow, rows_of};

/// A file written by [`persist_dataset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedFile {
    pub entity: Entity,
    pub path: PathBuf,
    pub rows: u64,
    pub bytes: u64,
}

/// Serializes one table in a concrete file format.
pub trait TableWriter {
    fn format(&self) -> OutputFormat;

    /// Write `rows` (already in `columns` order) to `path`; returns bytes written.
    fn write_table(
        &self,
        path: &Path,
        columns: &[ColumnSpec],
        rows: &[Vec<CellValue>],
    ) -> Result<u64, GenerationError>;
}

pub struct CsvTableWriter;

impl TableWriter for CsvTableWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write_table(
        &self,
        path: &Path,
        columns: &[ColumnSpec],
        rows: &[Vec<CellValue>],
    ) -> Result<u64, GenerationError> {
        Ok(csv::write_table_csv(path, columns, rows)?)
    }
}

#[cfg(feature = "parquet")]
pub struct ParquetTableWriter;

#[cfg(feature = "parquet")]
impl TableWriter for ParquetTableWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Parquet
    }

    fn write_table(
        &self,
        path: &Path,
        columns: &[ColumnSpec],
        rows: &[Vec<CellValue>],
    ) -> Result<u64, GenerationError> {
        parquet::write_table_parquet(path, columns, rows)
    }
}

/// Writer for `format`, or `FormatUnavailable` when this build lacks it.
pub fn writer_for(format: OutputFormat) -> Result<Box<dyn TableWriter>, GenerationError> {
    match format {
        OutputFormat::Csv => Ok(Box::new(CsvTableWriter)),
        #[cfg(feature = "parquet")]
        OutputFormat::Parquet => Ok(Box::new(ParquetTableWriter)),
        #[cfg(not(feature = "parquet"))]
        OutputFormat::Parquet => Err(GenerationError::FormatUnavailable {
            format: "parquet",
            capability: "parquet",
            hint: "rebuild with `--features parquet` or use `--output-format csv`",
        }),
    }
}

/// Write every produced collection under the configured output directory.
///
/// Stations and incidents are always written; child collections only when
/// enabled. Nothing is written when the format is unavailable.
pub fn persist_dataset(
    dataset: &GeneratedDataset,
    config: &SyntheticDataConfig,
) -> Result<Vec<PersistedFile>, GenerationError> {
    let writer = writer_for(config.output_format())?;
    let out_dir = config.output_dir();
    std::fs::create_dir_all(out_dir)?;

    let mut files = Vec::new();
    files.push(write_entity(writer.as_ref(), out_dir, &dataset.stations)?);
    files.push(write_entity(writer.as_ref(), out_dir, &dataset.incidents)?);
    if config.include_units() {
        files.push(write_entity(writer.as_ref(), out_dir, &dataset.incident_units)?);
    }
    if config.include_assets() {
        files.push(write_entity(writer.as_ref(), out_dir, &dataset.incident_assets)?);
    }
    if config.include_notes() {
        files.push(write_entity(writer.as_ref(), out_dir, &dataset.incident_notes)?);
    }

    info!(
        dir = %out_dir.display(),
        format = %writer.format(),
        files = files.len(),
        bytes_written = files.iter().map(|file| file.bytes).sum::<u64>(),
        "dataset persisted"
    );
    Ok(files)
}

fn write_entity<T: ToRow>(
    writer: &dyn TableWriter,
    out_dir: &Path,
    records: &[T],
) -> Result<PersistedFile, GenerationError> {
    let entity = T::ENTITY;
    let path = out_dir.join(format!("{}.{}", entity.name(), writer.format().extension()));
    let rows = rows_of(records);
    let bytes = writer.write_table(&path, entity.columns(), &rows)?;
    debug!(entity = %entity, rows = rows.len(), bytes, path = %path.display(), "table written");
    Ok(PersistedFile {
        entity,
        path,
        rows: rows.len() as u64,
        bytes,
    })
}
