use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;

use firesynth_core::{ColumnKind, ColumnSpec};

use crate::errors::GenerationError;
use crate::output::rows::CellValue;

/// Write a table as Parquet with one typed column per contract column; returns bytes written.
///
/// Dates are stored as `Date`, timestamps as UTC microsecond `Datetime`, JSON
/// as its compact text.
pub fn write_table_parquet(
    path: &Path,
    columns: &[ColumnSpec],
    rows: &[Vec<CellValue>],
) -> Result<u64, GenerationError> {
    let series = columns
        .iter()
        .enumerate()
        .map(|(index, column)| build_column(column, rows.iter().map(|row| row.get(index))))
        .collect::<PolarsResult<Vec<Column>>>()?;
    let mut frame = DataFrame::new(series)?;

    let file = File::create(path)?;
    ParquetWriter::new(file).finish(&mut frame)?;
    Ok(std::fs::metadata(path)?.len())
}

fn build_column<'a>(
    column: &ColumnSpec,
    cells: impl Iterator<Item = Option<&'a CellValue>>,
) -> PolarsResult<Column> {
    let name = PlSmallStr::from_static(column.name);
    let cells = cells.map(|cell| cell.filter(|value| !value.is_null()));
    match column.kind {
        ColumnKind::Text | ColumnKind::Json => {
            let values: Vec<Option<String>> = cells.map(|cell| cell.map(CellValue::to_csv)).collect();
            Ok(Column::new(name, values))
        }
        ColumnKind::Bool => {
            let values: Vec<Option<bool>> = cells
                .map(|cell| match cell {
                    Some(CellValue::Bool(value)) => Some(*value),
                    _ => None,
                })
                .collect();
            Ok(Column::new(name, values))
        }
        ColumnKind::Int => {
            let values: Vec<Option<i64>> = cells
                .map(|cell| match cell {
                    Some(CellValue::Int(value)) => Some(*value),
                    _ => None,
                })
                .collect();
            Ok(Column::new(name, values))
        }
        ColumnKind::Float => {
            let values: Vec<Option<f64>> =
                cells.map(|cell| cell.and_then(CellValue::as_f64)).collect();
            Ok(Column::new(name, values))
        }
        ColumnKind::Date => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
            let values: Vec<Option<i32>> = cells
                .map(|cell| match cell {
                    Some(CellValue::Date(value)) => {
                        i32::try_from(value.signed_duration_since(epoch).num_days()).ok()
                    }
                    _ => None,
                })
                .collect();
            Column::new(name, values).cast(&DataType::Date)
        }
        ColumnKind::Timestamp => {
            let values: Vec<Option<i64>> = cells
                .map(|cell| match cell {
                    Some(CellValue::Timestamp(value)) => Some(value.timestamp_micros()),
                    _ => None,
                })
                .collect();
            Column::new(name, values).cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use firesynth_core::Entity;

    use super::*;

    #[test]
    fn empty_table_keeps_schema() {
        let dir = std::env::temp_dir().join(format!("firesynth_parquet_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create dir");
        let path = dir.join("incident_units.parquet");

        let bytes = write_table_parquet(&path, Entity::IncidentUnits.columns(), &[]).expect("write");
        assert!(bytes > 0);

        let frame = ParquetReader::new(File::open(&path).expect("open"))
            .finish()
            .expect("read");
        assert_eq!(frame.height(), 0);
        let names: Vec<&str> = frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, Entity::IncidentUnits.column_names());

        std::fs::remove_dir_all(&dir).ok();
    }
}
