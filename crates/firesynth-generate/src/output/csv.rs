use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use firesynth_core::ColumnSpec;

use crate::output::rows::CellValue;

/// Write a table as CSV in the given column order; returns bytes written.
///
/// The header is always written, so an empty table yields a header-only file.
pub fn write_table_csv(
    path: &Path,
    columns: &[ColumnSpec],
    rows: &[Vec<CellValue>],
) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(columns.iter().map(|col| col.name))?;

    for row in rows {
        writer.write_record(row.iter().map(CellValue::to_csv))?;
    }

    writer.flush()?;
    let mut counting = writer.into_inner().map_err(|err| err.into_error())?;
    counting.flush()?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use firesynth_core::Entity;

    use super::*;

    #[test]
    fn empty_table_writes_header_only() {
        let dir = std::env::temp_dir().join(format!("firesynth_csv_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create dir");
        let path = dir.join("incident_notes.csv");

        let bytes = write_table_csv(&path, Entity::IncidentNotes.columns(), &[]).expect("write");
        let contents = std::fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "incident_number,author,note,created_at\n");
        assert_eq!(bytes, contents.len() as u64);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let dir = std::env::temp_dir().join(format!("firesynth_csv_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create dir");
        let path = dir.join("incident_assets.csv");

        let row = vec![
            CellValue::Text("INC-20240101-000001".to_string()),
            CellValue::Text("AST-000001-1".to_string()),
            CellValue::Text("Drone".to_string()),
            CellValue::Text("staged".to_string()),
            CellValue::Text("Smoke, heat and wind.".to_string()),
        ];
        write_table_csv(&path, Entity::IncidentAssets.columns(), &[row]).expect("write");
        let contents = std::fs::read_to_string(&path).expect("read");
        assert!(contents.ends_with("staged,\"Smoke, heat and wind.\"\n"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
