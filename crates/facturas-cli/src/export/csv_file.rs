//! CSV export of the consolidated table.

use std::path::{Path, PathBuf};

use tracing::debug;

use facturas_core::{ExportError, InvoiceRecord, RecordSink, SentinelLabels, COLUMNS};

/// Writes a header line and one line per record, dates in ISO format.
pub struct CsvExporter {
    path: PathBuf,
    labels: SentinelLabels,
}

impl CsvExporter {
    pub fn new(path: impl AsRef<Path>, labels: SentinelLabels) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            labels,
        }
    }
}

impl RecordSink for CsvExporter {
    fn write_records(&mut self, records: &[InvoiceRecord]) -> Result<(), ExportError> {
        if records.is_empty() {
            return Err(ExportError::NoRecords);
        }

        let write_err = |e: csv::Error| ExportError::Write(e.to_string());
        let mut wtr = csv::Writer::from_path(&self.path).map_err(write_err)?;

        wtr.write_record(COLUMNS).map_err(write_err)?;
        for record in records {
            wtr.write_record(record.cells(&self.labels)).map_err(write_err)?;
        }

        wtr.flush()?;
        debug!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(())
    }
}
