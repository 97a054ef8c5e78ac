//! Excel workbook export using rust_xlsxwriter.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use facturas_core::models::config::ExportConfig;
use facturas_core::{ExportError, FieldValue, InvoiceRecord, RecordSink, COLUMNS};

/// Longest string an Excel cell can hold, in characters.
const MAX_CELL_CHARS: usize = 32_767;

/// Writes one worksheet with a header row and one row per record.
pub struct XlsxExporter {
    path: PathBuf,
    config: ExportConfig,
}

struct Formats {
    header: Format,
    date: Format,
    amount: Format,
}

impl XlsxExporter {
    pub fn new(path: impl AsRef<Path>, config: ExportConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    /// Build the workbook in memory.
    pub fn build_workbook(&self, records: &[InvoiceRecord]) -> Result<Workbook, XlsxError> {
        let formats = Formats {
            header: Format::new().set_bold(),
            date: Format::new().set_num_format(&self.config.date_format),
            amount: Format::new().set_num_format(&self.config.amount_format),
        };

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.config.sheet_name)?;

        for (col, header) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
        }

        for (idx, record) in records.iter().enumerate() {
            self.write_row(worksheet, idx as u32 + 1, record, &formats)?;
        }

        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();
        Ok(workbook)
    }

    fn write_row(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        record: &InvoiceRecord,
        formats: &Formats,
    ) -> Result<(), XlsxError> {
        worksheet.write_string(row, 0, clamp(&record.source_file_name))?;
        self.write_text(worksheet, row, 1, &record.customer)?;
        self.write_text(worksheet, row, 2, &record.number)?;

        match &record.date {
            FieldValue::Matched(date) => match excel_date(date) {
                Ok(datetime) => {
                    worksheet.write_datetime_with_format(row, 3, &datetime, &formats.date)?;
                }
                // Excel dates start in 1900
                Err(e) => {
                    debug!("{}: writing date as text: {}", record.source_file_name, e);
                    worksheet.write_string(row, 3, date.format("%Y-%m-%d").to_string())?;
                }
            },
            other => {
                worksheet.write_string(row, 3, clamp(self.sentinel(other)))?;
            }
        }

        match record.total.value().and_then(ToPrimitive::to_f64) {
            Some(total) => {
                worksheet.write_number_with_format(row, 4, total, &formats.amount)?;
            }
            None => {
                worksheet.write_string(row, 4, clamp(self.sentinel(&record.total)))?;
            }
        }

        Ok(())
    }

    fn write_text(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &FieldValue<String>,
    ) -> Result<(), XlsxError> {
        let text = match value {
            FieldValue::Matched(s) => s.as_str(),
            other => self.sentinel(other),
        };
        worksheet.write_string(row, col, clamp(text))?;
        Ok(())
    }

    fn sentinel<T>(&self, value: &FieldValue<T>) -> &str {
        match value {
            FieldValue::NotFound => self.config.not_found_label.as_str(),
            _ => self.config.error_label.as_str(),
        }
    }
}

fn excel_date(date: &NaiveDate) -> Result<ExcelDateTime, XlsxError> {
    let year = u16::try_from(date.year()).map_err(|_| XlsxError::DateTimeRangeError(date.to_string()))?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)
}

/// Cut text to what fits in one cell.
fn clamp(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

impl RecordSink for XlsxExporter {
    fn write_records(&mut self, records: &[InvoiceRecord]) -> Result<(), ExportError> {
        if records.is_empty() {
            return Err(ExportError::NoRecords);
        }

        let mut workbook = self
            .build_workbook(records)
            .map_err(|e| ExportError::Write(e.to_string()))?;
        workbook
            .save(&self.path)
            .map_err(|e| ExportError::Write(e.to_string()))?;

        debug!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(())
    }
}
