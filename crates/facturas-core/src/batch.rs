//! Batch aggregation of uploaded documents into invoice records.

use std::path::Path;

use tracing::{info, warn};

use crate::error::{self, ExportError, LoadError};
use crate::invoice::{InvoiceExtractor, PhoneBillExtractor};
use crate::loader::{AutoLoader, TextLoader};
use crate::models::record::InvoiceRecord;

/// An uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub content: Vec<u8>,
    /// Why the bytes could not be obtained, for submitted files that were
    /// missing or unreadable on disk.
    pub read_error: Option<String>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            read_error: None,
        }
    }

    /// A submitted document whose bytes could not be read.
    pub fn unreadable(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: Vec::new(),
            read_error: Some(reason.into()),
        }
    }

    /// Read a document from disk, naming it after the file.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        Ok(Self::new(file_name_of(path), content))
    }

    /// Like `from_path`, but a read failure yields an unreadable document.
    pub fn read_or_unreadable(path: &Path) -> Self {
        Self::from_path(path).unwrap_or_else(|e| {
            warn!("Failed to read {}: {}", path.display(), e);
            Self::unreadable(file_name_of(path), e.to_string())
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Consumer of the final, ordered record set.
pub trait RecordSink {
    /// Write all records. An empty slice is `ExportError::NoRecords`.
    fn write_records(&mut self, records: &[InvoiceRecord]) -> Result<(), ExportError>;
}

/// Runs the loader and extractor over a batch, one document at a time.
pub struct BatchAggregator<L = AutoLoader, E = PhoneBillExtractor> {
    loader: L,
    extractor: E,
}

impl Default for BatchAggregator {
    fn default() -> Self {
        Self::new(AutoLoader::default(), PhoneBillExtractor::new())
    }
}

impl<L: TextLoader, E: InvoiceExtractor> BatchAggregator<L, E> {
    pub fn new(loader: L, extractor: E) -> Self {
        Self { loader, extractor }
    }

    /// Process one document. The load error, if any, is returned alongside
    /// the all-error record so callers can report it.
    pub fn process_document(&self, document: &Document) -> (InvoiceRecord, Option<LoadError>) {
        let loaded = match &document.read_error {
            Some(reason) => Err(LoadError::Read(reason.clone())),
            None => self.loader.load_text(&document.content),
        };

        match loaded {
            Ok(text) => (self.extractor.extract(&text, &document.file_name), None),
            Err(e) => {
                warn!("Failed to read {}: {}", document.file_name, e);
                (InvoiceRecord::unreadable(&document.file_name), Some(e))
            }
        }
    }

    /// Process every document in order, one record per document.
    pub fn process(&self, documents: &[Document]) -> Vec<InvoiceRecord> {
        self.process_with(documents, |_, _, _| {})
    }

    /// Like `process`, calling `on_document` after each document.
    pub fn process_with<F>(&self, documents: &[Document], mut on_document: F) -> Vec<InvoiceRecord>
    where
        F: FnMut(&Document, &InvoiceRecord, Option<&LoadError>),
    {
        let records: Vec<InvoiceRecord> = documents
            .iter()
            .map(|doc| {
                let (record, error) = self.process_document(doc);
                on_document(doc, &record, error.as_ref());
                record
            })
            .collect();

        info!("{}", BatchSummary::from_records(&records));
        records
    }

    /// Process the batch and hand the full record set to `sink`.
    ///
    /// Document failures are absorbed into the records; only the sink can fail.
    pub fn consolidate(
        &self,
        documents: &[Document],
        sink: &mut dyn RecordSink,
    ) -> error::Result<Vec<InvoiceRecord>> {
        self.consolidate_with(documents, sink, |_, _, _| {})
    }

    /// Like `consolidate`, calling `on_document` after each document.
    pub fn consolidate_with<F>(
        &self,
        documents: &[Document],
        sink: &mut dyn RecordSink,
        on_document: F,
    ) -> error::Result<Vec<InvoiceRecord>>
    where
        F: FnMut(&Document, &InvoiceRecord, Option<&LoadError>),
    {
        let records = self.process_with(documents, on_document);
        sink.write_records(&records)?;
        Ok(records)
    }
}

/// Outcome counts over a processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// All four fields extracted.
    pub complete: usize,
    /// Readable, but at least one field missing or invalid.
    pub partial: usize,
    /// No text could be loaded.
    pub unreadable: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[InvoiceRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            if r.is_complete() {
                acc.complete += 1;
            } else if r.is_unreadable() {
                acc.unreadable += 1;
            } else {
                acc.partial += 1;
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.complete + self.partial + self.unreadable
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Processed {} documents: {} complete, {} partial, {} unreadable",
            self.total(),
            self.complete,
            self.partial,
            self.unreadable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::FieldValue;
    use pretty_assertions::assert_eq;

    const BILL: &str = "Boleta N° : 1001\n\
        Sr./Sra. PEDRO SOTO RUT 1-9\n\
        Fecha de Emisión: 2 de enero de 2024\n\
        Total Único Cuenta Telefónica $ 25.990\n";

    fn aggregator() -> BatchAggregator {
        BatchAggregator::default()
    }

    /// Records every slice handed to it.
    #[derive(Default)]
    struct MemorySink {
        rows: Vec<InvoiceRecord>,
    }

    impl RecordSink for MemorySink {
        fn write_records(&mut self, records: &[InvoiceRecord]) -> Result<(), ExportError> {
            if records.is_empty() {
                return Err(ExportError::NoRecords);
            }
            self.rows.extend_from_slice(records);
            Ok(())
        }
    }

    #[test]
    fn test_one_record_per_document_in_order() {
        let docs: Vec<Document> = (0..5)
            .map(|i| Document::new(format!("doc{}.txt", i), BILL))
            .collect();

        let records = aggregator().process(&docs);

        let names: Vec<_> = records.iter().map(|r| r.source_file_name.as_str()).collect();
        assert_eq!(names, ["doc0.txt", "doc1.txt", "doc2.txt", "doc3.txt", "doc4.txt"]);
        assert!(records.iter().all(InvoiceRecord::is_complete));
    }

    #[test]
    fn test_empty_batch() {
        assert!(aggregator().process(&[]).is_empty());
    }

    #[test]
    fn test_unreadable_document_does_not_stop_batch() {
        let docs = vec![
            Document::new("bueno1.txt", BILL),
            Document::new("roto.pdf", b"%PDF-1.7 truncated".to_vec()),
            Document::new("escaneo.txt", "   \n  "),
            Document::new("bueno2.txt", BILL),
        ];

        let records = aggregator().process(&docs);
        assert_eq!(records.len(), 4);

        assert_eq!(records[1], InvoiceRecord::unreadable("roto.pdf"));
        assert_eq!(records[2], InvoiceRecord::unreadable("escaneo.txt"));
        assert_eq!(records[3].source_file_name, "bueno2.txt");
        assert_eq!(records[3].number, FieldValue::Matched("1001".to_string()));

        assert_eq!(
            BatchSummary::from_records(&records),
            BatchSummary {
                complete: 2,
                partial: 0,
                unreadable: 2,
            }
        );
    }

    #[test]
    fn test_process_document_reports_error() {
        let (record, err) = aggregator().process_document(&Document::new("x.bin", vec![0xffu8, 0xfe]));

        assert!(record.is_unreadable());
        assert!(matches!(err, Some(LoadError::NotUtf8)));
    }

    #[test]
    fn test_summary_counts_partial() {
        let docs = vec![
            Document::new("a.txt", BILL),
            Document::new("b.txt", "Boleta N° : 7"),
        ];
        let records = aggregator().process(&docs);
        let summary = BatchSummary::from_records(&records);

        assert_eq!(summary.partial, 1);
        assert_eq!(summary.total(), 2);
        assert_eq!(
            summary.to_string(),
            "Processed 2 documents: 1 complete, 1 partial, 0 unreadable"
        );
    }

    #[test]
    fn test_sink_receives_records() {
        let records = aggregator().process(&[Document::new("a.txt", BILL)]);

        let mut sink = MemorySink::default();
        sink.write_records(&records).unwrap();
        assert_eq!(sink.rows, records);

        assert!(matches!(sink.write_records(&[]), Err(ExportError::NoRecords)));
    }

    #[test]
    fn test_consolidate() {
        let mut sink = MemorySink::default();
        let docs = vec![Document::new("a.txt", BILL), Document::new("b.pdf", b"%PDF-".to_vec())];

        let records = aggregator().consolidate(&docs, &mut sink).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(sink.rows, records);
    }

    #[test]
    fn test_consolidate_empty_batch_fails() {
        let mut sink = MemorySink::default();
        let result = aggregator().consolidate(&[], &mut sink);
        assert!(matches!(
            result,
            Err(crate::error::FacturasError::Export(ExportError::NoRecords))
        ));
    }

    #[test]
    fn test_unreadable_document_keeps_its_row() {
        let docs = vec![
            Document::new("a.txt", BILL),
            Document::unreadable("missing.pdf", "No such file or directory"),
            Document::new("b.txt", BILL),
        ];

        let mut seen = Vec::new();
        let records = aggregator().process_with(&docs, |doc, record, err| {
            seen.push((doc.file_name.clone(), record.is_unreadable(), err.map(|e| e.to_string())));
        });

        assert_eq!(records.len(), 3);
        assert_eq!(records[1], InvoiceRecord::unreadable("missing.pdf"));
        assert_eq!(
            seen,
            [
                ("a.txt".to_string(), false, None),
                (
                    "missing.pdf".to_string(),
                    true,
                    Some("cannot read document: No such file or directory".to_string())
                ),
                ("b.txt".to_string(), false, None),
            ]
        );
    }

    #[test]
    fn test_read_or_unreadable_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::read_or_unreadable(&dir.path().join("missing.pdf"));

        assert_eq!(doc.file_name, "missing.pdf");
        assert!(doc.content.is_empty());
        assert!(doc.read_error.is_some());
    }

    #[test]
    fn test_consolidate_with_reports_each_document() {
        let mut sink = MemorySink::default();
        let docs = vec![Document::new("a.txt", BILL), Document::new("b.txt", BILL)];

        let mut count = 0;
        let records = aggregator()
            .consolidate_with(&docs, &mut sink, |_, _, _| count += 1)
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(sink.rows, records);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boleta.txt");
        std::fs::write(&path, BILL).unwrap();

        let doc = Document::from_path(&path).unwrap();
        assert_eq!(doc.file_name, "boleta.txt");
        assert_eq!(doc.content, BILL.as_bytes());
    }
}
