//! Configuration structures for the consolidation pipeline.
//!
//! Settings here only affect how documents are loaded and how records are
//! presented. Field matching and normalization are fixed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::record::SentinelLabels;
use crate::error::{FacturasError, Result};

/// Main configuration for the facturas pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturasConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Spreadsheet export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Read only the first page's text layer.
    pub first_page_only: bool,

    /// Minimum non-whitespace characters for a document to count as readable.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            first_page_only: false,
            min_text_length: 1,
        }
    }
}

/// Spreadsheet export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name prefix, followed by `_<YYYYMMDD>_<HHMMSS>`.
    pub file_prefix: String,

    /// Worksheet name.
    pub sheet_name: String,

    /// Excel number format for the date column.
    pub date_format: String,

    /// Excel number format for the total column.
    pub amount_format: String,

    /// Cell text for fields whose marker was not found.
    pub not_found_label: String,

    /// Cell text for fields whose value could not be interpreted.
    pub error_label: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let labels = SentinelLabels::default();
        Self {
            file_prefix: "Facturas_Consolidadas".to_string(),
            sheet_name: "Facturas".to_string(),
            date_format: "dd-mm-yyyy".to_string(),
            amount_format: "#,##0.00".to_string(),
            not_found_label: labels.not_found,
            error_label: labels.error,
        }
    }
}

impl ExportConfig {
    pub fn labels(&self) -> SentinelLabels {
        SentinelLabels {
            not_found: self.not_found_label.clone(),
            error: self.error_label.clone(),
        }
    }
}

impl FacturasConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| FacturasError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that missing and rejected fields stay distinguishable.
    pub fn validate(&self) -> Result<()> {
        if self.export.not_found_label == self.export.error_label {
            return Err(FacturasError::Config(format!(
                "export.not_found_label and export.error_label are both {:?}",
                self.export.error_label
            )));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FacturasError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}
