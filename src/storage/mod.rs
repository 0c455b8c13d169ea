// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::ExtractionResult;
use crate::utils::error::StorageError;

pub struct ReportStore {
    base_dir: PathBuf,
}

impl ReportStore {
    /// Creates a new ReportStore with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path a file for `label` would be written to, e.g. `<base>/<label>_report.json`.
    pub fn path_for(&self, label: &str, suffix: &str) -> PathBuf {
        self.base_dir.join(format!("{}_{}", sanitize_label(label), suffix))
    }

    /// Saves an extraction result together with some metadata in JSON format
    pub fn save_report(
        &self,
        label: &str,
        raw_text: &str,
        result: &ExtractionResult,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.path_for(label, "report.json");

        let report = serde_json::json!({
            "label": label,
            "numbers": result.numbers,
            "wrapped": result.wrapped,
            "total": result.total,
            "count": result.len(),
            "input_length": raw_text.len(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let report_str = serde_json::to_string_pretty(&report)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, report_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved report to {}", file_path.display());

        Ok(file_path)
    }
}

/// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `_`.
fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "input".to_string()
    } else {
        cleaned
    }
}
