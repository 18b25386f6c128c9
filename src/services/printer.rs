//! Label document printing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::error::ServiceError;
use super::traits::DocumentPrinter;

/// Prefix of a base64 PDF `data:` URI.
pub const PDF_DATA_URI_PREFIX: &str = "data:application/pdf;base64,";

/// Wraps a base64 PDF (as returned by the purchase endpoint) into a data URI.
pub fn pdf_data_uri(image: &str) -> String {
    format!("{PDF_DATA_URI_PREFIX}{image}")
}

/// "Prints" by writing each document as a PDF file into a directory.
#[derive(Debug)]
pub struct PdfFilePrinter {
    output_dir: PathBuf,
    printed: AtomicUsize,
}

impl PdfFilePrinter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            printed: AtomicUsize::new(0),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn next_path(&self) -> PathBuf {
        let seq = self.printed.fetch_add(1, Ordering::Relaxed) + 1;
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.output_dir
            .join(format!("label-{}-{}-{}.pdf", timestamp, std::process::id(), seq))
    }
}

impl DocumentPrinter for PdfFilePrinter {
    fn print(&self, data_uri: &str) -> Result<(), ServiceError> {
        let encoded = data_uri.strip_prefix(PDF_DATA_URI_PREFIX).ok_or_else(|| {
            ServiceError::InvalidDocument("expected a base64 PDF data URI".to_string())
        })?;
        let document = STANDARD
            .decode(encoded.trim())
            .map_err(|err| ServiceError::InvalidDocument(err.to_string()))?;

        fs::create_dir_all(&self.output_dir).map_err(|source| ServiceError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.next_path();
        fs::write(&path, &document).map_err(|source| ServiceError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), bytes = document.len(), "Label written");
        Ok(())
    }
}
