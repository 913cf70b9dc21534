//! Multi-format document text extraction.
//!
//! Dispatch is purely by filename suffix (case-insensitive). Each supported
//! format delegates to a strategy module implementing the same contract:
//! bytes in, plain text out. The uploaded bytes are spooled to a scoped
//! temporary file for the duration of extraction; the file is removed when
//! the guard drops, and no strategy retains a handle past its own call.

mod docx;
mod image;
mod pdf;
mod text;

use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors raised while extracting text from an uploaded document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// File suffix does not map to any extraction strategy.
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat {
        /// Suffix of the rejected file, lowercased (empty when absent).
        extension: String,
    },
    /// Filesystem interaction failed while spooling or reading the upload.
    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
    /// Format-specific parsing or decoding failed.
    #[error("Extraction failed: {0}")]
    Failed(String),
}

/// Supported document formats, keyed by filename suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Paginated PDF documents.
    Pdf,
    /// Plain UTF-8 text.
    Text,
    /// Office Open XML word-processing documents.
    Docx,
    /// Raster images passed through OCR.
    Image,
}

impl DocumentFormat {
    /// Resolve a format from a filename suffix, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        match file_extension(filename).as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            "docx" => Some(Self::Docx),
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Lowercased suffix of a filename, without the dot (empty when absent).
fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// Extract plain text from an uploaded document.
///
/// The strategy is chosen by filename suffix; unknown suffixes yield
/// [`ExtractError::UnsupportedFormat`] without touching the filesystem.
/// Format-specific work runs on the blocking thread pool since every
/// strategy is CPU- or process-bound.
pub async fn extract(filename: &str, content: &[u8]) -> Result<String, ExtractError> {
    let format =
        DocumentFormat::from_filename(filename).ok_or_else(|| ExtractError::UnsupportedFormat {
            extension: file_extension(filename),
        })?;

    let mut spool = tempfile::NamedTempFile::new()?;
    spool.write_all(content)?;
    spool.flush()?;

    let path = spool.path().to_path_buf();
    let extracted = tokio::task::spawn_blocking(move || match format {
        DocumentFormat::Pdf => pdf::extract_text(&path),
        DocumentFormat::Text => text::extract_text(&path),
        DocumentFormat::Docx => docx::extract_text(&path),
        DocumentFormat::Image => image::extract_text(&path),
    })
    .await
    .map_err(|err| ExtractError::Failed(format!("extraction task failed: {err}")))??;

    tracing::debug!(
        filename,
        format = ?format,
        chars = extracted.chars().count(),
        "Extracted document text"
    );
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_recognizes_supported_suffixes() {
        assert_eq!(
            DocumentFormat::from_filename("report.pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_filename("notes.TXT"),
            Some(DocumentFormat::Text)
        );
        assert_eq!(
            DocumentFormat::from_filename("letter.docx"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::from_filename("scan.png"),
            Some(DocumentFormat::Image)
        );
        assert_eq!(
            DocumentFormat::from_filename("photo.JPG"),
            Some(DocumentFormat::Image)
        );
        assert_eq!(
            DocumentFormat::from_filename("photo.jpeg"),
            Some(DocumentFormat::Image)
        );
    }

    #[test]
    fn dispatch_rejects_other_suffixes() {
        assert_eq!(DocumentFormat::from_filename("tool.exe"), None);
        assert_eq!(DocumentFormat::from_filename("table.csv"), None);
        assert_eq!(DocumentFormat::from_filename("README"), None);
    }

    #[tokio::test]
    async fn txt_content_is_returned_verbatim() {
        let text = extract("greeting.txt", b"hello world")
            .await
            .expect("txt extraction");
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn unknown_suffix_signals_unsupported_format() {
        let error = extract("payload.exe", b"MZ").await.expect_err("unsupported");
        match error {
            ExtractError::UnsupportedFormat { extension } => assert_eq!(extension, "exe"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_suffix_signals_unsupported_format() {
        let error = extract("README", b"text").await.expect_err("unsupported");
        match error {
            ExtractError::UnsupportedFormat { extension } => assert_eq!(extension, ""),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_utf8_txt_fails_extraction() {
        let error = extract("broken.txt", &[0xff, 0xfe, 0x00])
            .await
            .expect_err("invalid utf-8");
        assert!(matches!(error, ExtractError::Failed(_)));
    }
}
