//! Text extraction collaborator: document bytes in, plain text out.
//!
//! The web process only accepts PDFs; [`is_pdf_filename`] is the upload
//! policy and [`PdfTextExtractor`] the one backend. Extraction is CPU-bound
//! and synchronous, so async callers should run it on a blocking pool.

mod errors;

use std::time::Instant;

use tracing::{debug, info, instrument};

pub use errors::ExtractionError;

/// Anything that can turn an uploaded document into text.
pub trait TextExtractor: Send + Sync {
    /// Extracts all text from `bytes`.
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// True when `filename` has a `.pdf` extension (case-insensitive).
///
/// # Example
/// ```
/// use doc_extract::is_pdf_filename;
/// assert!(is_pdf_filename("Report.PDF"));
/// assert!(!is_pdf_filename("pdf"));
/// assert!(!is_pdf_filename("notes.pdf.txt"));
/// ```
pub fn is_pdf_filename(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.eq_ignore_ascii_case("pdf"),
        None => false,
    }
}

/// PDF backend built on `pdf-extract`; pages are concatenated in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        if !bytes.starts_with(b"%PDF-") {
            debug!("missing %PDF- header");
            return Err(ExtractionError::Pdf("file is not a PDF document".into()));
        }

        let started = Instant::now();
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        info!(
            chars = text.chars().count(),
            latency_ms = started.elapsed().as_millis(),
            "pdf text extracted"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_policy() {
        assert!(is_pdf_filename("a.pdf"));
        assert!(is_pdf_filename("my.scan.Pdf"));
        assert!(!is_pdf_filename("a.docx"));
        assert!(!is_pdf_filename(""));
        assert!(!is_pdf_filename("pdf"));
    }

    #[test]
    fn empty_bytes_are_rejected() {
        assert_eq!(
            PdfTextExtractor.extract(b"").unwrap_err(),
            ExtractionError::EmptyDocument
        );
    }

    #[test]
    fn non_pdf_bytes_are_rejected() {
        let err = PdfTextExtractor.extract(b"hello, not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
