use thiserror::Error;

/// Why a document could not be turned into text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Uploaded file is empty")]
    EmptyDocument,

    #[error("Error extracting text: {0}")]
    Pdf(String),
}
