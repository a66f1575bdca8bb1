use serde::Serialize;

/// Response payload for /upload-pdf (wrapped in the success envelope).
#[derive(Debug, Serialize)]
pub struct UploadedText {
    /// Raw text of every page, in order.
    pub text: String,
}
