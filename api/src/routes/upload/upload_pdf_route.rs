//! POST /upload-pdf: extracts the text of an uploaded PDF and returns it raw.

use std::sync::Arc;

use axum::extract::{Multipart, State, multipart::MultipartRejection};
use doc_extract::is_pdf_filename;
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::upload::upload_response::UploadedText,
};

/// Multipart field that carries the document.
pub const FILE_FIELD: &str = "file";

/// Handler: POST /upload-pdf
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/upload-pdf -F 'file=@handbook.pdf'
/// ```
#[instrument(name = "upload_pdf_route", skip_all)]
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<ApiResponse<UploadedText>> {
    let Ok(mut multipart) = multipart else {
        return Err(AppError::BadRequest("No file part".into()));
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A part without a filename is a plain form value, not a file.
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await?;
        upload = Some((filename, bytes));
        break;
    }

    let Some((filename, bytes)) = upload else {
        return Err(AppError::BadRequest("No file part".into()));
    };
    if filename.is_empty() {
        return Err(AppError::BadRequest("No selected file".into()));
    }
    if !is_pdf_filename(&filename) {
        return Err(AppError::BadRequest("Invalid file type".into()));
    }

    info!(%filename, bytes = bytes.len(), "extracting uploaded pdf");

    let extractor = state.extractor.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
        .await
        .map_err(|e| AppError::Internal(format!("Error extracting text: {e}")))??;

    Ok(ApiResponse::success(UploadedText { text }))
}
