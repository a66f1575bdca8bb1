use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doc_extract::ExtractionError;
use qa_gateway::QueryError;
use thiserror::Error;
use tracing::{error, warn};

use crate::core::http::response_envelope::ErrorBody;

/// Public application error type.
///
/// Every variant renders as `{"error": "<message>"}`; the variant only
/// decides the status code.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Startup(#[from] ai_llm_service::AiLlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    // --- Domain ---
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Query(e) if e.is_client_error() => StatusCode::BAD_REQUEST,

            // 5xx
            AppError::Query(_)
            | AppError::InvalidBody(_)
            | AppError::Extraction(_)
            | AppError::Internal(_)
            | AppError::Startup(_)
            | AppError::Bind { .. }
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }
        (status, ErrorBody::new(self.to_string())).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::InvalidBody(err.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("File too large".into())
        } else {
            AppError::BadRequest(format!("Invalid upload: {}", err.body_text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_everything_else_to_500() {
        assert_eq!(
            AppError::from(QueryError::missing_fields()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(QueryError::Inference("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(QueryError::Configuration("none".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(ExtractionError::EmptyDocument).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn undecodable_body_is_a_server_error() {
        let err = AppError::from(QueryError::Malformed("not an object".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::InvalidBody("trailing comma".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn query_error_message_is_passed_through() {
        let err = AppError::from(QueryError::missing_fields());
        assert_eq!(err.to_string(), "Missing context or question");
    }
}
