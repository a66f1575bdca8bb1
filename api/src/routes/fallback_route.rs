use crate::error_handler::AppError;

/// Any unmatched route.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
