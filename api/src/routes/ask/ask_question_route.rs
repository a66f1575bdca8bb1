//! POST /ask-question: answers a question from caller-supplied context.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use qa_gateway::QueryError;
use tracing::instrument;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::ask::ask_request::{AskAnswer, AskRequest},
};

/// Handler: POST /ask-question
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/ask-question \
///   -H 'content-type: application/json' \
///   -d '{"context":"The gym opens at 6am.","question":"What time does the gym open?"}'
/// ```
#[instrument(name = "ask_question_route", skip_all)]
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<ApiResponse<AskAnswer>> {
    let Json(body) = payload?;
    if body.is_incomplete() {
        return Err(QueryError::missing_fields().into());
    }

    let answer = state.gateway.answer(&body.context, &body.question).await?;

    Ok(ApiResponse::success(AskAnswer { answer }))
}
