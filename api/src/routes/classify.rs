use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{MethodRouter, post};
use axum::{Json, Router};
use clarh_core::error::ErrorBody;
use clarh_core::record::ClassifiedRecord;

use crate::error::AppError;
use crate::extract::InputText;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", classify_route())
        .route("/v1/classify", classify_route())
}

fn classify_route() -> MethodRouter<AppState> {
    post(classify)
        .options(preflight)
        .fallback(method_not_allowed)
}

/// Request body for POST /v1/classify. `text` wins over `prompt` when both are set.
#[derive(Debug, utoipa::ToSchema)]
pub struct ClassifyRequest {
    /// Free-form input text
    pub text: Option<String>,
    /// Alternate key for the input text
    pub prompt: Option<String>,
}

/// Classify free-form text into a Task, Event or Note record
///
/// One completion call is made per request. The model's answer is repaired
/// deterministically: explicit clock times and gathering nouns force `Event`,
/// fields that do not belong to the final type are nulled, and a missing
/// name is synthesized from the input.
#[utoipa::path(
    post,
    path = "/v1/classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Normalized record", body = ClassifiedRecord),
        (status = 400, description = "Missing text or malformed body", body = ErrorBody),
        (status = 405, description = "Only POST allowed", body = ErrorBody),
        (status = 500, description = "Completion provider failed", body = ErrorBody)
    ),
    tag = "classify"
)]
pub async fn classify(
    State(state): State<AppState>,
    InputText(text): InputText,
) -> Result<Json<ClassifiedRecord>, AppError> {
    let finished = state.classifier.classify(&text).await?;

    tracing::info!(
        record_type = finished.record.record_type.as_str(),
        extraction = finished.extraction.as_str(),
        guardrail = finished.guardrail.as_ref().map(|g| g.reason.as_str()),
        "classified text"
    );

    Ok(Json(finished.record))
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
