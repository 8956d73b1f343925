use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clarh_core::error::{ErrorBody, messages};

use crate::completion::CompletionError;

/// Request failures. Every variant renders as `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    /// No usable `text` or `prompt` in the body (400)
    MissingInput,
    /// Body was not valid JSON (400)
    InvalidBody(String),
    /// Anything but POST or OPTIONS (405)
    MethodNotAllowed,
    /// The completion call failed (500)
    Upstream(CompletionError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::MissingInput => messages::MISSING_TEXT.to_string(),
            AppError::InvalidBody(detail) => format!("Invalid request body: {detail}"),
            AppError::MethodNotAllowed => messages::ONLY_POST.to_string(),
            AppError::Upstream(err) => {
                tracing::error!(error = %err, "completion failed");
                err.to_string()
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        AppError::Upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        (
            status,
            serde_json::from_slice(&bytes).expect("error body is JSON"),
        )
    }

    #[tokio::test]
    async fn missing_input_is_client_error() {
        let (status, body) = body_of(AppError::MissingInput).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Missing text"}));
    }

    #[tokio::test]
    async fn upstream_error_carries_provider_message() {
        let (status, body) = body_of(AppError::Upstream(CompletionError::Provider {
            status: 429,
            message: "Rate limit reached for gpt-4.1-mini".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Rate limit reached for gpt-4.1-mini");
        assert_eq!(body.as_object().map(|o| o.len()), Some(1));
    }

    #[tokio::test]
    async fn method_error_is_405() {
        let (status, body) = body_of(AppError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Only POST allowed");
    }
}
