//! Request-body extractor for the classify endpoint.
//!
//! Content-Type is not required; the body is read as bytes and parsed as JSON.
//! Every rejection is an `AppError`, so callers always get `{"error": ...}`.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::Value;

use crate::error::AppError;

/// Keys that may carry the input text, in order of preference.
pub const INPUT_KEYS: [&str; 2] = ["text", "prompt"];

/// The verbatim, non-blank input text of a classify request.
pub struct InputText(pub String);

impl<S> FromRequest<S> for InputText
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidBody(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::MissingInput);
        }

        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::InvalidBody(format!("Invalid JSON: {e}")))?;

        input_text(&body).map(InputText).ok_or(AppError::MissingInput)
    }
}

/// First non-blank string among `text` and `prompt`. Returned untrimmed.
pub fn input_text(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    INPUT_KEYS.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
    })
}
