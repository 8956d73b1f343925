//! Completion provider seam and the OpenAI Responses client behind it.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;

/// One classification call: system instructions plus the raw user text.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub instructions: &'a str,
    pub input: &'a str,
    pub temperature: f64,
}

/// Anything that turns a prompt into free text. Called exactly once per request.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(&'a self, request: CompletionRequest<'a>) -> CompletionFuture<'a>;
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success status; `message` is the provider's own error text.
    #[error("{message}")]
    Provider { status: u16, message: String },
    #[error("completion response could not be decoded: {0}")]
    Decode(String),
    #[error("completion response contained no output text")]
    EmptyOutput,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: [InputMessage<'a>; 2],
    temperature: f64,
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// OpenAI Responses API (`POST {base_url}/responses`).
pub struct OpenAiResponses {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiResponses {
    pub fn new(
        base_url: &str,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/responses", base_url.trim_end_matches('/')),
            api_key,
            model,
        })
    }

    async fn send(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError> {
        let body = ResponsesRequest {
            model: &self.model,
            input: [
                InputMessage {
                    role: "system",
                    content: request.instructions,
                },
                InputMessage {
                    role: "user",
                    content: request.input,
                },
            ],
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = provider_error_message(&text).unwrap_or_else(|| {
                format!(
                    "completion provider returned {}",
                    status.canonical_reason().unwrap_or(status.as_str())
                )
            });
            tracing::error!(status = status.as_u16(), message = %message, "completion provider error");
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let body: ResponsesBody =
            serde_json::from_str(&text).map_err(|e| CompletionError::Decode(e.to_string()))?;
        collect_output_text(body).ok_or(CompletionError::EmptyOutput)
    }
}

impl CompletionProvider for OpenAiResponses {
    fn complete<'a>(&'a self, request: CompletionRequest<'a>) -> CompletionFuture<'a> {
        Box::pin(self.send(request))
    }
}

fn provider_error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ProviderErrorBody>(body) {
        return Some(parsed.error.message);
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Prefer the aggregated `output_text`; otherwise join every `output_text`
/// part of every message item.
fn collect_output_text(body: ResponsesBody) -> Option<String> {
    if let Some(text) = body.output_text.filter(|t| !t.trim().is_empty()) {
        return Some(text);
    }

    let joined: String = body
        .output
        .into_iter()
        .filter(|item| item.kind == "message")
        .flat_map(|item| item.content)
        .filter(|part| part.kind == "output_text")
        .filter_map(|part| part.text)
        .collect();

    (!joined.trim().is_empty()).then_some(joined)
}
