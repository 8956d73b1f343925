use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Failure body returned by the classify endpoint.
///
/// Always a single `error` string so browser callers can show it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of what went wrong
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Canonical client-facing messages.
pub mod messages {
    pub const MISSING_TEXT: &str = "Missing text";
    pub const ONLY_POST: &str = "Only POST allowed";
    pub const INTERNAL: &str = "An internal error occurred";
}

/// Deployment-time configuration problems. Raised once at startup, never per request.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown timezone '{name}': {reason}")]
    InvalidTimezone { name: String, reason: String },
    #[error("unknown normalization profile '{0}' (expected standard, inbox or compact)")]
    UnknownProfile(String),
    #[error("fallback length must be at least 1 character")]
    ZeroFallbackLength,
    #[error("{name} must be set")]
    MissingSecret { name: &'static str },
    #[error("temperature {0} is outside 0.0..=2.0")]
    TemperatureOutOfRange(f64),
}
