use std::time::Duration;

use chrono_tz::Tz;
use clap::Parser;

use clarh_core::clock::{DEFAULT_TIMEZONE, parse_timezone};
use clarh_core::error::ConfigError;
use clarh_core::policy::{NormalizationPolicy, Profile};

/// Startup flags. Every flag can also come from the environment (or `.env`).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "clarh-api",
    version,
    about = "Classify free-form text into Task, Event or Note records"
)]
pub struct Args {
    /// Completion provider API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Completion provider base URL
    #[arg(long, env = "CLARH_OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    openai_base_url: String,

    /// Completion model
    #[arg(long, env = "CLARH_MODEL", default_value = "gpt-4.1-mini")]
    model: String,

    /// Sampling temperature; keep low for repeatable output
    #[arg(long, env = "CLARH_TEMPERATURE", default_value_t = 0.1)]
    temperature: f64,

    /// Timeout for the completion call, in seconds
    #[arg(long, env = "CLARH_COMPLETION_TIMEOUT_SECS", default_value_t = 30)]
    completion_timeout_secs: u64,

    /// IANA timezone relative dates are resolved in
    #[arg(long, env = "CLARH_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Normalization profile: standard, inbox or compact
    #[arg(long, env = "CLARH_PROFILE", default_value = "standard")]
    profile: String,

    /// Use character-count fallback names of this length
    #[arg(long, env = "CLARH_FALLBACK_CHARS")]
    fallback_chars: Option<usize>,

    /// Comma-separated allowed origins, or `*` for any
    #[arg(long, env = "CLARH_CORS_ORIGINS", default_value = "*")]
    cors_origins: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

/// Validated process-wide configuration, built once at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f64,
    pub completion_timeout: Duration,
    pub timezone: Tz,
    pub profile: Profile,
    pub policy: NormalizationPolicy,
    pub cors_origins: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("completion_timeout", &self.completion_timeout)
            .field("timezone", &self.timezone.name())
            .field("profile", &self.profile.as_str())
            .field("policy", &self.policy)
            .field("cors_origins", &self.cors_origins)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Parse flags and environment. Exits with usage on malformed flags.
    pub fn load() -> Result<Self, ConfigError> {
        Args::parse().into_config()
    }
}

impl Args {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let api_key = self
            .openai_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingSecret {
                name: "OPENAI_API_KEY",
            })?;

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::TemperatureOutOfRange(self.temperature));
        }

        let timezone = parse_timezone(&self.timezone)?;
        let profile: Profile = self.profile.parse()?;
        let policy = match self.fallback_chars {
            Some(limit) => profile.policy().with_fallback_chars(limit)?,
            None => profile.policy(),
        };

        Ok(Config {
            api_key,
            openai_base_url: self.openai_base_url,
            model: self.model,
            temperature: self.temperature,
            completion_timeout: Duration::from_secs(self.completion_timeout_secs),
            timezone,
            profile,
            policy,
            cors_origins: self.cors_origins,
            port: self.port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clarh_core::policy::{FallbackNaming, TaskDatePolicy};

    fn args() -> Args {
        Args {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-mini".to_string(),
            temperature: 0.1,
            completion_timeout_secs: 30,
            timezone: DEFAULT_TIMEZONE.to_string(),
            profile: "standard".to_string(),
            fallback_chars: None,
            cors_origins: "*".to_string(),
            port: 3000,
        }
    }

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_produce_standard_profile() {
        let config = args().into_config().expect("defaults should validate");
        assert_eq!(config.profile, Profile::Standard);
        assert_eq!(config.policy, NormalizationPolicy::default());
        assert_eq!(config.timezone.name(), "America/Toronto");
        assert_eq!(config.completion_timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_or_blank_api_key_is_fatal() {
        let mut missing = args();
        missing.openai_api_key = None;
        assert_eq!(
            missing.into_config().expect_err("missing key must fail"),
            ConfigError::MissingSecret {
                name: "OPENAI_API_KEY"
            }
        );

        let mut blank = args();
        blank.openai_api_key = Some("   ".to_string());
        assert!(blank.into_config().is_err());
    }

    #[test]
    fn bad_timezone_is_fatal() {
        let mut bad = args();
        bad.timezone = "Moon/Tranquility".to_string();
        assert!(matches!(
            bad.into_config(),
            Err(ConfigError::InvalidTimezone { .. })
        ));
    }

    #[test]
    fn profile_and_fallback_override_combine() {
        let mut inbox = args();
        inbox.profile = "inbox".to_string();
        inbox.fallback_chars = Some(24);
        let config = inbox.into_config().expect("should validate");
        assert_eq!(config.policy.task_dates, TaskDatePolicy::StartOfDay);
        assert_eq!(config.policy.fallback, FallbackNaming::Chars(24));
    }

    #[test]
    fn temperature_outside_provider_range_is_rejected() {
        let mut hot = args();
        hot.temperature = 3.5;
        assert_eq!(
            hot.into_config().expect_err("out of range"),
            ConfigError::TemperatureOutOfRange(3.5)
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = args().into_config().expect("should validate");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("<redacted>"));
    }
}
