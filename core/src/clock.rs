use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::ConfigError;

/// Format used for the reference time embedded in prompts.
pub const REFERENCE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_TIMEZONE: &str = "America/Toronto";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Resolve an IANA zone name. A bad name is a deployment error.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    let trimmed = name.trim();
    trimmed
        .parse::<Tz>()
        .map_err(|e| ConfigError::InvalidTimezone {
            name: trimmed.to_string(),
            reason: e.to_string(),
        })
}

/// "Now" in the fixed civil timezone the prompt grounds relative dates in.
#[derive(Clone)]
pub struct ReferenceClock {
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl ReferenceClock {
    pub fn new(tz: Tz, clock: Arc<dyn Clock>) -> Self {
        Self { tz, clock }
    }

    pub fn system(tz: Tz) -> Self {
        Self::new(tz, Arc::new(SystemClock))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now_utc().with_timezone(&self.tz)
    }
}

/// Civil time as `YYYY-MM-DD HH:MM:SS`.
pub fn render_reference_time(now: &DateTime<Tz>) -> String {
    now.format(REFERENCE_TIME_FORMAT).to_string()
}

impl std::fmt::Debug for ReferenceClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceClock")
            .field("tz", &self.tz.name())
            .finish_non_exhaustive()
    }
}
