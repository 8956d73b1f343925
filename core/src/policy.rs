//! Normalization profiles.
//!
//! Deployed revisions of the endpoint disagreed on how Task dates and fallback
//! names are shaped. Each choice is a knob here, and the named profiles bundle
//! the combinations that shipped.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::record::RecordType;

/// What a dated Task carries in `datetime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDatePolicy {
    /// `datetime` is always null for Tasks; only `due_date` is kept.
    DateOnly,
    /// `datetime` is the start of the due date (00:00 in the reference zone).
    StartOfDay,
}

/// What an undated Task carries in its date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndatedTaskPolicy {
    Null,
    /// `due_date`, `datetime` and `readable_datetime` are the literal `Inbox`.
    Inbox,
}

pub const INBOX: &str = "Inbox";

/// How a missing name/title is synthesized from the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackNaming {
    /// First N whitespace-separated words (4 for Task/Event, 3 for Note).
    Words,
    /// First N characters, trailing whitespace trimmed.
    Chars(usize),
}

impl FallbackNaming {
    pub fn word_limit(record_type: RecordType) -> usize {
        match record_type {
            RecordType::Task | RecordType::Event => 4,
            RecordType::Note => 3,
        }
    }

    pub fn apply(self, text: &str, record_type: RecordType) -> String {
        match self {
            FallbackNaming::Words => text
                .split_whitespace()
                .take(Self::word_limit(record_type))
                .collect::<Vec<_>>()
                .join(" "),
            FallbackNaming::Chars(limit) => text
                .trim()
                .chars()
                .take(limit)
                .collect::<String>()
                .trim_end()
                .to_string(),
        }
    }
}

pub const COMPACT_FALLBACK_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Standard,
    Inbox,
    Compact,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Standard => "standard",
            Profile::Inbox => "inbox",
            Profile::Compact => "compact",
        }
    }

    pub fn policy(self) -> NormalizationPolicy {
        match self {
            Profile::Standard => NormalizationPolicy {
                task_dates: TaskDatePolicy::DateOnly,
                undated_task: UndatedTaskPolicy::Null,
                fallback: FallbackNaming::Words,
            },
            Profile::Inbox => NormalizationPolicy {
                task_dates: TaskDatePolicy::StartOfDay,
                undated_task: UndatedTaskPolicy::Inbox,
                fallback: FallbackNaming::Words,
            },
            Profile::Compact => NormalizationPolicy {
                task_dates: TaskDatePolicy::DateOnly,
                undated_task: UndatedTaskPolicy::Null,
                fallback: FallbackNaming::Chars(COMPACT_FALLBACK_CHARS),
            },
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "" => Ok(Profile::Standard),
            "inbox" => Ok(Profile::Inbox),
            "compact" => Ok(Profile::Compact),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationPolicy {
    pub task_dates: TaskDatePolicy,
    pub undated_task: UndatedTaskPolicy,
    pub fallback: FallbackNaming,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Profile::Standard.policy()
    }
}

impl NormalizationPolicy {
    /// Replace the fallback with a character-count truncation.
    pub fn with_fallback_chars(mut self, limit: usize) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::ZeroFallbackLength);
        }
        self.fallback = FallbackNaming::Chars(limit);
        Ok(self)
    }
}
