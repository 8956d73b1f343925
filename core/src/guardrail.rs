use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use serde_json::Value;

use crate::record::{RawRecord, RecordType, raw_str};

/// Words that signal a scheduled gathering.
pub const EVENT_NOUNS: [&str; 9] = [
    "appointment",
    "meeting",
    "party",
    "event",
    "session",
    "conference",
    "wedding",
    "dinner",
    "lunch",
];

static TWELVE_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([0-9]{1,2})(?::([0-9]{2}))?\s?(am|pm)\b").expect("valid 12-hour clock regex")
});
static TWENTY_FOUR_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([01]?[0-9]|2[0-3]):([0-5][0-9])\b").expect("valid 24-hour clock regex")
});
static EVENT_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", EVENT_NOUNS.join("|"))).expect("valid event noun regex")
});

/// Lexical evidence found in the input text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    pub explicit_time: bool,
    /// First event noun found, lowercased
    pub event_noun: Option<String>,
    /// Earliest clock time that parses to a valid time of day
    pub clock_time: Option<NaiveTime>,
}

impl Signals {
    pub fn forces_event(&self) -> bool {
        self.explicit_time || self.event_noun.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideReason {
    ExplicitTime,
    EventNoun,
}

impl OverrideReason {
    pub fn as_str(self) -> &'static str {
        match self {
            OverrideReason::ExplicitTime => "explicit_time",
            OverrideReason::EventNoun => "event_noun",
        }
    }
}

/// Recorded when the guardrail changed the model's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub reason: OverrideReason,
    /// What the model said, if anything
    pub model_type: Option<String>,
}

pub fn has_explicit_time(text: &str) -> bool {
    TWELVE_HOUR_RE.is_match(text) || TWENTY_FOUR_HOUR_RE.is_match(text)
}

pub fn has_event_noun(text: &str) -> bool {
    EVENT_NOUN_RE.is_match(text)
}

pub fn inspect(text: &str) -> Signals {
    Signals {
        explicit_time: has_explicit_time(text),
        event_noun: EVENT_NOUN_RE
            .find(text)
            .map(|m| m.as_str().to_ascii_lowercase()),
        clock_time: first_clock_time(text),
    }
}

/// Force `type = "Event"` when the text carries an explicit time or an event noun.
///
/// Never forces away from Event. Returns the override when the model's type
/// was something else.
pub fn apply(raw: &mut RawRecord, signals: &Signals) -> Option<Override> {
    if !signals.forces_event() {
        return None;
    }

    let model_type = raw_str(raw, "type");
    raw.insert(
        "type".to_string(),
        Value::String(RecordType::Event.as_str().to_string()),
    );

    let already_event = model_type
        .as_deref()
        .and_then(RecordType::parse_loose)
        .is_some_and(|t| t == RecordType::Event);
    if already_event {
        return None;
    }

    let reason = if signals.explicit_time {
        OverrideReason::ExplicitTime
    } else {
        OverrideReason::EventNoun
    };
    Some(Override { reason, model_type })
}

fn first_clock_time(text: &str) -> Option<NaiveTime> {
    let twelve = TWELVE_HOUR_RE.captures_iter(text).find_map(|caps| {
        let start = caps.get(0)?.start();
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = caps.get(3)?.as_str().eq_ignore_ascii_case("pm");
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        Some((start, NaiveTime::from_hms_opt(hour, minute, 0)?))
    });

    let twenty_four = TWENTY_FOUR_HOUR_RE.captures_iter(text).find_map(|caps| {
        let start = caps.get(0)?.start();
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        Some((start, NaiveTime::from_hms_opt(hour, minute, 0)?))
    });

    // A 12-hour match starting at the same place ("3:30 pm") carries the meridiem.
    match (twelve, twenty_four) {
        (Some(a), Some(b)) if b.0 < a.0 => Some(b.1),
        (Some(a), _) => Some(a.1),
        (None, b) => b.map(|(_, time)| time),
    }
}
