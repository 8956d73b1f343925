//! Lenient parsing of model output.
//!
//! Models wrap JSON in commentary or code fences often enough that a strict
//! parse alone is not usable. Extraction never fails: the worst case is an
//! empty record that the normalizer still turns into a valid Note.

use serde_json::Value;

use crate::record::RawRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The whole output was a JSON object.
    Direct(RawRecord),
    /// A JSON object was recovered from between the first `{` and the last `}`.
    Embedded(RawRecord),
    /// Nothing usable; every field is absent.
    Empty,
}

/// Which extraction stage produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionKind {
    Direct,
    Embedded,
    Empty,
}

impl ExtractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionKind::Direct => "direct",
            ExtractionKind::Embedded => "embedded",
            ExtractionKind::Empty => "empty",
        }
    }
}

impl Extraction {
    pub fn kind(&self) -> ExtractionKind {
        match self {
            Extraction::Direct(_) => ExtractionKind::Direct,
            Extraction::Embedded(_) => ExtractionKind::Embedded,
            Extraction::Empty => ExtractionKind::Empty,
        }
    }

    pub fn into_record(self) -> RawRecord {
        match self {
            Extraction::Direct(record) | Extraction::Embedded(record) => record,
            Extraction::Empty => RawRecord::new(),
        }
    }
}

pub fn extract_record(raw: &str) -> Extraction {
    if let Some(record) = parse_object(raw.trim()) {
        return Extraction::Direct(record);
    }

    match embedded_object(raw).and_then(parse_object) {
        Some(record) => Extraction::Embedded(record),
        None => Extraction::Empty,
    }
}

fn parse_object(candidate: &str) -> Option<RawRecord> {
    match serde_json::from_str::<Value>(candidate).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Greedy slice from the first `{` to the last `}`.
fn embedded_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
