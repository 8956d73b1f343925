use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Loosely-typed model output. Absent keys and explicit nulls mean the same thing.
pub type RawRecord = Map<String, Value>;

/// Which of the three productivity records the input became.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RecordType {
    Task,
    Event,
    Note,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Task => "Task",
            RecordType::Event => "Event",
            RecordType::Note => "Note",
        }
    }

    /// Case-insensitive parse of whatever the model put in `type`.
    pub fn parse_loose(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Some(RecordType::Task),
            "event" => Some(RecordType::Event),
            "note" => Some(RecordType::Note),
            _ => None,
        }
    }
}

/// The normalized record returned to callers. Every key is always serialized;
/// fields that do not apply to `type` are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassifiedRecord {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Short action name, Task only
    pub task_name: Option<String>,
    /// Short title, Event only
    pub event_name: Option<String>,
    /// 1-3 word topic, Note only
    pub note_title: Option<String>,
    /// Civil date (`YYYY-MM-DD`) for a dated Task, or the `Inbox` placeholder
    pub due_date: Option<String>,
    /// Full timestamp in the reference timezone
    pub datetime: Option<String>,
    /// Friendly rendering such as `Wed, 10/14 3:00 PM`
    pub readable_datetime: Option<String>,
    /// Place named in the text; never inferred
    pub location: Option<String>,
    /// The verbatim request text
    pub original_text: String,
}

/// Read a string field from the raw record. Blank strings and non-string
/// values are treated as absent.
pub fn raw_str(raw: &RawRecord, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
