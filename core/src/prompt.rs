use crate::policy::{NormalizationPolicy, TaskDatePolicy, UndatedTaskPolicy};

/// Exact key set the model must return.
pub const OUTPUT_KEYS: [&str; 9] = [
    "type",
    "task_name",
    "event_name",
    "note_title",
    "due_date",
    "datetime",
    "readable_datetime",
    "location",
    "original_text",
];

/// Build the system instruction for one classification call.
///
/// `reference_time` is the civil "now" in `tz_name`; the user text goes last,
/// verbatim.
pub fn compose(
    text: &str,
    reference_time: &str,
    tz_name: &str,
    policy: &NormalizationPolicy,
) -> String {
    let task_date_rules = task_date_rules(policy);

    format!(
        r#"You are a STRICT classifier and parser for a productivity app.

Your job:
- Classify the input as exactly one of Task, Event, or Note
- Extract dates, times, and locations
- Follow ALL rules exactly

## Reference time
Current datetime ({tz_name}): "{reference_time}"

Resolve every relative expression (today, tomorrow, tonight, later today,
next Friday, in 2 hours) against this reference time.
ALL dates and times MUST be expressed in {tz_name} civil time.

## Types

1) Task: the user must take an action.
Any text where the user is the implied actor is a Task, including casual or
continuous phrasing ("washing dishes today", "need to buy milk",
"going grocery shopping tonight"). Imperative verbs are not required.
Date words like "today" or "tonight" do NOT make it an Event.
{task_date_rules}
- event_name = null, note_title = null

2) Event: something that happens at a scheduled time.
Examples: "dentist appointment at 3pm", "birthday party Friday", "meeting at Starbucks".
- Appointment or gathering nouns, OR an explicit clock time (3pm, 14:00)
- datetime REQUIRED: full ISO 8601 timestamp
- readable_datetime REQUIRED (e.g. "Wed, 10/14 3:00 PM")
- due_date MUST be null
- task_name = null, note_title = null

3) Note: informational only.
Examples: "laptop charger broke", "idea for startup", "reading books is good".
- due_date, datetime, readable_datetime and location MUST be null
- task_name = null, event_name = null

## Location
Extract a location only when the text explicitly names a place:
businesses (Walmart, Costco), landmarks (mall, airport, City Hall),
homes (mom's house, my place), proper nouns (Yorkdale), addresses (123 Main St),
or a phrase led by at, in, to, from, near, by, around.
If there is no such evidence, location = null. Never guess.

## Naming
- task_name: 2-4 word action
- event_name: short title
- note_title: 1-3 word topic

## Output
Return ONLY a JSON object with exactly these keys and nothing else:
{{
  "type": "Task" | "Event" | "Note",
  "task_name": string | null,
  "event_name": string | null,
  "note_title": string | null,
  "due_date": string | null,
  "datetime": string | null,
  "readable_datetime": string | null,
  "location": string | null,
  "original_text": string
}}

User text:
"{text}""#
    )
}

fn task_date_rules(policy: &NormalizationPolicy) -> String {
    let dated = match policy.task_dates {
        TaskDatePolicy::DateOnly => {
            "- If a date exists: due_date = YYYY-MM-DD, datetime = null, \
             readable_datetime = friendly date (e.g. \"Sun, 12/14\")"
        }
        TaskDatePolicy::StartOfDay => {
            "- If a date exists: due_date = YYYY-MM-DD, datetime = ISO start-of-day \
             (00:00), readable_datetime = friendly date (e.g. \"Sun, 12/14\")"
        }
    };
    let undated = match policy.undated_task {
        UndatedTaskPolicy::Null => {
            "- If NO date: due_date = null, datetime = null, readable_datetime = null"
        }
        UndatedTaskPolicy::Inbox => {
            "- If NO date: due_date = \"Inbox\", datetime = \"Inbox\", \
             readable_datetime = \"Inbox\""
        }
    };
    format!("- May include a date and/or location\n{dated}\n{undated}")
}
