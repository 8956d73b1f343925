use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, TimeZone};
use chrono_tz::Tz;

use crate::guardrail::Signals;
use crate::policy::{INBOX, NormalizationPolicy, TaskDatePolicy, UndatedTaskPolicy};
use crate::record::{ClassifiedRecord, RawRecord, RecordType, raw_str};

const DATE_FORMAT: &str = "%Y-%m-%d";
const READABLE_DATE_FORMAT: &str = "%a, %m/%d";
const READABLE_DATETIME_FORMAT: &str = "%a, %m/%d %-I:%M %p";
const NAIVE_TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Everything the normalizer needs besides the raw record.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub input: &'a str,
    pub now: DateTime<Tz>,
    pub policy: &'a NormalizationPolicy,
    pub signals: &'a Signals,
}

/// Enforce the per-type field invariants on whatever the model produced.
pub fn normalize(raw: &RawRecord, ctx: &NormalizeContext<'_>) -> ClassifiedRecord {
    let record_type = raw_str(raw, "type")
        .as_deref()
        .and_then(RecordType::parse_loose)
        .unwrap_or(RecordType::Note);

    let mut record = ClassifiedRecord {
        record_type,
        task_name: None,
        event_name: None,
        note_title: None,
        due_date: None,
        datetime: None,
        readable_datetime: None,
        location: raw_str(raw, "location"),
        original_text: ctx.input.to_string(),
    };

    match record_type {
        RecordType::Task => fill_task(&mut record, raw, ctx),
        RecordType::Event => fill_event(&mut record, raw, ctx),
        RecordType::Note => {
            record.location = None;
            record.note_title =
                Some(raw_str(raw, "note_title").unwrap_or_else(|| fallback(ctx, RecordType::Note)));
        }
    }

    record
}

fn fallback(ctx: &NormalizeContext<'_>, record_type: RecordType) -> String {
    ctx.policy.fallback.apply(ctx.input, record_type)
}

fn fill_task(record: &mut ClassifiedRecord, raw: &RawRecord, ctx: &NormalizeContext<'_>) {
    let tz = ctx.now.timezone();
    record.task_name =
        Some(raw_str(raw, "task_name").unwrap_or_else(|| fallback(ctx, RecordType::Task)));

    let due = raw_str(raw, "due_date")
        .as_deref()
        .and_then(|s| parse_day(s, tz))
        .or_else(|| {
            raw_str(raw, "datetime")
                .as_deref()
                .and_then(|s| parse_day(s, tz))
        });

    match due {
        Some(date) => {
            record.due_date = Some(date.format(DATE_FORMAT).to_string());
            record.datetime = match ctx.policy.task_dates {
                TaskDatePolicy::DateOnly => None,
                TaskDatePolicy::StartOfDay => {
                    Some(render_timestamp(tz, date.and_time(NaiveTime::MIN)))
                }
            };
            record.readable_datetime = raw_str(raw, "readable_datetime")
                .filter(|s| s != INBOX)
                .or_else(|| Some(date.format(READABLE_DATE_FORMAT).to_string()));
        }
        None => {
            let placeholder = match ctx.policy.undated_task {
                UndatedTaskPolicy::Null => None,
                UndatedTaskPolicy::Inbox => Some(INBOX.to_string()),
            };
            record.due_date = placeholder.clone();
            record.datetime = placeholder.clone();
            record.readable_datetime = placeholder;
        }
    }
}

fn fill_event(record: &mut ClassifiedRecord, raw: &RawRecord, ctx: &NormalizeContext<'_>) {
    let tz = ctx.now.timezone();
    record.event_name =
        Some(raw_str(raw, "event_name").unwrap_or_else(|| fallback(ctx, RecordType::Event)));

    let model_datetime = raw_str(raw, "datetime");
    let parsed = model_datetime
        .as_deref()
        .and_then(|s| parse_timestamp(s, tz));

    let civil = parsed.or_else(|| {
        let date_hint = raw_str(raw, "due_date")
            .as_deref()
            .and_then(|s| parse_day(s, tz))
            .or_else(|| model_datetime.as_deref().and_then(parse_date));
        match (ctx.signals.clock_time, date_hint) {
            (Some(time), date) => Some(date.unwrap_or_else(|| ctx.now.date_naive()).and_time(time)),
            (None, Some(date)) => Some(date.and_time(NaiveTime::MIN)),
            // Time was written but is not a valid time of day ("13pm").
            (None, None) if ctx.signals.explicit_time => {
                Some(ctx.now.naive_local().trunc_subsecs(0))
            }
            (None, None) => None,
        }
    });

    record.datetime = civil.map(|c| render_timestamp(tz, c));
    record.readable_datetime = raw_str(raw, "readable_datetime")
        .filter(|s| s != INBOX)
        .or_else(|| civil.map(|c| c.format(READABLE_DATETIME_FORMAT).to_string()));
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.get(..10)?, DATE_FORMAT).ok()
}

/// Civil date of a timestamp in `tz`, or the leading `YYYY-MM-DD` of anything else.
fn parse_day(value: &str, tz: Tz) -> Option<NaiveDate> {
    parse_timestamp(value, tz)
        .map(|ts| ts.date())
        .or_else(|| parse_date(value))
}

/// Parse a model timestamp into civil time in `tz`. Offsets are honoured;
/// naive timestamps are taken to already be civil time.
fn parse_timestamp(value: &str, tz: Tz) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.with_timezone(&tz).naive_local());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// RFC 3339 with the zone's offset; falls back to a naive rendering inside a DST gap.
fn render_timestamp(tz: Tz, civil: NaiveDateTime) -> String {
    match tz.from_local_datetime(&civil).earliest() {
        Some(local) => local.to_rfc3339(),
        None => civil.format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}
