//! Normalization and guardrail layer between a completion model and the
//! Task / Event / Note schema.

pub mod clock;
pub mod error;
pub mod extract;
pub mod guardrail;
pub mod normalize;
pub mod policy;
pub mod prompt;
pub mod record;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::extract::{ExtractionKind, extract_record};
use crate::guardrail::Override;
use crate::normalize::{NormalizeContext, normalize};
use crate::policy::NormalizationPolicy;
use crate::record::ClassifiedRecord;

/// Outcome of post-processing one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub record: ClassifiedRecord,
    pub extraction: ExtractionKind,
    pub guardrail: Option<Override>,
}

/// Extract, guard and normalize the raw model text for `input`.
pub fn finish_completion(
    raw: &str,
    input: &str,
    now: DateTime<Tz>,
    policy: &NormalizationPolicy,
) -> Finished {
    let extraction = extract_record(raw);
    let extraction_kind = extraction.kind();
    if extraction_kind == ExtractionKind::Empty {
        tracing::warn!("model output contained no JSON object; normalizing an empty record");
    }
    let mut record = extraction.into_record();

    let signals = guardrail::inspect(input);
    let applied = guardrail::apply(&mut record, &signals);
    if let Some(applied) = &applied {
        tracing::info!(
            reason = applied.reason.as_str(),
            model_type = applied.model_type.as_deref().unwrap_or("<missing>"),
            "guardrail forced Event"
        );
    }

    let ctx = NormalizeContext {
        input,
        now,
        policy,
        signals: &signals,
    };

    Finished {
        record: normalize(&record, &ctx),
        extraction: extraction_kind,
        guardrail: applied,
    }
}
