use std::sync::Arc;

use clarh_core::clock::{ReferenceClock, render_reference_time};
use clarh_core::policy::NormalizationPolicy;
use clarh_core::{Finished, finish_completion, prompt};

use crate::completion::{CompletionError, CompletionProvider, CompletionRequest};

/// One prompt, one completion call, one normalized record.
pub struct Classifier {
    provider: Arc<dyn CompletionProvider>,
    clock: ReferenceClock,
    policy: NormalizationPolicy,
    temperature: f64,
}

impl Classifier {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        clock: ReferenceClock,
        policy: NormalizationPolicy,
        temperature: f64,
    ) -> Self {
        Self {
            provider,
            clock,
            policy,
            temperature,
        }
    }

    /// `text` must already be known to be non-blank.
    pub async fn classify(&self, text: &str) -> Result<Finished, CompletionError> {
        let now = self.clock.now();
        let instructions = prompt::compose(
            text,
            &render_reference_time(&now),
            self.clock.timezone().name(),
            &self.policy,
        );

        let raw = self
            .provider
            .complete(CompletionRequest {
                instructions: &instructions,
                input: text,
                temperature: self.temperature,
            })
            .await?;
        tracing::debug!(raw = %raw, "completion raw output");

        Ok(finish_completion(&raw, text, now, &self.policy))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};
    use clarh_core::clock::FixedClock;

    use super::*;
    use crate::completion::CompletionFuture;

    /// Replays a canned completion and records what it was asked.
    pub struct StubProvider {
        output: Result<String, String>,
        calls: AtomicUsize,
        last_instructions: Mutex<Option<String>>,
    }

    impl StubProvider {
        pub fn replying(output: &str) -> Arc<Self> {
            Arc::new(Self {
                output: Ok(output.to_string()),
                calls: AtomicUsize::new(0),
                last_instructions: Mutex::new(None),
            })
        }

        pub fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                output: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_instructions: Mutex::new(None),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_instructions(&self) -> Option<String> {
            self.last_instructions
                .lock()
                .expect("stub lock poisoned")
                .clone()
        }
    }

    impl CompletionProvider for StubProvider {
        fn complete<'a>(&'a self, request: CompletionRequest<'a>) -> CompletionFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_instructions.lock().expect("stub lock poisoned") =
                Some(request.instructions.to_string());
            let result = match &self.output {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(CompletionError::Provider {
                    status: 502,
                    message: message.clone(),
                }),
            };
            Box::pin(async move { result })
        }
    }

    /// Wed 2026-10-14 15:05 in Toronto.
    pub fn fixed_clock() -> ReferenceClock {
        let tz = "America/Toronto".parse().expect("zone");
        let instant = Utc
            .with_ymd_and_hms(2026, 10, 14, 19, 5, 0)
            .single()
            .expect("instant");
        ReferenceClock::new(tz, Arc::new(FixedClock(instant)))
    }

    pub fn classifier(provider: Arc<StubProvider>) -> Classifier {
        Classifier::new(provider, fixed_clock(), NormalizationPolicy::default(), 0.1)
    }
}
