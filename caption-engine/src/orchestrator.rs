//! Caption generation with bounded, sequential retries.
//!
//! State machine per request:
//!
//! ```text
//! Attempting(n, last) --(>= min_accepted captions)--> Accepted
//! Attempting(n, last) --(too few or failed, n < max)-> Attempting(n + 1, last')
//! Attempting(n, last) --(too few or failed, n == max)> Exhausted (keeps last')
//! ```
//!
//! `last` is the most recent successful extraction. A failed attempt
//! (transport error, upstream 5xx/429, decode error or per-attempt timeout)
//! uses up an attempt but leaves `last` untouched. Fatal model errors
//! (unconfigured, 401/403) abort immediately.

use std::{sync::Arc, time::Duration};

use ai_llm_service::{AiLlmError, GenerationParams, VisionRequest};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::{
    errors::{CaptionError, CaptionResult},
    extractor::extract_captions,
    model::CaptionModel,
    prompt::build_prompt,
};

/// Number of slots in every caption batch.
pub const CAPTION_COUNT: usize = 10;

/// Retry knobs. Defaults: 3 attempts, accept at 6 captions, 45 s per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_accepted: usize,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_accepted: 6,
            attempt_timeout: Duration::from_secs(45),
        }
    }
}

/// How the retry loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchOutcome {
    /// An attempt reached the acceptance threshold.
    Accepted,
    /// All attempts fell short; the last successful extraction was kept.
    Exhausted,
}

/// Exactly [`CAPTION_COUNT`] captions for one image; blanks pad a short result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionBatch {
    image_url: String,
    captions: Vec<String>,
    attempts: u32,
    outcome: BatchOutcome,
}

impl CaptionBatch {
    /// Builds a batch, truncating or padding `captions` to [`CAPTION_COUNT`].
    pub fn new(
        image_url: impl Into<String>,
        captions: Vec<String>,
        attempts: u32,
        outcome: BatchOutcome,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            captions: pad_to_batch(captions),
            attempts,
            outcome,
        }
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    pub fn into_captions(self) -> Vec<String> {
        self.captions
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn outcome(&self) -> BatchOutcome {
        self.outcome
    }

    /// Number of real (non-placeholder) captions.
    pub fn filled(&self) -> usize {
        self.captions.iter().filter(|c| !c.is_empty()).count()
    }
}

/// Truncates to [`CAPTION_COUNT`] and pads with empty strings.
pub fn pad_to_batch(mut captions: Vec<String>) -> Vec<String> {
    captions.truncate(CAPTION_COUNT);
    captions.resize(CAPTION_COUNT, String::new());
    captions
}

enum RetryState {
    Attempting { n: u32, last: Vec<String> },
    Accepted { captions: Vec<String>, attempts: u32 },
    Exhausted { captions: Vec<String>, attempts: u32 },
}

/// Caption generation orchestrator. Cheap to clone and share.
#[derive(Clone)]
pub struct Captioner {
    model: Arc<dyn CaptionModel>,
    policy: RetryPolicy,
}

impl Captioner {
    pub fn new(model: Arc<dyn CaptionModel>) -> Self {
        Self::with_policy(model, RetryPolicy::default())
    }

    pub fn with_policy(model: Arc<dyn CaptionModel>, policy: RetryPolicy) -> Self {
        Self { model, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Generates a batch of captions for `image_url`.
    ///
    /// # Errors
    /// - [`CaptionError::MissingImageUrl`] for a blank URL (no model call)
    /// - [`CaptionError::Model`] when the model is unconfigured or rejects auth
    #[instrument(skip(self, prompt), fields(has_prompt = prompt.is_some()))]
    pub async fn generate(
        &self,
        image_url: &str,
        prompt: Option<&str>,
    ) -> CaptionResult<CaptionBatch> {
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(CaptionError::MissingImageUrl);
        }

        let instructions = build_prompt(prompt);
        let request = VisionRequest::new(&instructions, image_url, GenerationParams::CAPTIONS);
        let max_attempts = self.policy.max_attempts.max(1);

        let mut state = RetryState::Attempting {
            n: 1,
            last: Vec::new(),
        };
        loop {
            state = match state {
                RetryState::Attempting { n, last } => match self.attempt(n, request).await? {
                    Some(captions) if captions.len() >= self.policy.min_accepted => {
                        RetryState::Accepted {
                            captions,
                            attempts: n,
                        }
                    }
                    outcome => {
                        let last = outcome.unwrap_or(last);
                        if n >= max_attempts {
                            RetryState::Exhausted {
                                captions: last,
                                attempts: n,
                            }
                        } else {
                            info!(
                                attempt = n,
                                kept = last.len(),
                                needed = self.policy.min_accepted,
                                "too few captions, retrying"
                            );
                            RetryState::Attempting { n: n + 1, last }
                        }
                    }
                },
                RetryState::Accepted { captions, attempts } => {
                    info!(attempts, extracted = captions.len(), "caption batch accepted");
                    return Ok(CaptionBatch::new(
                        image_url,
                        captions,
                        attempts,
                        BatchOutcome::Accepted,
                    ));
                }
                RetryState::Exhausted { captions, attempts } => {
                    warn!(
                        attempts,
                        extracted = captions.len(),
                        "retries exhausted, returning padded batch"
                    );
                    return Ok(CaptionBatch::new(
                        image_url,
                        captions,
                        attempts,
                        BatchOutcome::Exhausted,
                    ));
                }
            };
        }
    }

    /// One model call. `Ok(None)` when the attempt failed but may be retried.
    async fn attempt(
        &self,
        n: u32,
        request: VisionRequest<'_>,
    ) -> CaptionResult<Option<Vec<String>>> {
        let call = self.model.complete(request);
        let result = tokio::time::timeout(self.policy.attempt_timeout, call)
            .await
            .unwrap_or_else(|_| Err(AiLlmError::Timeout(self.policy.attempt_timeout)));

        match result {
            Err(err) if err.is_fatal() => {
                error!(attempt = n, error = %err, "model call failed, not retrying");
                Err(CaptionError::Model(err))
            }
            Err(err) => {
                warn!(attempt = n, error = %err, "model call failed");
                Ok(None)
            }
            Ok(text) => {
                let captions = extract_captions(&text);
                info!(
                    attempt = n,
                    response_len = text.len(),
                    extracted = captions.len(),
                    "model call completed"
                );
                Ok(Some(captions))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Mutex,
            atomic::{AtomicU32, Ordering},
        },
    };

    use ai_llm_service::{
        AiLlmError, LlmProvider, ProviderError, ProviderErrorKind,
        error_handler::HttpError,
    };

    use super::*;
    use crate::model::{ModelFuture, UnconfiguredModel};

    /// Replays scripted responses in order; panics if called too often.
    struct ScriptedModel {
        script: Mutex<VecDeque<Result<String, AiLlmError>>>,
        calls: AtomicU32,
    }

    impl ScriptedModel {
        fn new(script: Vec<Result<String, AiLlmError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CaptionModel for ScriptedModel {
        fn complete<'a>(&'a self, _request: VisionRequest<'a>) -> ModelFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("model called more often than scripted");
            Box::pin(async move { next })
        }
    }

    struct SlowModel;

    impl CaptionModel for SlowModel {
        fn complete<'a>(&'a self, _request: VisionRequest<'a>) -> ModelFuture<'a> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("1. too late".to_string())
            })
        }
    }

    /// Answers the first call quickly, then stalls on every later one.
    #[derive(Default)]
    struct StallsAfterFirst {
        calls: AtomicU32,
    }

    impl CaptionModel for StallsAfterFirst {
        fn complete<'a>(&'a self, _request: VisionRequest<'a>) -> ModelFuture<'a> {
            let first = self.calls.fetch_add(1, Ordering::SeqCst) == 0;
            Box::pin(async move {
                if !first {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                Ok(numbered(3))
            })
        }
    }

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("{i}. caption number {i}\n")).collect()
    }

    fn server_error() -> AiLlmError {
        ProviderError::new(
            LlmProvider::Vertex,
            ProviderErrorKind::HttpStatus(HttpError {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                url: "https://vertex.test".into(),
                snippet: "busy".into(),
            }),
        )
        .into()
    }

    fn unauthorized() -> AiLlmError {
        ProviderError::new(
            LlmProvider::Vertex,
            ProviderErrorKind::HttpStatus(HttpError {
                status: reqwest::StatusCode::UNAUTHORIZED,
                url: "https://vertex.test".into(),
                snippet: "token expired".into(),
            }),
        )
        .into()
    }

    #[tokio::test]
    async fn accepts_first_attempt_with_enough_captions() {
        let model = ScriptedModel::new(vec![Ok(numbered(6))]);
        let captioner = Captioner::new(model.clone());

        let batch = captioner.generate("https://img.test/a.jpg", None).await.unwrap();

        assert_eq!(model.calls(), 1);
        assert_eq!(batch.attempts(), 1);
        assert_eq!(batch.outcome(), BatchOutcome::Accepted);
        assert_eq!(batch.captions().len(), CAPTION_COUNT);
        assert_eq!(batch.filled(), 6);
        assert_eq!(batch.captions()[6], "");
    }

    #[tokio::test]
    async fn retries_until_threshold_is_met() {
        let model = ScriptedModel::new(vec![Ok(numbered(2)), Ok(numbered(8))]);
        let captioner = Captioner::new(model.clone());

        let batch = captioner.generate("https://img.test/a.jpg", None).await.unwrap();

        assert_eq!(model.calls(), 2);
        assert_eq!(batch.outcome(), BatchOutcome::Accepted);
        assert_eq!(batch.filled(), 8);
    }

    #[tokio::test]
    async fn exhausts_after_three_attempts_and_keeps_last_result() {
        let model = ScriptedModel::new(vec![
            Ok(numbered(5)),
            Ok(numbered(4)),
            Ok("1. only one".to_string()),
        ]);
        let captioner = Captioner::new(model.clone());

        let batch = captioner.generate("https://img.test/a.jpg", None).await.unwrap();

        assert_eq!(model.calls(), 3);
        assert_eq!(batch.attempts(), 3);
        assert_eq!(batch.outcome(), BatchOutcome::Exhausted);
        assert_eq!(batch.captions()[0], "only one");
        assert_eq!(batch.filled(), 1);
        assert_eq!(batch.captions().len(), CAPTION_COUNT);
    }

    #[tokio::test]
    async fn transport_failures_count_as_empty_attempts() {
        let model = ScriptedModel::new(vec![Err(server_error()), Err(server_error()), Err(server_error())]);
        let captioner = Captioner::new(model.clone());

        let batch = captioner.generate("https://img.test/a.jpg", None).await.unwrap();

        assert_eq!(model.calls(), 3);
        assert_eq!(batch.outcome(), BatchOutcome::Exhausted);
        assert_eq!(batch.into_captions(), vec![String::new(); CAPTION_COUNT]);
    }

    #[tokio::test]
    async fn failed_last_attempt_keeps_earlier_captions() {
        let model = ScriptedModel::new(vec![Ok(numbered(5)), Ok(numbered(4)), Err(server_error())]);
        let batch = Captioner::new(model.clone())
            .generate("https://img.test/a.jpg", None)
            .await
            .unwrap();

        assert_eq!(model.calls(), 3);
        assert_eq!(batch.outcome(), BatchOutcome::Exhausted);
        assert_eq!(batch.filled(), 4);
        assert_eq!(batch.captions()[3], "caption number 4");
    }

    #[tokio::test]
    async fn failure_then_success_recovers() {
        let model = ScriptedModel::new(vec![Err(server_error()), Ok(numbered(10))]);
        let batch = Captioner::new(model.clone())
            .generate("https://img.test/a.jpg", Some("about dogs"))
            .await
            .unwrap();
        assert_eq!(model.calls(), 2);
        assert_eq!(batch.filled(), 10);
    }

    #[tokio::test]
    async fn truncates_long_results_to_ten() {
        let text = numbered(9)
            + "10. ten\nBonus caption nobody asked for\nAnother extra caption past the limit\n";
        let model = ScriptedModel::new(vec![Ok(text)]);
        let batch = Captioner::new(model)
            .generate("https://img.test/a.jpg", None)
            .await
            .unwrap();
        assert_eq!(batch.captions().len(), CAPTION_COUNT);
        assert_eq!(batch.captions()[9], "ten");
    }

    #[tokio::test]
    async fn blank_url_fails_before_any_call() {
        let model = ScriptedModel::new(vec![]);
        let err = Captioner::new(model.clone())
            .generate("   ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::MissingImageUrl));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn auth_failure_aborts_without_retry() {
        let model = ScriptedModel::new(vec![Err(unauthorized())]);
        let err = Captioner::new(model.clone())
            .generate("https://img.test/a.jpg", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Model(_)));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn unconfigured_model_is_an_error_not_an_empty_batch() {
        let captioner = Captioner::new(Arc::new(UnconfiguredModel::new("ENDPOINT_NAME missing")));
        let err = captioner
            .generate("https://img.test/a.jpg", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ENDPOINT_NAME missing"));
    }

    #[tokio::test]
    async fn timed_out_attempts_are_retried_then_exhausted() {
        let policy = RetryPolicy {
            attempt_timeout: Duration::from_millis(20),
            ..RetryPolicy::default()
        };
        let batch = Captioner::with_policy(Arc::new(SlowModel), policy)
            .generate("https://img.test/a.jpg", None)
            .await
            .unwrap();
        assert_eq!(batch.attempts(), 3);
        assert_eq!(batch.filled(), 0);
    }

    #[tokio::test]
    async fn timeout_after_short_result_keeps_it() {
        let policy = RetryPolicy {
            max_attempts: 2,
            attempt_timeout: Duration::from_millis(20),
            ..RetryPolicy::default()
        };
        let model = Arc::new(StallsAfterFirst::default());
        let batch = Captioner::with_policy(model.clone(), policy)
            .generate("https://img.test/a.jpg", None)
            .await
            .unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
        assert_eq!(batch.attempts(), 2);
        assert_eq!(batch.outcome(), BatchOutcome::Exhausted);
        assert_eq!(batch.filled(), 3);
    }

    #[test]
    fn pad_handles_every_length() {
        for len in 0..=15 {
            let raw: Vec<String> = (0..len).map(|i| format!("c{i}")).collect();
            let padded = pad_to_batch(raw);
            assert_eq!(padded.len(), CAPTION_COUNT, "input length {len}");
            assert_eq!(
                padded.iter().filter(|c| !c.is_empty()).count(),
                len.min(CAPTION_COUNT)
            );
        }
    }

    #[tokio::test]
    async fn ten_well_numbered_emoji_lines_fill_the_batch() {
        let emoji = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟"];
        let text: String = emoji
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{e} Autumn vibes, take {}\n", i + 1))
            .collect();
        let model = ScriptedModel::new(vec![Ok(text)]);
        let batch = Captioner::new(model)
            .generate("https://betterfans.app/media/Autumn-Free-image12.png", None)
            .await
            .unwrap();
        assert_eq!(batch.filled(), CAPTION_COUNT);
        assert_eq!(batch.captions()[9], "Autumn vibes, take 10");
    }
}
