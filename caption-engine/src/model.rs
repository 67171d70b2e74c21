use std::{future::Future, pin::Pin};

use ai_llm_service::{AiLlmError, ConfigError, VisionRequest, VisionService};

/// Boxed future returned by [`CaptionModel::complete`].
pub type ModelFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;

/// Anything that can turn an image + instructions into raw model text.
///
/// Implemented by [`VisionService`] for production and by fakes in tests.
pub trait CaptionModel: Send + Sync {
    /// Runs one prediction and returns the text of the first prediction.
    fn complete<'a>(&'a self, request: VisionRequest<'a>) -> ModelFuture<'a>;
}

impl CaptionModel for VisionService {
    fn complete<'a>(&'a self, request: VisionRequest<'a>) -> ModelFuture<'a> {
        Box::pin(async move { self.predict(&request).await })
    }
}

/// Stand-in used when the model could not be configured at startup.
///
/// Every call fails with [`ConfigError::Unconfigured`], so callers get a
/// server error instead of an empty batch.
#[derive(Debug, Clone)]
pub struct UnconfiguredModel {
    reason: String,
}

impl UnconfiguredModel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl CaptionModel for UnconfiguredModel {
    fn complete<'a>(&'a self, _request: VisionRequest<'a>) -> ModelFuture<'a> {
        let reason = self.reason.clone();
        Box::pin(async move { Err(ConfigError::Unconfigured(reason).into()) })
    }
}
