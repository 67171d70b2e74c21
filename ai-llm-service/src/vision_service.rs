//! Provider facade without async-trait or dynamic trait objects.
//!
//! [`VisionService`] wraps the concrete provider clients and exposes one
//! `predict` call. Construct once at startup, wrap in `Arc`, share.
//!
//! # Example
//! ```no_run
//! use ai_llm_service::{GenerationParams, VisionRequest, VisionService};
//! use ai_llm_service::config::default_config::config_from_env;
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = VisionService::from_config(config_from_env()?)?;
//! let req = VisionRequest::new("Describe this image", "https://example.com/a.jpg", GenerationParams::CAPTIONS);
//! let text = svc.predict(&req).await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ProviderError, ProviderErrorKind},
    services::{open_ai_service::OpenAiService, vertex_service::VertexService},
    vision_request::VisionRequest,
};

/// Concrete vision client with enum dispatch.
#[derive(Debug)]
pub enum VisionService {
    Vertex(VertexService),
    OpenAi(OpenAiService),
}

impl VisionService {
    /// Constructs the provider client selected by `cfg.provider`.
    ///
    /// # Errors
    /// Propagates constructor validation errors of the concrete client.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        debug!(provider = %cfg.provider, endpoint = %cfg.endpoint, "initializing vision service");
        Ok(match cfg.provider {
            LlmProvider::Vertex => VisionService::Vertex(VertexService::new(cfg)?),
            LlmProvider::OpenAI => VisionService::OpenAi(OpenAiService::new(cfg)?),
        })
    }

    /// Runs one prediction and returns the raw text of the first prediction.
    pub async fn predict(&self, req: &VisionRequest<'_>) -> Result<String, AiLlmError> {
        match self {
            VisionService::Vertex(svc) => svc.predict(req).await,
            VisionService::OpenAi(svc) => svc.generate(req).await,
        }
    }

    /// Bearer credential for the active provider; Vertex tokens are refreshed on demand.
    pub async fn bearer_token(&self) -> Result<String, AiLlmError> {
        match self {
            VisionService::Vertex(svc) => svc.access_token().await,
            VisionService::OpenAi(svc) => svc.config().api_key.clone().ok_or_else(|| {
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::MissingApiKey).into()
            }),
        }
    }

    pub fn config(&self) -> &LlmModelConfig {
        match self {
            VisionService::Vertex(svc) => svc.config(),
            VisionService::OpenAi(svc) => svc.config(),
        }
    }
}
