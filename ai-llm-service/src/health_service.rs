//! Health probes for the configured vision model.
//!
//! - Vertex: `GET {endpoint}/{endpoint_name}` with Bearer auth (endpoint metadata)
//! - OpenAI: `GET {endpoint}/v1/models/{model}` with Bearer auth
//!
//! The bearer token comes from the live [`VisionService`], so a probe also
//! exercises Vertex token refresh.
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] is resilient and never fails (errors mapped to `ok=false`).

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet};
use crate::vision_service::VisionService;

/// A serializable health snapshot for the model backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Vertex", "OpenAI"), `None` when unconfigured.
    pub provider: Option<String>,
    /// Target endpoint base URL.
    pub endpoint: Option<String>,
    /// Endpoint resource name / model identifier.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn probed(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: Some(cfg.provider.to_string()),
            endpoint: Some(cfg.endpoint.clone()),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }

    /// Status for a model that failed to configure at startup.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            provider: None,
            endpoint: None,
            model: None,
            ok: false,
            latency_ms: 0,
            message: reason.into(),
        }
    }
}

/// Health checker reusing a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Probes the model backend behind `svc`. Never returns an error.
    pub async fn check(&self, svc: &VisionService) -> HealthStatus {
        let cfg = svc.config();
        let start = Instant::now();
        match self.try_probe(svc).await {
            Ok(()) => {
                let latency = start.elapsed().as_millis();
                info!(provider = %cfg.provider, latency_ms = latency, "health probe completed");
                HealthStatus::probed(cfg, true, latency, format!("{} endpoint is reachable", cfg.provider))
            }
            Err(err) => {
                let latency = start.elapsed().as_millis();
                warn!(
                    provider = %cfg.provider,
                    endpoint = %cfg.endpoint,
                    latency_ms = latency,
                    error = %err,
                    "health probe failed"
                );
                HealthStatus::probed(cfg, false, latency, err.to_string())
            }
        }
    }

    async fn try_probe(&self, svc: &VisionService) -> Result<(), AiLlmError> {
        let cfg = svc.config();
        let base = cfg.base_url();
        let url = match cfg.provider {
            LlmProvider::Vertex => format!("{base}/{}", cfg.model.trim().trim_matches('/')),
            LlmProvider::OpenAI => format!("{base}/v1/models/{}", cfg.model.trim()),
        };
        let token = svc.bearer_token().await?;
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout);

        debug!(provider = %cfg.provider, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .bearer_auth(token.trim())
            .send()
            .await?;

        if resp.status().is_success() {
            return Ok(());
        }

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(ProviderError::new(
            cfg.provider,
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url,
                snippet: make_snippet(&text),
            }),
        )
        .into())
    }
}
