//! Vertex AI prediction client for multimodal (image + text) models.
//!
//! Targets custom/model-garden endpoints that accept vLLM-style instances:
//! - POST {endpoint}/{endpoint_name}:predict
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Vertex`
//! - credentials must be present: a service-account key file (`cfg.credentials_file`)
//!   or a fixed access token (`cfg.api_key`), see [`VertexAuth`]
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.model` (endpoint resource name) must not be empty

use std::time::Instant;

use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, HttpError, ProviderError, ProviderErrorKind, make_snippet,
    },
    services::vertex_auth::VertexAuth,
    vision_request::VisionRequest,
};

/// Thin client for a Vertex AI endpoint.
#[derive(Debug)]
pub struct VertexService {
    client: reqwest::Client,
    auth: VertexAuth,
    cfg: LlmModelConfig,
    url_predict: String,
}

impl VertexService {
    /// Creates a new [`VertexService`] from the given config.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::InvalidProvider`] if `cfg.provider` is not Vertex
    /// - [`ProviderErrorKind::MissingApiKey`] if no credentials are configured
    /// - [`ProviderErrorKind::Credentials`] if the service-account key is unusable
    /// - [`ProviderErrorKind::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`ConfigError::MissingVar`] if the endpoint resource name is empty
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Vertex {
            return Err(
                ProviderError::new(LlmProvider::Vertex, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let base = cfg.base_url();
        if base.is_empty() || !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ProviderError::new(
                LlmProvider::Vertex,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let endpoint_name = cfg.model.trim().trim_matches('/');
        if endpoint_name.is_empty() {
            return Err(ConfigError::MissingVar("ENDPOINT_NAME").into());
        }

        let auth = VertexAuth::from_config(&cfg)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout_or_default())
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()?;

        let url_predict = format!("{base}/{endpoint_name}:predict");

        info!(
            provider = %cfg.provider,
            endpoint = %cfg.endpoint,
            endpoint_name = %endpoint_name,
            timeout_secs = cfg.timeout_or_default().as_secs(),
            "VertexService initialized"
        );

        Ok(Self {
            client,
            auth,
            cfg,
            url_predict,
        })
    }

    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Current bearer token; refreshed by the credential source when needed.
    pub async fn access_token(&self) -> Result<String, AiLlmError> {
        self.auth.token().await
    }

    /// Sends a single-instance prediction and returns the first prediction's text.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::HttpStatus`] for non-2xx responses
    /// - [`ProviderErrorKind::TokenFetch`] if no access token could be obtained
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`ProviderErrorKind::Decode`] if the JSON cannot be parsed
    /// - [`ProviderErrorKind::EmptyPredictions`] if no predictions are returned
    #[instrument(skip_all, fields(image_url = %req.image_url))]
    pub async fn predict(&self, req: &VisionRequest<'_>) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = PredictRequest::from_request(req);

        debug!(
            prompt_len = req.prompt.len(),
            max_tokens = req.params.max_tokens,
            "POST {}", self.url_predict
        );

        let token = self.auth.token().await?;
        let resp = self
            .client
            .post(&self.url_predict)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_predict.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Vertex :predict returned non-success status"
            );

            return Err(ProviderError::new(
                LlmProvider::Vertex,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: PredictResponse = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode :predict response"
            );
            ProviderError::new(
                LlmProvider::Vertex,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `predictions[0]`")),
            )
        })?;

        let first = out.predictions.into_iter().next().ok_or_else(|| {
            ProviderError::new(LlmProvider::Vertex, ProviderErrorKind::EmptyPredictions)
        })?;
        let text = prediction_text(first)?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            response_len = text.len(),
            "prediction completed"
        );

        Ok(text)
    }
}

/// Extracts text from a single prediction.
///
/// Model-garden containers return plain strings; some custom containers wrap
/// the text in an object.
fn prediction_text(value: Value) -> Result<String, AiLlmError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Object(map) => ["content", "text", "output", "generated_text"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str).map(str::to_string))
            .ok_or_else(|| {
                ProviderError::new(
                    LlmProvider::Vertex,
                    ProviderErrorKind::Decode(
                        "prediction object has no text field (content/text/output)".into(),
                    ),
                )
                .into()
            }),
        other => Err(ProviderError::new(
            LlmProvider::Vertex,
            ProviderErrorKind::Decode(format!("unexpected prediction type: {other}")),
        )
        .into()),
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [PredictInstance<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
    multi_modal_data: MultiModalData<'a>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct MultiModalData<'a> {
    image: &'a str,
}

impl<'a> PredictRequest<'a> {
    fn from_request(req: &VisionRequest<'a>) -> Self {
        Self {
            instances: [PredictInstance {
                prompt: req.prompt,
                multi_modal_data: MultiModalData {
                    image: req.image_url,
                },
                max_tokens: req.params.max_tokens,
                temperature: req.params.temperature,
                top_p: req.params.top_p,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Value>,
}
