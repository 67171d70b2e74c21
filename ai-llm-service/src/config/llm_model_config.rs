use crate::config::llm_provider::LlmProvider;

/// Connection settings for one vision-language model deployment.
///
/// Sampling parameters are not part of the connection; they travel with each
/// request as [`GenerationParams`](crate::GenerationParams).
///
/// # Fields
///
/// - `provider`: which backend to talk to.
/// - `model`: for Vertex, the endpoint resource name
///   (`projects/<p>/locations/<l>/endpoints/<id>`); for OpenAI, the model id.
/// - `endpoint`: REST base URL (e.g. `https://us-central1-aiplatform.googleapis.com/v1`).
/// - `api_key`: bearer token (fixed Vertex access token or OpenAI key).
/// - `credentials_file`: Vertex service-account key; takes precedence over `api_key`.
/// - `timeout_secs`: HTTP client timeout.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Vertex,
///     model: "projects/p/locations/us-central1/endpoints/123".into(),
///     endpoint: "https://us-central1-aiplatform.googleapis.com/v1".into(),
///     api_key: None,
///     credentials_file: Some("/secrets/vertex-sa.json".into()),
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.timeout_or_default().as_secs(), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmModelConfig {
    /// Backend provider.
    pub provider: LlmProvider,

    /// Endpoint resource name (Vertex) or model identifier (OpenAI).
    pub model: String,

    /// REST base URL.
    pub endpoint: String,

    /// Bearer credential.
    pub api_key: Option<String>,

    /// Path to a Google service-account JSON key (Vertex only).
    pub credentials_file: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Default HTTP timeout when none is configured.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Configured timeout, falling back to [`Self::DEFAULT_TIMEOUT_SECS`].
    pub fn timeout_or_default(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS))
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}
