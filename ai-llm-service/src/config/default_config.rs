//! Model configuration loaded from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = provider kind (`vertex` (default) or `openai`)
//! - `LLM_TIMEOUT_SECS` = optional HTTP timeout (u64)
//!
//! Vertex-specific:
//! - `VERTEX_API_BASE`      = REST base (default `https://us-central1-aiplatform.googleapis.com/v1`)
//! - `ENDPOINT_NAME`        = endpoint resource name (mandatory)
//! - `GOOGLE_APPLICATION_CREDENTIALS` = service-account key file (preferred)
//! - `VERTEX_ACCESS_TOKEN`  = fixed OAuth bearer token (fallback, expires)
//!
//! One of the two credentials is mandatory.
//!
//! OpenAI-specific:
//! - `OPENAI_URL`     = REST base (default `https://api.openai.com`)
//! - `OPENAI_API_KEY` = API key (mandatory)
//! - `OPENAI_MODEL`   = vision-capable model (default `gpt-4o-mini`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, Result, must_var, opt_u64, opt_var, validate_http_endpoint},
};

pub const DEFAULT_VERTEX_API_BASE: &str = "https://us-central1-aiplatform.googleapis.com/v1";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Builds the model config from the process environment.
///
/// # Errors
/// See [`config_from_lookup`].
pub fn config_from_env() -> Result<LlmModelConfig> {
    config_from_lookup(&|name: &str| std::env::var(name).ok())
}

/// Builds the model config from an arbitrary variable source.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`](crate::ConfigError::UnsupportedProvider) for an unknown `LLM_KIND`
/// - [`ConfigError::MissingVar`](crate::ConfigError::MissingVar) for missing mandatory variables
/// - [`ConfigError::InvalidFormat`](crate::ConfigError::InvalidFormat) for a non-http base URL
/// - [`ConfigError::InvalidNumber`](crate::ConfigError::InvalidNumber) for a bad timeout
pub fn config_from_lookup<F>(lookup: &F) -> Result<LlmModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match opt_var(lookup, "LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Vertex,
    };
    let timeout_secs = opt_u64(lookup, "LLM_TIMEOUT_SECS")?;

    match provider {
        LlmProvider::Vertex => {
            let endpoint = opt_var(lookup, "VERTEX_API_BASE")
                .unwrap_or_else(|| DEFAULT_VERTEX_API_BASE.to_string());
            validate_http_endpoint("VERTEX_API_BASE", &endpoint)?;
            let model = must_var(lookup, "ENDPOINT_NAME")?;

            let credentials_file = opt_var(lookup, "GOOGLE_APPLICATION_CREDENTIALS");
            let api_key = opt_var(lookup, "VERTEX_ACCESS_TOKEN");
            if credentials_file.is_none() && api_key.is_none() {
                return Err(ConfigError::MissingVar("GOOGLE_APPLICATION_CREDENTIALS").into());
            }

            Ok(LlmModelConfig {
                provider,
                model,
                endpoint,
                api_key,
                credentials_file,
                timeout_secs,
            })
        }
        LlmProvider::OpenAI => {
            let endpoint =
                opt_var(lookup, "OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
            validate_http_endpoint("OPENAI_URL", &endpoint)?;

            Ok(LlmModelConfig {
                provider,
                model: opt_var(lookup, "OPENAI_MODEL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                endpoint,
                api_key: Some(must_var(lookup, "OPENAI_API_KEY")?),
                credentials_file: None,
                timeout_secs,
            })
        }
    }
}
