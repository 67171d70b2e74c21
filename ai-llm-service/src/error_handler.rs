//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested types ([`ConfigError`],
//! [`ProviderError`]). Helpers for reading/validating configuration values are
//! provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use std::{fmt, time::Duration};

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup or first use).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider rejected the request or returned something unusable.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AiLlmError {
    /// `true` for failures no retry can fix: missing or invalid configuration,
    /// missing credentials, or credentials rejected by the provider (401/403).
    pub fn is_fatal(&self) -> bool {
        match self {
            AiLlmError::Config(_) => true,
            AiLlmError::Provider(err) => match &err.kind {
                ProviderErrorKind::InvalidProvider
                | ProviderErrorKind::MissingApiKey
                | ProviderErrorKind::Credentials(_)
                | ProviderErrorKind::InvalidEndpoint(_) => true,
                ProviderErrorKind::HttpStatus(http) => {
                    http.status == StatusCode::UNAUTHORIZED || http.status == StatusCode::FORBIDDEN
                }
                ProviderErrorKind::TokenFetch(_)
                | ProviderErrorKind::Decode(_)
                | ProviderErrorKind::EmptyPredictions => false,
            },
            AiLlmError::HttpTransport(_) | AiLlmError::Timeout(_) => false,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `VERTEX_API_BASE`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// The model could not be configured at startup; carries the original reason.
    #[error("[AI LLM Service] model is not configured: {0}")]
    Unconfigured(String),
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Short HTTP failure description shared by provider and health errors.
#[derive(Debug, Clone)]
pub struct HttpError {
    /// Numeric HTTP status code.
    pub status: StatusCode,
    /// Request URL.
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.snippet)
    }
}

/// What went wrong while talking to a provider.
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// The config targets another provider than the client.
    #[error("invalid provider for this client")]
    InvalidProvider,

    /// No bearer credential configured.
    #[error("missing API key / access token")]
    MissingApiKey,

    /// Service-account credentials could not be loaded.
    #[error("invalid credentials: {0}")]
    Credentials(String),

    /// Exchanging credentials for an access token failed.
    #[error("access token request failed: {0}")]
    TokenFetch(String),

    /// The endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("{0}")]
    HttpStatus(HttpError),

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// The response carried no predictions/choices.
    #[error("response contained no predictions")]
    EmptyPredictions,
}

/// Provider-tagged error.
#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    /// Provider that produced the error.
    pub provider: LlmProvider,
    /// Failure details.
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// Trims a response body into a short single-line snippet for logs and errors.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 240;
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX {
        flat
    } else {
        let mut cut: String = flat.chars().take(MAX).collect();
        cut.push('…');
        cut
    }
}

/* ------------------------------------------------------------------------- */
/* Config helpers (return unified `Result<T>`)                               */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty variable through `lookup`.
///
/// # Errors
/// Returns [`ConfigError::MissingVar`] if the variable is absent or blank.
pub fn must_var<F>(lookup: &F, name: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Fetches an optional variable; blank values count as unset.
pub fn opt_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an optional `u64` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u64`.
pub fn opt_u64<F>(lookup: &F, name: &'static str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match opt_var(lookup, name) {
        Some(v) => v.parse::<u64>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_err(code: u16) -> AiLlmError {
        ProviderError::new(
            LlmProvider::Vertex,
            ProviderErrorKind::HttpStatus(HttpError {
                status: StatusCode::from_u16(code).unwrap(),
                url: "https://example.test".into(),
                snippet: String::new(),
            }),
        )
        .into()
    }

    #[test]
    fn auth_and_config_failures_are_fatal() {
        assert!(http_err(401).is_fatal());
        assert!(http_err(403).is_fatal());
        assert!(AiLlmError::from(ConfigError::MissingVar("ENDPOINT_NAME")).is_fatal());
        assert!(
            AiLlmError::from(ProviderError::new(
                LlmProvider::OpenAI,
                ProviderErrorKind::MissingApiKey
            ))
            .is_fatal()
        );
    }

    #[test]
    fn upstream_hiccups_are_retryable() {
        assert!(!http_err(500).is_fatal());
        assert!(!http_err(429).is_fatal());
        assert!(!AiLlmError::Timeout(Duration::from_secs(1)).is_fatal());
        assert!(
            !AiLlmError::from(ProviderError::new(
                LlmProvider::Vertex,
                ProviderErrorKind::TokenFetch("connection reset".into())
            ))
            .is_fatal()
        );
        assert!(
            !AiLlmError::from(ProviderError::new(
                LlmProvider::Vertex,
                ProviderErrorKind::EmptyPredictions
            ))
            .is_fatal()
        );
    }

    #[test]
    fn snippet_is_flattened_and_capped() {
        assert_eq!(make_snippet("  a\n\n b\tc "), "a b c");
        let long = "x".repeat(1000);
        let s = make_snippet(&long);
        assert_eq!(s.chars().count(), 241);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn numbers_and_blanks() {
        let lookup = |k: &str| match k {
            "GOOD" => Some("15".to_string()),
            "BAD" => Some("soon".to_string()),
            "BLANK" => Some("   ".to_string()),
            _ => None,
        };
        assert_eq!(opt_u64(&lookup, "GOOD").unwrap(), Some(15));
        assert_eq!(opt_u64(&lookup, "BLANK").unwrap(), None);
        assert!(opt_u64(&lookup, "BAD").is_err());
        assert!(must_var(&lookup, "BLANK").is_err());
        assert_eq!(must_var(&lookup, "GOOD").unwrap(), "15");
    }
}
