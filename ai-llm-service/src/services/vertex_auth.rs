//! Bearer credentials for Vertex AI.
//!
//! A service-account key (`GOOGLE_APPLICATION_CREDENTIALS`) is exchanged for
//! short-lived access tokens on demand. `gcp_auth` caches the current token
//! and refreshes it before it expires, so [`VertexAuth::token`] is called once
//! per request.
//!
//! A fixed `VERTEX_ACCESS_TOKEN` is still accepted for local runs; it is sent
//! as-is and stops working once Google expires it.

use std::{fmt, sync::Arc};

use gcp_auth::{CustomServiceAccount, TokenProvider};
use tracing::{info, warn};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ProviderError, ProviderErrorKind},
};

/// OAuth scope required by the aiplatform REST API.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Where Vertex bearer tokens come from.
#[derive(Clone)]
pub enum VertexAuth {
    /// Refreshing tokens minted from a service-account key file.
    ServiceAccount(Arc<CustomServiceAccount>),
    /// A pre-issued access token.
    AccessToken(String),
}

impl VertexAuth {
    /// Picks the credential source from `cfg`. A key file wins over a fixed token.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::Credentials`] if the key file cannot be read or parsed
    /// - [`ProviderErrorKind::MissingApiKey`] if neither source is configured
    pub fn from_config(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        if let Some(path) = non_blank(cfg.credentials_file.as_deref()) {
            let account = CustomServiceAccount::from_file(path).map_err(|e| {
                ProviderError::new(
                    LlmProvider::Vertex,
                    ProviderErrorKind::Credentials(format!("{path}: {e}")),
                )
            })?;
            info!(path, "Vertex auth uses service-account credentials");
            return Ok(Self::ServiceAccount(Arc::new(account)));
        }

        match non_blank(cfg.api_key.as_deref()) {
            Some(token) => {
                warn!("Vertex auth uses a fixed access token; calls fail once it expires");
                Ok(Self::AccessToken(token.to_string()))
            }
            None => Err(ProviderError::new(LlmProvider::Vertex, ProviderErrorKind::MissingApiKey).into()),
        }
    }

    /// Returns a currently valid access token.
    ///
    /// # Errors
    /// Returns [`ProviderErrorKind::TokenFetch`] when the token exchange fails.
    pub async fn token(&self) -> Result<String, AiLlmError> {
        match self {
            Self::AccessToken(token) => Ok(token.clone()),
            Self::ServiceAccount(account) => {
                let token = account.token(&[CLOUD_PLATFORM_SCOPE]).await.map_err(|e| {
                    ProviderError::new(
                        LlmProvider::Vertex,
                        ProviderErrorKind::TokenFetch(e.to_string()),
                    )
                })?;
                Ok(token.as_str().to_string())
            }
        }
    }
}

impl fmt::Debug for VertexAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceAccount(_) => f.write_str("VertexAuth::ServiceAccount"),
            Self::AccessToken(_) => f.write_str("VertexAuth::AccessToken(..)"),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(credentials_file: Option<&str>, api_key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Vertex,
            model: "projects/p/locations/us-central1/endpoints/1".into(),
            endpoint: "https://us-central1-aiplatform.googleapis.com/v1".into(),
            api_key: api_key.map(Into::into),
            credentials_file: credentials_file.map(Into::into),
            timeout_secs: None,
        }
    }

    #[test]
    fn falls_back_to_fixed_token() {
        let auth = VertexAuth::from_config(&cfg(Some("  "), Some(" ya29.abc "))).unwrap();
        assert!(matches!(&auth, VertexAuth::AccessToken(t) if t == "ya29.abc"));
        assert_eq!(format!("{auth:?}"), "VertexAuth::AccessToken(..)");
    }

    #[test]
    fn unreadable_key_file_is_fatal() {
        let err = VertexAuth::from_config(&cfg(Some("/nonexistent/sa.json"), Some("ya29.abc")))
            .unwrap_err();
        assert!(matches!(
            &err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::Credentials(_),
                ..
            })
        ));
        assert!(err.is_fatal());
    }

    #[test]
    fn no_credentials_is_missing_api_key() {
        let err = VertexAuth::from_config(&cfg(None, None)).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            })
        ));
    }
}
