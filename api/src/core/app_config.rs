use std::time::Duration;

use ai_llm_service::{AiLlmError, ConfigError, LlmModelConfig, config::default_config::config_from_lookup};
use sheet_locator::SheetConfig;

use crate::error_handler::{AppError, AppResult};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_CAPTION_ATTEMPT_TIMEOUT_SECS: u64 = 45;

/// Vision model setup as read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSetup {
    Configured(LlmModelConfig),
    /// Mandatory variables are missing; the server still starts.
    Unconfigured(String),
}

/// Everything the server reads from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_address: String,
    pub model: ModelSetup,
    pub caption_attempt_timeout: Duration,
    pub sheets: SheetConfig,
}

impl AppConfig {
    /// Load from process environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(&|name: &str| std::env::var(name).ok())
    }

    /// Missing model variables downgrade to [`ModelSetup::Unconfigured`];
    /// malformed values fail.
    pub fn from_lookup<F>(lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let model = match config_from_lookup(lookup) {
            Ok(cfg) => ModelSetup::Configured(cfg),
            Err(err @ AiLlmError::Config(ConfigError::MissingVar(_))) => {
                ModelSetup::Unconfigured(err.to_string())
            }
            Err(err) => return Err(err.into()),
        };

        let attempt_secs = match get("CAPTION_ATTEMPT_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("CAPTION_ATTEMPT_TIMEOUT_SECS: {e}"))
            })?,
            None => DEFAULT_CAPTION_ATTEMPT_TIMEOUT_SECS,
        };
        if attempt_secs == 0 {
            return Err(AppError::Config("CAPTION_ATTEMPT_TIMEOUT_SECS must be > 0".into()));
        }

        Ok(Self {
            api_address: get("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string()),
            model,
            caption_attempt_timeout: Duration::from_secs(attempt_secs),
            sheets: SheetConfig::from_lookup(lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ai_llm_service::LlmProvider;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn starts_without_model_credentials() {
        let cfg = AppConfig::from_lookup(&lookup(&[])).unwrap();
        assert_eq!(cfg.api_address, DEFAULT_API_ADDRESS);
        assert_eq!(cfg.caption_attempt_timeout, Duration::from_secs(45));
        match cfg.model {
            ModelSetup::Unconfigured(reason) => assert!(reason.contains("ENDPOINT_NAME")),
            other => panic!("expected unconfigured model, got {other:?}"),
        }
    }

    #[test]
    fn vertex_setup_from_env() {
        let cfg = AppConfig::from_lookup(&lookup(&[
            ("API_ADDRESS", "127.0.0.1:9000"),
            ("ENDPOINT_NAME", "projects/p/locations/us-central1/endpoints/42"),
            ("VERTEX_ACCESS_TOKEN", "tok"),
            ("CAPTION_ATTEMPT_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_address, "127.0.0.1:9000");
        assert_eq!(cfg.caption_attempt_timeout, Duration::from_secs(5));
        let ModelSetup::Configured(model) = cfg.model else {
            panic!("expected configured model");
        };
        assert_eq!(model.provider, LlmProvider::Vertex);
    }

    #[test]
    fn malformed_values_fail_startup() {
        assert!(AppConfig::from_lookup(&lookup(&[("LLM_KIND", "banana")])).is_err());
        assert!(AppConfig::from_lookup(&lookup(&[("CAPTION_ATTEMPT_TIMEOUT_SECS", "0")])).is_err());
        assert!(AppConfig::from_lookup(&lookup(&[("CAPTION_ATTEMPT_TIMEOUT_SECS", "x")])).is_err());
        assert!(AppConfig::from_lookup(&lookup(&[("SHEET_LINK_COLUMN", "1")])).is_err());
    }
}
