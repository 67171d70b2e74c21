use std::sync::Arc;

use ai_llm_service::{VisionService, health_service::HealthService};
use caption_engine::{CaptionModel, Captioner, RetryPolicy, UnconfiguredModel};
use sheet_locator::SheetLocator;
use tracing::{info, warn};

use crate::{
    core::app_config::{AppConfig, ModelSetup},
    error_handler::AppResult,
};

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Caption generation (model + retry policy).
    pub captioner: Captioner,
    /// Image URL -> sheet deep link.
    pub sheets: SheetLocator,
    /// Model setup, reported by `/health`.
    pub model: ModelSetup,
    /// `None` disables the upstream probe in `/health`.
    pub health: Option<HealthService>,
    /// Live model client probed by `/health`; `None` when unconfigured or faked.
    pub vision: Option<Arc<VisionService>>,
}

impl AppState {
    /// Assembles state from already-built parts (used by tests with fakes).
    pub fn new(captioner: Captioner, sheets: SheetLocator, model: ModelSetup) -> Self {
        Self {
            captioner,
            sheets,
            model,
            health: None,
            vision: None,
        }
    }

    /// Builds production clients from config.
    pub fn from_config(cfg: &AppConfig) -> AppResult<Self> {
        let (model, vision): (Arc<dyn CaptionModel>, _) = match &cfg.model {
            ModelSetup::Configured(model_cfg) => {
                let svc = Arc::new(VisionService::from_config(model_cfg.clone())?);
                (svc.clone(), Some(svc))
            }
            ModelSetup::Unconfigured(reason) => {
                warn!(%reason, "vision model not configured; caption requests will fail");
                (Arc::new(UnconfiguredModel::new(reason.clone())), None)
            }
        };

        let policy = RetryPolicy {
            attempt_timeout: cfg.caption_attempt_timeout,
            ..RetryPolicy::default()
        };
        let sheets = SheetLocator::from_config(&cfg.sheets)?;
        let health = HealthService::new(Some(10))?;

        info!(
            attempts = policy.max_attempts,
            min_accepted = policy.min_accepted,
            attempt_timeout_secs = policy.attempt_timeout.as_secs(),
            row_lookup = sheets.row_lookup_enabled(),
            "app state ready"
        );

        Ok(Self {
            captioner: Captioner::with_policy(model, policy),
            sheets,
            model: cfg.model.clone(),
            health: Some(health),
            vision,
        })
    }
}
