use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::{app_config::ModelSetup, app_state::AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: HealthStatus,
}

/// Liveness plus a best-effort probe of the vision model. Always 200.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let model = match (&state.model, &state.health, &state.vision) {
        (ModelSetup::Configured(_), Some(probe), Some(svc)) => probe.check(svc).await,
        (ModelSetup::Configured(cfg), _, _) => HealthStatus {
            provider: Some(cfg.provider.to_string()),
            endpoint: Some(cfg.endpoint.clone()),
            model: Some(cfg.model.clone()),
            ok: true,
            latency_ms: 0,
            message: "probe disabled".into(),
        },
        (ModelSetup::Unconfigured(reason), _, _) => HealthStatus::unconfigured(reason.clone()),
    };

    Json(HealthResponse { status: "ok", model })
}
