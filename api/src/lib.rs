//! HTTP surface of the caption service.
//!
//! | Method | Path                      | Handler                     |
//! |--------|---------------------------|-----------------------------|
//! | GET    | `/health`                 | liveness + model probe      |
//! | POST   | `/api/generate-captions`  | ten captions for one image  |
//! | POST   | `/api/search-sheet`       | sheet deep link for one URL |
//! | POST   | `/api/process-batch`      | both, for up to 8 images    |

use std::{any::Any, sync::Arc};

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub use crate::core::{
    app_config::{AppConfig, ModelSetup},
    app_state::AppState,
};
pub use crate::error_handler::{AppError, AppResult};
pub use crate::routes::process_batch::process_batch_route::MAX_BATCH_IMAGES;

use crate::routes::{
    generate_captions::generate_captions_route::generate_captions_route,
    health_route::health_route, process_batch::process_batch_route::process_batch_route,
    search_sheet::search_sheet_route::search_sheet_route,
};

/// Reads config from the environment, binds `API_ADDRESS` and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let cfg = AppConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&cfg)?);
    let app = build_router(state);

    let listener = TcpListener::bind(&cfg.api_address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %cfg.api_address, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Builds the router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_route))
        .route("/api/generate-captions", post(generate_captions_route))
        .route("/api/search-sheet", post(search_sheet_route))
        .route("/api/process-batch", post(process_batch_route))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".into());
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
