use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; real deployments set the environment directly.
    let dotenv = dotenvy::dotenv();

    telemetry::init(telemetry::DEFAULT_FILTER);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "failed to read .env"),
    }

    api::start().await?;

    Ok(())
}
