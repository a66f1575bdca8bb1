use anyhow::Context;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!(".env not loaded: {e}");
    }

    ai_llm_service::telemetry::init_subscriber("info");
    info!("starting document q&a backend");

    if let Err(e) = api::start().await {
        error!(error = %e, "server stopped with error");
        return Err(e).context("api server failed");
    }

    Ok(())
}
