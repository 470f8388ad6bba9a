//! taskboard-gateway - Gateway Entry Point
//!
//! Starts the thin proxy that forwards the public task API to the primary
//! service.

use taskboard::{config::Config, gateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    gateway::serve(config).await?;

    Ok(())
}
