//! taskboard-notifyd - Notification Receiver Entry Point
//!
//! Starts the stateless service that accepts and logs submission
//! notifications from the primary service.

use taskboard::{config::Config, notify};
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

    notify::serve(config).await?;

    Ok(())
}
