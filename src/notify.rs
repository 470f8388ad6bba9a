//! Submission notifications: outbound client and receiver service.
//!
//! The client makes exactly one best-effort attempt after a submission
//! commits; the receiver is a stateless endpoint that logs the payload and
//! acknowledges it. Delivery is not guaranteed and never retried.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;

/// Wire shape shared by the outbound call and the `/notify` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub submission_id: i64,
    pub task_id: i64,
    pub submitter_name: String,
}

/// Outbound notification client for the primary service.
#[derive(Clone)]
pub struct NotifyClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl NotifyClient {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            timeout,
        }
    }

    /// Post a submission notification. One attempt, bounded by the
    /// configured timeout; a non-success status counts as failure. The
    /// caller decides what to do with the error - the submit handler logs
    /// and swallows it.
    pub async fn submission_created(&self, payload: &NotificationPayload) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("notification endpoint returned {}", status);
        }

        Ok(())
    }
}

/// Build the receiver router (separated from `serve` for tests).
pub fn receiver_router() -> Router {
    Router::new()
        .route("/notify", post(receive))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the notification receiver service.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.notify.host, config.notify.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Notification receiver listening on {}", addr);

    axum::serve(listener, receiver_router()).await?;

    Ok(())
}

/// POST /notify - log the submission notification and acknowledge it.
async fn receive(Json(payload): Json<NotificationPayload>) -> Json<serde_json::Value> {
    info!(
        submission_id = payload.submission_id,
        task_id = payload.task_id,
        submitter = %payload.submitter_name,
        "received submission notification"
    );
    Json(serde_json::json!({ "status": "received" }))
}
