//! HTTP gateway proxying the public task API to the primary service.
//!
//! Responses pass through with their upstream status and JSON body. An
//! unreachable upstream maps to 503; anything else that fails on the
//! gateway side maps to 500.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;

struct GatewayState {
    client: reqwest::Client,
    upstream: String,
}

type GatewayResponse = (StatusCode, Json<serde_json::Value>);

/// Build the gateway router for the given upstream base URL.
pub fn router(upstream_url: &str) -> Router {
    let state = Arc::new(GatewayState {
        client: reqwest::Client::new(),
        upstream: upstream_url.trim_end_matches('/').to_string(),
    });

    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks", post(create_task))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/submit", post(create_submission))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let app = router(&config.gateway.upstream_url);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        "Gateway listening on {}, proxying to {}",
        addr,
        config.gateway.upstream_url
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Turn an upstream result into a pass-through response.
async fn forward(result: Result<reqwest::Response, reqwest::Error>) -> GatewayResponse {
    match result {
        Ok(resp) => {
            let status = StatusCode::from_u16(resp.status().as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = resp
                .json::<serde_json::Value>()
                .await
                .unwrap_or(serde_json::Value::Null);
            (status, Json(body))
        }
        Err(e) if e.is_connect() || e.is_timeout() => {
            tracing::error!("Upstream unreachable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": "upstream unavailable" })),
            )
        }
        Err(e) => {
            tracing::error!("Gateway error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "internal gateway error" })),
            )
        }
    }
}

async fn list_tasks(State(state): State<Arc<GatewayState>>) -> GatewayResponse {
    let result = state
        .client
        .get(format!("{}/tasks", state.upstream))
        .send()
        .await;
    forward(result).await
}

async fn get_task(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<i64>,
) -> GatewayResponse {
    let result = state
        .client
        .get(format!("{}/tasks/{}", state.upstream, id))
        .send()
        .await;
    forward(result).await
}

async fn create_task(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<serde_json::Value>,
) -> GatewayResponse {
    let result = state
        .client
        .post(format!("{}/tasks", state.upstream))
        .json(&body)
        .send()
        .await;
    forward(result).await
}

async fn create_submission(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> GatewayResponse {
    let result = state
        .client
        .post(format!("{}/tasks/{}/submit", state.upstream, id))
        .json(&body)
        .send()
        .await;
    forward(result).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unreachable_upstream_maps_to_503() {
        let app = router("http://127.0.0.1:59997");

        let response = app
            .oneshot(Request::builder().uri("/tasks").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"], "upstream unavailable");
    }

    #[tokio::test]
    async fn test_upstream_status_passes_through() {
        // Real primary service on an ephemeral port, backed by memory.
        let config = crate::config::Config::new(std::path::PathBuf::from("unused.db"), 3);
        let state = std::sync::Arc::new(crate::api::AppState {
            store: std::sync::Arc::new(crate::store::MemTaskStore::new(3)),
            notifier: crate::notify::NotifyClient::new(
                "http://127.0.0.1:59996/notify",
                std::time::Duration::from_millis(200),
            ),
            config,
        });
        let upstream = crate::api::routes::router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let app = router(&format!("http://{}", addr));

        // 404 from the upstream must come back as 404.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/tasks/999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // And a creation as 201 with the created body.
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tasks")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"T1","description":"d"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let task: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(task["status"], "Open");
    }
}
