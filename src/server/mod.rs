//! HTTP surface: the axum router, shared state, and the mapping from
//! [`GatewayError`] to the uniform OpenAI-style error envelope.

mod handlers;

use crate::config::GatewayConfig;
use crate::credentials::CredentialStore;
use crate::error::GatewayError;
use crate::proxy::BackendClient;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info, warn};

/// Ceiling on inbound request bodies. Chat payloads with long histories
/// fit comfortably; anything larger is rejected before buffering.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Whole-request deadline, matched to the outbound client's total timeout.
/// Streaming responses are exempt: the layer times the response future,
/// not the body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<BackendClient>,
    pub config: Arc<GatewayConfig>,
    /// Synthesized `created` timestamp for every registry entry, fixed at
    /// process start.
    pub registry_created: u64,
}

fn registry_created_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/models", get(handlers::list_models))
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .route("/v1/embeddings", post(handlers::embeddings))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
}

/// Bind and serve until the task is aborted or the listener fails.
pub async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    run_with_listener(config, listener).await
}

/// Serve on an already-bound listener. Tests bind port 0 and pass the
/// listener in to learn the real port.
pub async fn run_with_listener(
    config: GatewayConfig,
    listener: TcpListener,
) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let store = if config.credentials_enabled {
        Some(Arc::new(CredentialStore::load_or_empty(
            config.cookie_store.clone(),
        )))
    } else {
        None
    };

    let client = Arc::new(BackendClient::new(Arc::clone(&config), store));
    let state = AppState {
        client,
        config: Arc::clone(&config),
        registry_created: registry_created_now(),
    };

    let addr = listener.local_addr()?;
    info!(
        backend = config.backend.id(),
        backend_url = config.base_url(),
        %addr,
        "ferrygate listening"
    );
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

/// Uniform error envelope: `{"error":{"message","type","code"}}`.
fn error_body(message: &str, kind: &str, code: u16) -> Json<serde_json::Value> {
    Json(json!({
        "error": {
            "message": message,
            "type": kind,
            "code": code,
        }
    }))
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            GatewayError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            GatewayError::Backend { status, body } => {
                // Upstream detail goes to the log; the client sees the
                // uniform 500 envelope.
                error!(status, body = %body, "collapsing backend error to 500");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
            }
            GatewayError::BackendTimeout(_)
            | GatewayError::BackendUnreachable(_)
            | GatewayError::Storage(_) => {
                warn!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
            }
        };
        let body = error_body(&self.to_string(), kind, status.as_u16());
        (status, body).into_response()
    }
}
