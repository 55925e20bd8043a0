//! Endpoint handlers for the OpenAI-compatible surface.

use crate::error::GatewayError;
use crate::proxy::{error_frame, relay_body, sse_response, EmbeddingsReply};
use crate::server::AppState;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

fn unwrap_json(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Value, GatewayError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(GatewayError::BadRequest(rejection.body_text())),
    }
}

fn json_bytes_response(bytes: bytes::Bytes) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        bytes,
    )
        .into_response()
}

/// `GET /v1/models` — the static registry for the active backend.
pub async fn list_models(State(state): State<AppState>) -> Json<Value> {
    let created = state.registry_created;
    let data: Vec<Value> = state
        .config
        .backend
        .models()
        .iter()
        .map(|model| {
            json!({
                "id": model.id,
                "object": "model",
                "created": created,
                "owned_by": model.owned_by,
            })
        })
        .collect();
    Json(json!({ "object": "list", "data": data }))
}

/// `POST /v1/chat/completions` — forwarded verbatim after model remap and
/// credential injection. `"stream": true` switches to the SSE relay.
pub async fn chat_completions(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let body = unwrap_json(payload)?;
    let stream = body.get("stream").and_then(Value::as_bool).unwrap_or(false);
    info!(
        model = body.get("model").and_then(serde_json::Value::as_str).unwrap_or("?"),
        stream, "chat completion"
    );

    if stream {
        // A connection that never opens still answers as an event stream:
        // one synthetic error frame, then end.
        return match state.client.open_chat_stream(body).await {
            Ok(response) => Ok(sse_response(relay_body(response))),
            Err(GatewayError::BadRequest(message)) => {
                Err(GatewayError::BadRequest(message))
            }
            Err(e) => {
                warn!(error = %e, "streaming open failed; sending error frame");
                Ok(sse_response(Body::from(error_frame(&e.to_string()))))
            }
        };
    }

    let bytes = state.client.chat(body).await?;
    Ok(json_bytes_response(bytes))
}

/// `POST /v1/embeddings` — forwarded when the backend has the endpoint,
/// otherwise answered with the synthetic zero vector.
pub async fn embeddings(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let body = unwrap_json(payload)?;
    match state.client.embeddings(body).await? {
        EmbeddingsReply::Forwarded(bytes) => Ok(json_bytes_response(bytes)),
        EmbeddingsReply::Synthesized(value) => Ok(Json(value).into_response()),
    }
}
