//! The request translator: resolves the backend target, remaps model
//! names, injects stored credentials, forwards the call, and normalizes
//! failures. Successful backend bodies pass through verbatim — both
//! supported backend families already speak the OpenAI shapes, so the
//! translator's job is compatibility, not schema rewriting.

use crate::config::GatewayConfig;
use crate::credentials::{cookie_header, CredentialStore};
use crate::error::{GatewayError, Result};
use bytes::Bytes;
use reqwest::header;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Connect deadline for every outbound call.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Total deadline for non-streaming calls. Streaming connections get no
/// total deadline; a healthy stream may be arbitrarily long.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Fixed dimensionality of the synthetic embedding fallback.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Resolved per-request routing: where to send the call and which domain
/// keys the credential lookup. Derived from the immutable config on every
/// request, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    pub base_url: String,
    /// Authority (`host[:port]`) of the base URL; `None` when the URL is
    /// unparsable, in which case no credentials are injected.
    pub domain: Option<String>,
}

pub fn resolve_target(config: &GatewayConfig) -> BackendTarget {
    let base_url = config.base_url().trim_end_matches('/').to_string();
    let domain = Url::parse(&base_url).ok().and_then(|url| {
        url.host_str().map(|host| match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    });
    BackendTarget { base_url, domain }
}

/// Outcome of an embeddings request: forwarded bytes or a synthesized
/// capability-gap response.
pub enum EmbeddingsReply {
    Forwarded(Bytes),
    Synthesized(Value),
}

pub struct BackendClient {
    config: Arc<GatewayConfig>,
    store: Option<Arc<CredentialStore>>,
    client: reqwest::Client,
    stream_client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: Arc<GatewayConfig>, store: Option<Arc<CredentialStore>>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        let stream_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            config,
            store,
            client,
            stream_client,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn target(&self) -> BackendTarget {
        resolve_target(&self.config)
    }

    /// `Cookie` header for the target's domain, when a store is attached
    /// and holds entries for it. An empty set is not an error.
    async fn cookie_value(&self, target: &BackendTarget) -> Option<String> {
        let store = self.store.as_ref()?;
        let domain = target.domain.as_deref()?;
        let credentials = store.get(domain).await;
        cookie_header(&credentials)
    }

    /// Validate required chat fields and remap the model in place.
    fn prepare_chat_body(&self, body: &mut Value, force_stream: bool) -> Result<()> {
        let model = body
            .get("model")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::BadRequest("missing field `model`".into()))?
            .to_string();
        if !body.get("messages").is_some_and(Value::is_array) {
            return Err(GatewayError::BadRequest("missing field `messages`".into()));
        }

        let mapped = self.config.backend.remap_model(&model);
        if mapped != model {
            debug!(from = %model, to = %mapped, "remapped model for backend");
            body["model"] = Value::String(mapped.to_string());
        }
        if force_stream {
            body["stream"] = Value::Bool(true);
        }
        Ok(())
    }

    async fn post_json(
        &self,
        client: &reqwest::Client,
        url: &str,
        target: &BackendTarget,
        body: &Value,
    ) -> Result<reqwest::Response> {
        let mut request = client.post(url).json(body);
        if let Some(cookie) = self.cookie_value(target).await {
            request = request.header(header::COOKIE, cookie);
        }
        request
            .send()
            .await
            .map_err(|e| GatewayError::from_outbound(&e))
    }

    /// Non-streaming chat completion. Returns the backend's 2xx body
    /// verbatim; non-2xx becomes `GatewayError::Backend` with the upstream
    /// status preserved for logging.
    pub async fn chat(&self, mut body: Value) -> Result<Bytes> {
        let target = self.target();
        self.prepare_chat_body(&mut body, false)?;

        let url = format!("{}/v1/chat/completions", target.base_url);
        let response = self.post_json(&self.client, &url, &target, &body).await?;
        Self::read_success(response, self.config.backend.id(), &url).await
    }

    /// Open the backend connection for a streaming chat completion with
    /// the `stream` flag forced true. The caller relays the response body.
    pub async fn open_chat_stream(&self, mut body: Value) -> Result<reqwest::Response> {
        let target = self.target();
        self.prepare_chat_body(&mut body, true)?;

        let url = format!("{}/v1/chat/completions", target.base_url);
        let response = self
            .post_json(&self.stream_client, &url, &target, &body)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                backend = self.config.backend.id(),
                %url,
                status = status.as_u16(),
                "backend refused streaming connection"
            );
            return Err(GatewayError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Embeddings: forwarded verbatim when the backend family has an
    /// embeddings endpoint, otherwise answered with a structurally-valid
    /// zero-vector response so the API contract stays available.
    pub async fn embeddings(&self, body: Value) -> Result<EmbeddingsReply> {
        if !self.config.backend.supports_embeddings() {
            debug!(
                backend = self.config.backend.id(),
                "backend has no embeddings endpoint; synthesizing zero vector"
            );
            let model = body.get("model").and_then(Value::as_str);
            return Ok(EmbeddingsReply::Synthesized(synthetic_embedding_response(
                model,
            )));
        }

        let target = self.target();
        let url = format!("{}/v1/embeddings", target.base_url);
        let response = self.post_json(&self.client, &url, &target, &body).await?;
        Self::read_success(response, self.config.backend.id(), &url)
            .await
            .map(EmbeddingsReply::Forwarded)
    }

    async fn read_success(response: reqwest::Response, backend: &str, url: &str) -> Result<Bytes> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::from_outbound(&e))?;
        if !status.is_success() {
            error!(
                backend,
                url,
                status = status.as_u16(),
                "backend returned an error response"
            );
            return Err(GatewayError::Backend {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes)
    }
}

/// Capability-gap marker, not real output: a zero vector of the service's
/// fixed dimensionality with zero token counts.
pub fn synthetic_embedding_response(model: Option<&str>) -> Value {
    json!({
        "object": "list",
        "data": [{
            "object": "embedding",
            "embedding": vec![0.0_f64; EMBEDDING_DIMENSIONS],
            "index": 0,
        }],
        "model": model.unwrap_or(DEFAULT_EMBEDDING_MODEL),
        "usage": {
            "prompt_tokens": 0,
            "total_tokens": 0,
        },
    })
}
