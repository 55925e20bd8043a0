//! Streaming relay: re-frames the backend's SSE body line by line and
//! pipes it to the client in arrival order. The relay never inspects or
//! reorders payloads; the backend's `[DONE]` sentinel passes through like
//! any other line and is never synthesized here.

use crate::proxy::sse::{sse_frame, LineBuffer};
use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use futures_util::StreamExt;
use serde_json::json;
use tracing::{debug, warn};

/// Logs when a relay ends before the backend finished the stream. Dropped
/// on every exit path; `finish` marks the clean one.
struct RelayGuard {
    complete: bool,
}

impl RelayGuard {
    fn new() -> Self {
        Self { complete: false }
    }

    fn finish(&mut self) {
        self.complete = true;
    }
}

impl Drop for RelayGuard {
    fn drop(&mut self) {
        if !self.complete {
            debug!("relay dropped before backend stream completed; backend read aborted");
        }
    }
}

/// Single synthetic SSE frame carrying the uniform error envelope. Emitted
/// only when the backend connection cannot be opened at all; an error
/// mid-stream just ends the body.
pub fn error_frame(message: &str) -> String {
    let envelope = json!({
        "error": {
            "message": message,
            "type": "server_error",
            "code": 500,
        }
    });
    sse_frame(&format!("data: {envelope}"))
}

/// Wrap an SSE body stream in the response headers event-stream clients
/// expect.
pub fn sse_response(body: Body) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(body)
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

/// Relay a live backend response into an SSE body. Each non-empty line is
/// forwarded as its own frame; partial lines are buffered across chunk
/// boundaries. Dropping the returned body drops the backend response and
/// aborts the upstream read.
pub fn relay_body(response: reqwest::Response) -> Body {
    let stream = async_stream::stream! {
        let mut guard = RelayGuard::new();
        let mut buffer = LineBuffer::new();
        let mut upstream = response.bytes_stream();

        while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(bytes) => {
                    buffer.push_chunk(&bytes);
                    while let Some(line) = buffer.next_line() {
                        if !line.is_empty() {
                            yield Ok::<_, std::convert::Infallible>(sse_frame(&line));
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "backend stream failed mid-relay");
                    guard.finish();
                    return;
                }
            }
        }

        // Forward an unterminated tail rather than dropping it.
        if let Some(rest) = buffer.take_remainder() {
            yield Ok(sse_frame(&rest));
        }
        guard.finish();
    };
    Body::from_stream(stream)
}
