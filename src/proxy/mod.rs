//! Backend translation and streaming relay.
//!
//! [`client`] turns inbound OpenAI-shaped requests into backend calls
//! (model remap, credential injection, verbatim body forwarding);
//! [`relay`] pipes streaming bodies back to the caller line by line;
//! [`sse`] holds the chunk-boundary-safe line framing both share.

pub mod client;
pub mod relay;
pub mod sse;

pub use client::{
    resolve_target, synthetic_embedding_response, BackendClient, BackendTarget, EmbeddingsReply,
    EMBEDDING_DIMENSIONS,
};
pub use relay::{error_frame, relay_body, sse_response};
