//! ferrygate — an OpenAI-compatible gateway for cookie-authenticated AI
//! backends.
//!
//! The gateway exposes the standard `/v1` surface (models, chat
//! completions, embeddings), translates each request for the configured
//! backend family (model remapping, `Cookie` header injection), forwards
//! bodies verbatim, and relays streaming responses line by line.

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod backend;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod proxy;
pub mod server;

pub use backend::BackendKind;
pub use config::GatewayConfig;
pub use error::{GatewayError, Result, StorageError};
