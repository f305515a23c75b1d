//! Chat-completion access for the documentation QA backend.
//!
//! The crate wraps a single hosted chat deployment behind a small, validated
//! client:
//!
//! - [`ChatModelConfig`] describes the deployment (endpoint, name, key,
//!   sampling knobs, timeout).
//! - [`ChatService`] is the non-streaming REST client.
//! - [`ChatCompletion`] is the trait seam callers depend on, so answer
//!   generation can be exercised against in-process stubs.
//!
//! Errors are normalized via the unified types in [`error_handler`].

pub mod chat_service;
pub mod config;
pub mod error_handler;
pub mod telemetry;

pub use chat_service::{ChatCompletion, ChatService};
pub use config::ChatModelConfig;
pub use error_handler::{ConfigError, LlmError, ProviderError};
