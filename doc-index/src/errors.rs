//! Unified error types for the crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error for doc-index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// HTTP transport errors (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the index service.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),
}
