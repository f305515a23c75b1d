//! Typed error for the qa-gateway crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QaError {
    /// Required connection parameters are absent; reported together so a
    /// misconfigured deployment fails once, with the full list.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<&'static str>),

    /// Errors from the underlying doc-index crate.
    #[error("search index error: {0}")]
    Index(#[from] doc_index::IndexError),

    /// Errors from the underlying llm-service crate.
    #[error("LLM error: {0}")]
    Llm(#[from] llm_service::LlmError),
}
