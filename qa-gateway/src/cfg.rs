//! Runtime configuration loaded from environment variables.

use doc_index::IndexConfig;
use llm_service::ChatModelConfig;

use crate::error::QaError;

/// Environment variables that must be present before the pipeline can be
/// built. Checked together so one error names every missing value.
pub const REQUIRED_ENV: [&str; 6] = [
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_API_KEY",
    "AZURE_OPENAI_DEPLOYMENT_NAME",
    "AZURE_SEARCH_ENDPOINT",
    "AZURE_SEARCH_INDEX_NAME",
    "AZURE_SEARCH_API_KEY",
];

/// Config bag for the pipeline: both client configs plus retrieval knobs.
#[derive(Clone, Debug)]
pub struct QaConfig {
    /// Search-index connection parameters.
    pub search: IndexConfig,
    /// Chat-deployment connection parameters.
    pub chat: ChatModelConfig,
    /// Documents requested per keyword search.
    pub top_k: u32,
    /// Documents joined into the prompt context.
    pub context_limit: usize,
}

impl QaConfig {
    /// Builds the config strictly from the environment.
    ///
    /// Optional knobs fall back to defaults: `QA_TOP_K` (3),
    /// `QA_CONTEXT_LIMIT` (3), `LLM_TEMPERATURE` (0.3), `LLM_MAX_TOKENS`
    /// (1500), `LLM_TIMEOUT_SECS` (30), `SEARCH_TIMEOUT_SECS` (30),
    /// `AZURE_OPENAI_API_VERSION`, `AZURE_SEARCH_API_VERSION`.
    ///
    /// # Errors
    /// Returns [`QaError::MissingEnv`] listing every absent required
    /// variable of [`REQUIRED_ENV`].
    pub fn from_env() -> Result<Self, QaError> {
        let mut missing = Vec::new();
        let mut required = |name: &'static str| match std::env::var(name) {
            Ok(v) if !v.trim().is_empty() => v,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let openai_endpoint = required("AZURE_OPENAI_ENDPOINT");
        let openai_api_key = required("AZURE_OPENAI_API_KEY");
        let deployment = required("AZURE_OPENAI_DEPLOYMENT_NAME");
        let search_endpoint = required("AZURE_SEARCH_ENDPOINT");
        let index_name = required("AZURE_SEARCH_INDEX_NAME");
        let search_api_key = required("AZURE_SEARCH_API_KEY");

        if !missing.is_empty() {
            return Err(QaError::MissingEnv(missing));
        }

        let chat = ChatModelConfig {
            endpoint: openai_endpoint,
            deployment,
            api_key: openai_api_key,
            api_version: env("AZURE_OPENAI_API_VERSION", "2024-02-01"),
            max_tokens: Some(parse("LLM_MAX_TOKENS", 1500u32)),
            temperature: Some(parse("LLM_TEMPERATURE", 0.3f32)),
            timeout_secs: Some(parse("LLM_TIMEOUT_SECS", 30u64)),
        };

        let search = IndexConfig {
            endpoint: search_endpoint,
            index_name,
            api_key: search_api_key,
            api_version: env("AZURE_SEARCH_API_VERSION", "2023-11-01"),
            timeout_secs: Some(parse("SEARCH_TIMEOUT_SECS", 30u64)),
        };

        Ok(Self {
            search,
            chat,
            top_k: parse("QA_TOP_K", 3u32),
            context_limit: parse("QA_CONTEXT_LIMIT", 3usize),
        })
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
