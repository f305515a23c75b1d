//! Configuration for the hosted search index.

use crate::errors::IndexError;

/// Connection parameters for one search index.
///
/// All values are plain strings supplied by the caller (typically from
/// environment-driven configuration); [`IndexConfig::validate`] is run by
/// the client constructor before any request is made.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Base URL of the search service.
    pub endpoint: String,

    /// Name of the index to query.
    pub index_name: String,

    /// Static key credential sent as the `api-key` header.
    pub api_key: String,

    /// REST API version (query parameter).
    pub api_version: String,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl IndexConfig {
    /// Checks that the config is usable before building a client.
    ///
    /// # Errors
    /// Returns `IndexError::Config` naming the offending field.
    pub fn validate(&self) -> Result<(), IndexError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(IndexError::Config(format!(
                "endpoint must start with http:// or https://, got {:?}",
                self.endpoint
            )));
        }
        if self.index_name.trim().is_empty() {
            return Err(IndexError::Config("index_name must not be empty".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(IndexError::Config("api_key must not be empty".into()));
        }
        Ok(())
    }
}
