/// Configuration for a hosted chat-completion deployment.
///
/// The deployment name is part of the request URL, so there is no per-request
/// model field; everything needed to reach and steer the model lives here.
///
/// # Fields
///
/// - `endpoint`: base URL of the hosting service (`https://...`).
/// - `deployment`: deployed model identifier bound into the URL path.
/// - `api_key`: static key sent as the `api-key` header.
/// - `api_version`: REST API version appended as a query parameter.
/// - `max_tokens`: output-token budget for one completion (if any).
/// - `temperature`: sampling temperature (low values bias toward grounded,
///   repeatable phrasing).
/// - `timeout_secs`: per-request timeout in seconds.
#[derive(Debug, Clone)]
pub struct ChatModelConfig {
    /// Base URL of the completion service.
    pub endpoint: String,

    /// Deployed model identifier (URL path segment).
    pub deployment: String,

    /// Static key credential.
    pub api_key: String,

    /// REST API version (query parameter).
    pub api_version: String,

    /// Maximum number of output tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}
