//! Unified error handling for `llm-service`.
//!
//! One top-level [`LlmError`] for the whole crate, with domain-specific
//! enums nested under it: [`ConfigError`] for validation problems caught at
//! construction time and [`ProviderError`] for failures talking to the
//! completion endpoint. Messages carry the `[LLM Service]` suffix so log
//! lines are attributable without extra context.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the crate.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Top-level error for the `llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration/validation errors (construction time).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failures from the completion endpoint itself.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (connect, TLS, timeout).
    #[error("[LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/// Validation errors caught when building a [`crate::ChatService`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric field was outside of the allowed range.
    #[error("[LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range (e.g., `expected 0.0..=2.0`).
        detail: &'static str,
    },

    /// Deployment name was empty.
    #[error("[LLM Service] deployment name must not be empty")]
    EmptyDeployment,
}

/// Failures observed while talking to the completion endpoint.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key was supplied.
    #[error("[LLM Service] missing API key")]
    MissingApiKey,

    /// The endpoint is empty or does not start with http/https.
    #[error("[LLM Service] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("[LLM Service] HTTP {} from {}: {}", .0.status, .0.url, .0.snippet)]
    HttpStatus(HttpError),

    /// Response payload could not be decoded as expected.
    #[error("[LLM Service] decode error: {0}")]
    Decode(String),

    /// The completion response contained no usable choices.
    #[error("[LLM Service] completion returned no choices")]
    EmptyChoices,
}

/// Details of a non-success HTTP response.
#[derive(Debug)]
pub struct HttpError {
    /// Numeric HTTP status code.
    pub status: StatusCode,
    /// Request URL.
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

/// Clips a response body to a short, log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        return trimmed.to_string();
    }
    let mut end = MAX;
    while end > 0 && !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &trimmed[..end])
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`
/// or not finite.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_clips_long_bodies_on_char_boundaries() {
        let body = "é".repeat(400);
        let snippet = make_snippet(&body);
        assert!(snippet.len() <= 204);
        assert!(snippet.ends_with('…'));
        // Short bodies pass through trimmed.
        assert_eq!(make_snippet("  oops \n"), "oops");
    }

    #[test]
    fn range_validation() {
        assert!(validate_range_f32("temperature", 0.3, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", 2.5, 0.0, 2.0).is_err());
        assert!(validate_range_f32("temperature", f32::NAN, 0.0, 2.0).is_err());
    }
}
