//! Error types for text-generation calls

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

/// Failures surfaced by a text-generation provider
///
/// HTTP status codes from the provider map onto the first five variants;
/// transport failures arrive as [`LLMError::HttpError`].
#[derive(Error, Debug)]
pub enum LLMError {
    /// Non-success status without a more specific mapping
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Body parsed but carried no usable completion
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Missing key or base URL
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
