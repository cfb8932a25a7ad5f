//! Language-model client errors.

use thiserror::Error;

/// Errors raised by the language-model clients.
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key configured for the selected provider.
    #[error("{provider} API key not found. Set {variables} environment variable")]
    ApiKeyNotFound {
        /// Human-readable provider name.
        provider: &'static str,
        /// Variables that were checked.
        variables: &'static str,
    },

    /// The provider answered with a non-success status.
    #[error("Language model request failed: {0}")]
    ApiRequestFailed(String),

    /// The provider answered with a body we could not interpret.
    #[error("Invalid response format from language model: {0}")]
    InvalidResponseFormat(String),

    /// The provider could not be reached.
    #[error("Network error: {0}")]
    NetworkError(String),
}
