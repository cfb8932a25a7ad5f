//! Query agent errors.

use thiserror::Error;

/// Failures surfaced by a query-answering collaborator.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The agent endpoint could not be reached.
    #[error("Query agent unreachable: {0}")]
    Unreachable(String),

    /// The agent answered with a non-success HTTP status.
    #[error("Query agent rejected the request (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The reply was not the expected JSON document.
    #[error("Invalid response from query agent: {0}")]
    InvalidResponse(String),

    /// The reply carried no output text.
    #[error("Query agent response has no 'output' field")]
    MissingOutput,
}
