//! Query-answering collaborators.
//!
//! A [`QueryAgent`] takes the rewritten instruction and returns an answer
//! text. How it gets there (SQL generation, a hosted agent executor, a bare
//! language model) is its own business.

pub mod error;
pub mod llm;
pub mod remote;

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use error::AgentError;
pub use llm::LlmAgent;
pub use remote::RemoteAgent;

/// Answer returned by a query agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Answer text shown to the analyst.
    pub output: String,
}

/// Trait for query-answering collaborators.
pub trait QueryAgent: Send + Sync {
    /// Sends an instruction and returns the agent's answer.
    fn answer<'a>(
        &'a self,
        instruction: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AgentResponse>> + Send + 'a>>;

    /// Short human-readable description, e.g. for the chat banner.
    fn describe(&self) -> String;
}
