//! Query agent backed directly by a language model.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use tracing::info;

use super::{AgentResponse, QueryAgent};
use crate::llm::AiClient;

/// Builds the system prompt for a survey table weighted by `weight_column`.
pub fn system_prompt(weight_column: &str) -> String {
    format!(
        r"You are a statistical analyst answering questions about a household income and
expenditure survey. Each row is one household; the column '{weight_column}' is the
survey expansion factor that scales the sample to the population.

Rules:
1. Every count, total, mean, percentage and distribution must be weighted by
   '{weight_column}'. Never report an unweighted figure as a population estimate.
2. When the question includes an explicit formula, apply it exactly as written.
3. Income and expense variables are monthly unless the question asks otherwise.
4. Do not truncate result sets when the question asks for all categories.
5. Answer in the same language as the question, concisely, with the figures
   you computed."
    )
}

/// Query agent that forwards the instruction to an [`AiClient`].
pub struct LlmAgent {
    client: Box<dyn AiClient>,
    system_prompt: String,
}

impl LlmAgent {
    /// Creates an agent whose system prompt names `weight_column`.
    pub fn new(client: Box<dyn AiClient>, weight_column: &str) -> Self {
        Self {
            client,
            system_prompt: system_prompt(weight_column),
        }
    }
}

impl QueryAgent for LlmAgent {
    fn answer<'a>(
        &'a self,
        instruction: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AgentResponse>> + Send + 'a>> {
        Box::pin(async move {
            let metadata = self.client.get_metadata();
            info!(
                provider = %metadata.provider,
                model = %metadata.model,
                "Sending instruction to language model agent"
            );
            let output = self
                .client
                .send_request(&self.system_prompt, instruction)
                .await?;
            Ok(AgentResponse { output })
        })
    }

    fn describe(&self) -> String {
        let metadata = self.client.get_metadata();
        format!("{} ({})", metadata.provider, metadata.model)
    }
}
