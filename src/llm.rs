//! Language-model clients used by the LLM-backed query agent.

pub mod ai;
pub mod error;
#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::Result;
use tracing::debug;

pub use ai::claude::ClaudeAiClient;
pub use ai::openai::OpenAiAiClient;
pub use ai::{AiClient, AiClientMetadata};
pub use error::LlmError;

use crate::utils::preflight::{check_ai_credentials, AiProvider};
use crate::utils::settings::{get_env_var, get_env_vars};

/// Creates the AI client selected by the environment and settings.
///
/// Provider selection follows [`check_ai_credentials`]: `USE_OLLAMA=true`
/// selects Ollama, `USE_CLAUDE=true` selects the Anthropic API, otherwise
/// OpenAI is used.
pub fn create_default_client(model_override: Option<&str>) -> Result<Box<dyn AiClient>> {
    let info = check_ai_credentials(model_override)?;
    debug!(provider = %info.provider, model = %info.model, "Creating AI client");

    let client: Box<dyn AiClient> = match info.provider {
        AiProvider::Ollama => Box::new(OpenAiAiClient::new_ollama(
            info.model,
            get_env_var("OLLAMA_BASE_URL").ok(),
        )?),
        AiProvider::Claude => {
            let api_key = get_env_vars(&["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"]).map_err(|_| {
                LlmError::ApiKeyNotFound {
                    provider: "Claude",
                    variables: "CLAUDE_API_KEY or ANTHROPIC_API_KEY",
                }
            })?;
            Box::new(ClaudeAiClient::new(info.model, api_key)?)
        }
        AiProvider::OpenAi => {
            let api_key =
                get_env_vars(&["OPENAI_API_KEY"]).map_err(|_| LlmError::ApiKeyNotFound {
                    provider: "OpenAI",
                    variables: "OPENAI_API_KEY",
                })?;
            let base_url = get_env_var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| ai::openai::OPENAI_BASE_URL.to_string());
            Box::new(OpenAiAiClient::new(
                info.model,
                Some(api_key),
                base_url,
                None,
                Some(0.0),
            )?)
        }
    };

    Ok(client)
}
