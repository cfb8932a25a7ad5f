//! Preflight validation checks for early failure detection
//!
//! Commands that talk to a query-answering collaborator call these checks
//! before doing any work so a missing key or a malformed agent URL fails
//! fast with an actionable message.

use anyhow::{bail, Result};
use url::Url;

use crate::utils::settings::{get_env_flag, get_env_var, get_env_vars};

/// Result of AI credential validation
#[derive(Debug)]
pub struct AiCredentialInfo {
    /// The AI provider that will be used
    pub provider: AiProvider,
    /// The model that will be used
    pub model: String,
}

/// AI provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    /// OpenAI API
    OpenAi,
    /// Anthropic Claude API
    Claude,
    /// Local Ollama
    Ollama,
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "OpenAI API"),
            Self::Claude => write!(f, "Claude API"),
            Self::Ollama => write!(f, "Ollama"),
        }
    }
}

/// Validate AI credentials are available before processing
///
/// This is a lightweight check of environment variables and settings that
/// does not build a client.
pub fn check_ai_credentials(model_override: Option<&str>) -> Result<AiCredentialInfo> {
    let configured_model = || {
        model_override
            .map(String::from)
            .or_else(|| get_env_var("SURVEY_MODEL").ok())
    };

    if get_env_flag("USE_OLLAMA") {
        let model = configured_model()
            .or_else(|| get_env_var("OLLAMA_MODEL").ok())
            .unwrap_or_else(|| "llama3".to_string());

        return Ok(AiCredentialInfo {
            provider: AiProvider::Ollama,
            model,
        });
    }

    if get_env_flag("USE_CLAUDE") {
        let model = configured_model()
            .or_else(|| get_env_var("ANTHROPIC_MODEL").ok())
            .unwrap_or_else(|| crate::llm::ai::claude::DEFAULT_CLAUDE_MODEL.to_string());

        get_env_vars(&["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"]).map_err(|_| {
            anyhow::anyhow!(
                "Claude API key not found.\n\
                 Set one of these environment variables:\n\
                 - CLAUDE_API_KEY\n\
                 - ANTHROPIC_API_KEY"
            )
        })?;

        return Ok(AiCredentialInfo {
            provider: AiProvider::Claude,
            model,
        });
    }

    // Default: OpenAI, as the survey bot has always been deployed
    let model = configured_model()
        .or_else(|| get_env_var("OPENAI_MODEL").ok())
        .unwrap_or_else(|| crate::llm::ai::openai::DEFAULT_OPENAI_MODEL.to_string());

    get_env_vars(&["OPENAI_API_KEY"]).map_err(|_| {
        anyhow::anyhow!(
            "OpenAI API key not found.\n\
             Set the OPENAI_API_KEY environment variable, or select another provider\n\
             with USE_OLLAMA=true or USE_CLAUDE=true."
        )
    })?;

    Ok(AiCredentialInfo {
        provider: AiProvider::OpenAi,
        model,
    })
}

/// Validate a remote agent URL
///
/// Only absolute http(s) URLs are accepted.
pub fn check_agent_url(raw: &str) -> Result<Url> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => bail!("Invalid agent URL '{raw}': {e}"),
    };

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Unsupported agent URL scheme '{other}' in '{raw}'. Use http or https."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_provider_display() {
        assert_eq!(format!("{}", AiProvider::OpenAi), "OpenAI API");
        assert_eq!(format!("{}", AiProvider::Claude), "Claude API");
        assert_eq!(format!("{}", AiProvider::Ollama), "Ollama");
    }

    #[test]
    fn agent_url_accepts_http() {
        let url = check_agent_url("http://localhost:8000/agent/invoke").unwrap();
        assert_eq!(url.path(), "/agent/invoke");
        assert!(check_agent_url("https://example.org").is_ok());
    }

    #[test]
    fn agent_url_rejects_garbage() {
        assert!(check_agent_url("not a url").is_err());
        let err = check_agent_url("ftp://example.org/agent").unwrap_err();
        assert!(err.to_string().contains("Unsupported agent URL scheme"));
    }
}
