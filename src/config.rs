//! Effective application configuration.
//!
//! Values come from environment variables, falling back to
//! `$HOME/.survey-query/settings.json`; command-line flags are applied on
//! top through [`ConfigOverrides`].

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::agent::{LlmAgent, QueryAgent, RemoteAgent};
use crate::rewriter::{
    AverageVocabulary, CaseMode, RewriteOptions, WeightedQueryRewriter, DEFAULT_WEIGHT_COLUMN,
};
use crate::utils::preflight::check_agent_url;
use crate::utils::settings::get_env_var;

/// Weight column variable.
pub const WEIGHT_COLUMN_VAR: &str = "SURVEY_WEIGHT_COLUMN";
/// Case mode variable (`preserve` or `lowercase`).
pub const CASE_MODE_VAR: &str = "SURVEY_CASE_MODE";
/// Average vocabulary variable (`broad` or `explicit`).
pub const AVERAGE_KEYWORDS_VAR: &str = "SURVEY_AVERAGE_KEYWORDS";
/// Remote agent endpoint variable.
pub const AGENT_URL_VAR: &str = "SURVEY_AGENT_URL";
/// Bearer token for the remote agent.
pub const AGENT_TOKEN_VAR: &str = "SURVEY_AGENT_TOKEN";
/// Model override for the language-model agent.
pub const MODEL_VAR: &str = "SURVEY_MODEL";

/// Resolved configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Rewriter options.
    pub rewrite: RewriteOptions,
    /// Remote agent endpoint; `None` selects the language-model agent.
    pub agent_url: Option<Url>,
    /// Bearer token sent to the remote agent.
    pub agent_token: Option<String>,
    /// Model override for the language-model agent.
    pub model: Option<String>,
}

/// Command-line values that take precedence over the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Weight column.
    pub weight_column: Option<String>,
    /// Forces [`CaseMode::Lowercase`].
    pub lowercase: bool,
    /// Forces [`AverageVocabulary::Explicit`].
    pub explicit_average: bool,
    /// Remote agent endpoint.
    pub agent_url: Option<String>,
    /// Model override.
    pub model: Option<String>,
}

/// Printable view of an [`AppConfig`]; the token is never shown.
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    weight_column: String,
    case_mode: CaseMode,
    average_keywords: AverageVocabulary,
    agent: String,
    agent_url: Option<String>,
    agent_token: &'static str,
    model: Option<String>,
}

impl AppConfig {
    /// Resolves the configuration from the environment and settings file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| get_env_var(key).ok())
    }

    /// Resolves the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let weight_column =
            non_empty(WEIGHT_COLUMN_VAR).unwrap_or_else(|| DEFAULT_WEIGHT_COLUMN.to_string());

        let case_mode = match non_empty(CASE_MODE_VAR) {
            Some(raw) => raw
                .parse::<CaseMode>()
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("Invalid {CASE_MODE_VAR}"))?,
            None => CaseMode::default(),
        };

        let average_vocabulary = match non_empty(AVERAGE_KEYWORDS_VAR) {
            Some(raw) => raw
                .parse::<AverageVocabulary>()
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("Invalid {AVERAGE_KEYWORDS_VAR}"))?,
            None => AverageVocabulary::default(),
        };

        let agent_url = non_empty(AGENT_URL_VAR)
            .map(|raw| check_agent_url(raw.trim()))
            .transpose()
            .with_context(|| format!("Invalid {AGENT_URL_VAR}"))?;

        let config = Self {
            rewrite: RewriteOptions {
                weight_column: weight_column.trim().to_string(),
                case_mode,
                average_vocabulary,
            },
            agent_url,
            agent_token: non_empty(AGENT_TOKEN_VAR),
            model: non_empty(MODEL_VAR),
        };
        debug!(rewrite = ?config.rewrite, agent_url = ?config.agent_url, "Resolved configuration");
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(column) = overrides.weight_column {
            let column = column.trim();
            if column.is_empty() {
                return Err(anyhow!("Weight column must not be empty"));
            }
            self.rewrite.weight_column = column.to_string();
        }
        if overrides.lowercase {
            self.rewrite.case_mode = CaseMode::Lowercase;
        }
        if overrides.explicit_average {
            self.rewrite.average_vocabulary = AverageVocabulary::Explicit;
        }
        if let Some(raw) = overrides.agent_url {
            self.agent_url = Some(check_agent_url(raw.trim())?);
        }
        if overrides.model.is_some() {
            self.model = overrides.model;
        }
        Ok(self)
    }

    /// Builds the rewriter for this configuration.
    pub fn rewriter(&self) -> WeightedQueryRewriter {
        WeightedQueryRewriter::new(self.rewrite.clone())
    }

    /// Builds the query agent: remote when a URL is configured, otherwise a
    /// language model selected by the provider settings.
    ///
    /// Fails before any request is made when credentials are missing.
    pub fn build_agent(&self) -> Result<Box<dyn QueryAgent>> {
        if let Some(ref url) = self.agent_url {
            let mut agent = RemoteAgent::new(url.clone())?;
            if let Some(ref token) = self.agent_token {
                agent = agent.with_token(token.clone());
            }
            return Ok(Box::new(agent));
        }

        let client = crate::llm::create_default_client(self.model.as_deref())?;
        Ok(Box::new(LlmAgent::new(client, &self.rewrite.weight_column)))
    }

    /// Returns the printable view of this configuration.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            weight_column: self.rewrite.weight_column.clone(),
            case_mode: self.rewrite.case_mode,
            average_keywords: self.rewrite.average_vocabulary,
            agent: if self.agent_url.is_some() {
                "remote".to_string()
            } else {
                "llm".to_string()
            },
            agent_url: self.agent_url.as_ref().map(Url::to_string),
            agent_token: if self.agent_token.is_some() {
                "set"
            } else {
                "unset"
            },
            model: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.rewrite, RewriteOptions::default());
        assert_eq!(config.rewrite.weight_column, "Factor_expasion");
        assert!(config.agent_url.is_none());
        assert!(config.model.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (WEIGHT_COLUMN_VAR, "factor"),
            (CASE_MODE_VAR, "Lowercase"),
            (AVERAGE_KEYWORDS_VAR, "explicit"),
            (AGENT_URL_VAR, "http://localhost:8000/invoke"),
            (AGENT_TOKEN_VAR, "t0k"),
            (MODEL_VAR, "gpt-4o-mini"),
        ])
        .unwrap();

        assert_eq!(config.rewrite.weight_column, "factor");
        assert_eq!(config.rewrite.case_mode, CaseMode::Lowercase);
        assert_eq!(
            config.rewrite.average_vocabulary,
            AverageVocabulary::Explicit
        );
        assert_eq!(
            config.agent_url.as_ref().map(Url::as_str),
            Some("http://localhost:8000/invoke")
        );
        assert_eq!(config.agent_token.as_deref(), Some("t0k"));
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(WEIGHT_COLUMN_VAR, "  "), (AGENT_URL_VAR, "")]).unwrap();
        assert_eq!(config.rewrite.weight_column, DEFAULT_WEIGHT_COLUMN);
        assert!(config.agent_url.is_none());
    }

    #[test]
    fn rejects_unknown_case_mode() {
        let err = config_from(&[(CASE_MODE_VAR, "upper")]).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains(CASE_MODE_VAR));
        assert!(message.contains("upper"));
    }

    #[test]
    fn rejects_unknown_vocabulary() {
        assert!(config_from(&[(AVERAGE_KEYWORDS_VAR, "narrow")]).is_err());
    }

    #[test]
    fn rejects_non_http_agent_url() {
        let err = config_from(&[(AGENT_URL_VAR, "ftp://example.com")]).unwrap_err();
        assert!(format!("{err:#}").contains(AGENT_URL_VAR));
    }

    #[test]
    fn overrides_take_precedence() {
        let config = config_from(&[(WEIGHT_COLUMN_VAR, "factor"), (MODEL_VAR, "gpt-4o")])
            .unwrap()
            .apply(ConfigOverrides {
                weight_column: Some("peso".to_string()),
                lowercase: true,
                explicit_average: true,
                agent_url: Some("https://agent.example.com/run".to_string()),
                model: None,
            })
            .unwrap();

        assert_eq!(config.rewrite.weight_column, "peso");
        assert_eq!(config.rewrite.case_mode, CaseMode::Lowercase);
        assert_eq!(
            config.rewrite.average_vocabulary,
            AverageVocabulary::Explicit
        );
        assert!(config.agent_url.is_some());
        // Unset overrides keep the environment value.
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn empty_weight_column_override_is_rejected() {
        let result = config_from(&[]).unwrap().apply(ConfigOverrides {
            weight_column: Some(" ".to_string()),
            ..ConfigOverrides::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn remote_agent_is_built_without_credentials() {
        let config = config_from(&[(AGENT_URL_VAR, "http://127.0.0.1:9/invoke")]).unwrap();
        let agent = config.build_agent().unwrap();
        assert_eq!(agent.describe(), "remote agent at http://127.0.0.1:9/invoke");
    }

    #[test]
    fn summary_hides_token() {
        let config = config_from(&[
            (AGENT_URL_VAR, "http://localhost:8000/invoke"),
            (AGENT_TOKEN_VAR, "secret-token"),
        ])
        .unwrap();
        let yaml = crate::data::yaml::to_yaml(&config.summary()).unwrap();
        assert!(!yaml.contains("secret-token"));
        assert!(yaml.contains("agent_token: set"));
        assert!(yaml.contains("agent: remote"));
        assert!(yaml.contains("case_mode: preserve"));
        assert!(yaml.contains("average_keywords: broad"));
    }
}
