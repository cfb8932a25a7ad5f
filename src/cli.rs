//! CLI interface for survey-query.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::{AppConfig, ConfigOverrides};

pub mod ask;
pub mod chat;
pub mod config;
pub mod rewrite;

/// survey-query: weighted natural-language queries over household survey data.
#[derive(Parser)]
#[command(name = "survey-query")]
#[command(
    about = "Rewrites survey questions so every estimate is weighted by the expansion factor",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Prints the weighted instruction for a question.
    Rewrite(rewrite::RewriteCommand),
    /// Rewrites a question, forwards it to the query agent and prints the answer.
    Ask(ask::AskCommand),
    /// Interactive question/answer session.
    Chat(chat::ChatCommand),
    /// Configuration information.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Rewrite(rewrite_cmd) => rewrite_cmd.execute(),
            Commands::Ask(ask_cmd) => ask_cmd.execute().await,
            Commands::Chat(chat_cmd) => chat_cmd.execute().await,
            Commands::Config(config_cmd) => config_cmd.execute(),
        }
    }
}

/// Flags controlling how questions are rewritten.
#[derive(Args, Clone, Debug, Default)]
pub struct RewriteArgs {
    /// Expansion-factor column (overrides SURVEY_WEIGHT_COLUMN).
    #[arg(long, value_name = "COLUMN")]
    pub weight_column: Option<String>,
    /// Lowercases the question text in the instruction.
    #[arg(long)]
    pub lowercase: bool,
    /// Only treats explicit "promedio de"/"average of" phrasing as an average.
    #[arg(long)]
    pub explicit_average: bool,
}

/// Flags selecting the query agent.
#[derive(Args, Clone, Debug, Default)]
pub struct AgentArgs {
    /// AI model to use (overrides environment configuration).
    #[arg(long)]
    pub model: Option<String>,
    /// Remote agent endpoint (overrides SURVEY_AGENT_URL).
    #[arg(long, value_name = "URL")]
    pub agent_url: Option<String>,
}

/// Resolves the effective configuration for a command.
pub(crate) fn resolve_config(rewrite: RewriteArgs, agent: AgentArgs) -> Result<AppConfig> {
    AppConfig::from_env()?.apply(ConfigOverrides {
        weight_column: rewrite.weight_column,
        lowercase: rewrite.lowercase,
        explicit_average: rewrite.explicit_average,
        agent_url: agent.agent_url,
        model: agent.model,
    })
}
