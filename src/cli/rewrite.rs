//! Rewrite command.

use anyhow::Result;
use clap::Parser;

use super::{resolve_config, AgentArgs, RewriteArgs};

/// Prints the weighted instruction for a question without contacting any agent.
#[derive(Parser)]
pub struct RewriteCommand {
    /// Question to rewrite.
    pub question: String,

    /// Rewriting options.
    #[command(flatten)]
    pub rewrite: RewriteArgs,

    /// Prints the detected intent to stderr.
    #[arg(long)]
    pub show_intent: bool,
}

impl RewriteCommand {
    /// Executes the rewrite command.
    pub fn execute(self) -> Result<()> {
        let config = resolve_config(self.rewrite, AgentArgs::default())?;
        let rewritten = config.rewriter().rewrite(&self.question);

        if self.show_intent {
            eprintln!("intent: {}", rewritten.intent);
        }
        println!("{}", rewritten.instruction);
        Ok(())
    }
}
