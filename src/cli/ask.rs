//! Ask command.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use super::{resolve_config, AgentArgs, RewriteArgs};
use crate::session::{History, Session};

/// Rewrites one question, forwards it to the query agent and prints the answer.
#[derive(Parser)]
pub struct AskCommand {
    /// Question to ask.
    pub question: String,

    /// Rewriting options.
    #[command(flatten)]
    pub rewrite: RewriteArgs,

    /// Agent selection.
    #[command(flatten)]
    pub agent: AgentArgs,
}

impl AskCommand {
    /// Executes the ask command.
    pub async fn execute(self) -> Result<()> {
        let config = resolve_config(self.rewrite, self.agent)?;
        let agent = config.build_agent()?;
        let rewriter = config.rewriter();
        debug!(agent = %agent.describe(), "Query agent ready");

        let session = Session::new(&rewriter, agent.as_ref());
        let (_, result) = session.ask(History::new(), &self.question).await;
        let exchange = result?;

        println!("{}", exchange.answer);
        Ok(())
    }
}
