//! Question/answer sessions.
//!
//! A [`Session`] ties a rewriter to a query agent. The log of exchanges is a
//! plain [`History`] value owned by the caller: it goes into every
//! [`Session::ask`] call and comes back out, extended on success.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agent::QueryAgent;
use crate::rewriter::{Intent, WeightedQueryRewriter};

/// One answered question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// Question as typed by the analyst.
    pub original: String,
    /// Instruction sent to the agent.
    pub rewritten: String,
    /// Category the rewriter selected.
    pub intent: Intent,
    /// Agent's answer.
    pub answer: String,
    /// When the answer was received.
    pub asked_at: DateTime<Utc>,
}

/// Append-only log of exchanges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Exchange>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the history with `exchange` appended.
    #[must_use]
    pub fn record(mut self, exchange: Exchange) -> Self {
        self.entries.push(exchange);
        self
    }

    /// Exchanges in the order they happened.
    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    /// Number of recorded exchanges.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the history as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        crate::data::yaml::to_yaml(self).context("Failed to render history as YAML")
    }

    /// Writes the history to a YAML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::data::yaml::write_yaml_file(self, path)
    }

    /// Reads a history previously written with [`History::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::data::yaml::read_yaml_file(path)
    }
}

/// Rewriter plus agent, borrowed for the duration of a conversation.
pub struct Session<'a> {
    rewriter: &'a WeightedQueryRewriter,
    agent: &'a dyn QueryAgent,
}

impl<'a> Session<'a> {
    /// Creates a session.
    pub fn new(rewriter: &'a WeightedQueryRewriter, agent: &'a dyn QueryAgent) -> Self {
        Self { rewriter, agent }
    }

    /// Rewrites `question`, forwards it to the agent and records the answer.
    ///
    /// On failure the history comes back unchanged alongside the error.
    pub async fn ask(&self, history: History, question: &str) -> (History, Result<Exchange>) {
        let rewritten = self.rewriter.rewrite(question);
        info!(intent = %rewritten.intent, "Forwarding rewritten question to agent");

        match self.agent.answer(&rewritten.instruction).await {
            Ok(response) => {
                let exchange = Exchange {
                    original: rewritten.original,
                    rewritten: rewritten.instruction,
                    intent: rewritten.intent,
                    answer: response.output,
                    asked_at: Utc::now(),
                };
                (history.record(exchange.clone()), Ok(exchange))
            }
            Err(err) => {
                warn!(error = %err, "Query agent failed");
                (history, Err(err.context("Query agent failed to answer")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use super::*;
    use crate::agent::AgentResponse;
    use crate::rewriter::Period;

    /// Agent that echoes instructions and fails on demand.
    struct EchoAgent {
        fail: bool,
        seen: Mutex<Vec<String>>,
    }

    impl EchoAgent {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl QueryAgent for EchoAgent {
        fn answer<'a>(
            &'a self,
            instruction: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<AgentResponse>> + Send + 'a>> {
            Box::pin(async move {
                self.seen.lock().unwrap().push(instruction.to_string());
                if self.fail {
                    anyhow::bail!("agent offline");
                }
                Ok(AgentResponse {
                    output: format!("answer #{}", self.seen.lock().unwrap().len()),
                })
            })
        }

        fn describe(&self) -> String {
            "echo".to_string()
        }
    }

    #[tokio::test]
    async fn ask_records_exchanges_in_order() {
        let rewriter = WeightedQueryRewriter::default();
        let agent = EchoAgent::new(false);
        let session = Session::new(&rewriter, &agent);

        let (history, first) = session.ask(History::new(), "ingreso anual por NSE").await;
        let first = first.unwrap();
        assert_eq!(first.intent, Intent::Periodized(Period::Annual));
        assert_eq!(first.answer, "answer #1");

        let (history, _) = session.ask(history, "¿Qué porcentaje?").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].original, "ingreso anual por NSE");
        assert_eq!(history.entries()[1].intent, Intent::Share);
        assert_eq!(history.entries()[1].answer, "answer #2");

        let seen = agent.seen.lock().unwrap();
        assert!(seen[0].contains("* 12"));
        assert_eq!(seen[0], history.entries()[0].rewritten);
    }

    #[tokio::test]
    async fn failure_leaves_history_unchanged() {
        let rewriter = WeightedQueryRewriter::default();
        let agent = EchoAgent::new(true);
        let session = Session::new(&rewriter, &agent);

        let (history, result) = session.ask(History::new(), "¿Cuántos registros?").await;
        assert!(history.is_empty());
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("agent offline"));
    }

    #[test]
    fn yaml_round_trip_through_file() {
        let history = History::new().record(Exchange {
            original: "¿Qué porcentaje?".to_string(),
            rewritten: "¿Qué porcentaje? Recuerda ponderar".to_string(),
            intent: Intent::Share,
            answer: "El 12.3% de los hogares.".to_string(),
            asked_at: Utc::now(),
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.yaml");
        history.save(&path).unwrap();

        let loaded = History::load(&path).unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn indented_multiline_answer_survives_save_and_load() {
        let history = History::new()
            .record(Exchange {
                original: "¿Hogares por entidad?".to_string(),
                rewritten: "¿Hogares por entidad? Recuerda ponderar".to_string(),
                intent: Intent::Unweighted,
                answer: "  Entidad   Hogares\n  CDMX      2,756,319".to_string(),
                asked_at: Utc::now(),
            })
            .record(Exchange {
                original: "q".to_string(),
                rewritten: "q. r".to_string(),
                intent: Intent::Average,
                answer: "línea 1\nlínea 2\n".to_string(),
                asked_at: Utc::now(),
            });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.yaml");
        history.save(&path).unwrap();

        assert_eq!(History::load(&path).unwrap(), history);
    }

    #[test]
    fn yaml_keeps_intent_readable() {
        let history = History::new().record(Exchange {
            original: "q".to_string(),
            rewritten: "q. r".to_string(),
            intent: Intent::Periodized(Period::Weekly),
            answer: "a".to_string(),
            asked_at: Utc::now(),
        });
        let yaml = history.to_yaml().unwrap();
        assert!(yaml.contains("category: periodized"));
        assert!(yaml.contains("period: weekly"));
    }
}
