//! Interactive chat session.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::info;

use super::{resolve_config, AgentArgs, RewriteArgs};
use crate::session::{History, Session};

/// Interactive question/answer session.
#[derive(Parser)]
pub struct ChatCommand {
    /// Rewriting options.
    #[command(flatten)]
    pub rewrite: RewriteArgs,

    /// Agent selection.
    #[command(flatten)]
    pub agent: AgentArgs,

    /// Writes the session history to this YAML file on exit.
    #[arg(long, value_name = "PATH")]
    pub save_history: Option<PathBuf>,
}

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Empty,
    ShowHistory,
    Quit,
    Question(&'a str),
}

fn parse_input(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "" => ChatInput::Empty,
        "/history" => ChatInput::ShowHistory,
        "/quit" | "/exit" => ChatInput::Quit,
        question => ChatInput::Question(question),
    }
}

impl ChatCommand {
    /// Executes the chat command.
    pub async fn execute(self) -> Result<()> {
        let config = resolve_config(self.rewrite, self.agent)?;
        let agent = config.build_agent()?;
        let rewriter = config.rewriter();

        eprintln!(
            "Connected to {} (weight column: {})",
            agent.describe(),
            rewriter.weight_column()
        );
        eprintln!("Enter to send, Shift+Enter for newline, /history to review, Ctrl+D to exit.\n");

        let session = Session::new(&rewriter, agent.as_ref());
        let history = chat_loop(&session).await?;

        if let Some(path) = self.save_history {
            history.save(&path)?;
            info!(path = %path.display(), entries = history.len(), "Saved chat history");
            eprintln!("History saved to {}", path.display());
        }

        Ok(())
    }
}

async fn chat_loop(session: &Session<'_>) -> Result<History> {
    let mut history = History::new();

    loop {
        let input = match read_user_input() {
            Ok(Some(text)) => text,
            Ok(None) => {
                eprintln!("\nGoodbye!");
                break;
            }
            Err(e) => {
                eprintln!("\nInput error: {e}");
                break;
            }
        };

        match parse_input(&input) {
            ChatInput::Empty => continue,
            ChatInput::Quit => break,
            ChatInput::ShowHistory => {
                if history.is_empty() {
                    eprintln!("(no questions yet)\n");
                } else {
                    println!("{}", history.to_yaml()?);
                }
            }
            ChatInput::Question(question) => {
                let (next, result) = session.ask(history, question).await;
                history = next;
                match result {
                    Ok(exchange) => println!("{}\n", exchange.answer),
                    Err(e) => eprintln!("Error: {e:#}\n"),
                }
            }
        }
    }

    Ok(history)
}

/// Guard that disables raw mode on drop.
struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Reads multiline user input with "> " prompt.
///
/// Returns `Ok(Some(text))` on Enter, `Ok(None)` on Ctrl+D/Ctrl+C.
fn read_user_input() -> Result<Option<String>> {
    eprint!("> ");
    io::stderr().flush()?;

    enable_raw_mode()?;
    let _guard = RawModeGuard;

    let mut buffer = String::new();

    loop {
        if let Event::Key(key_event) = event::read()? {
            match key_event.code {
                KeyCode::Enter => {
                    eprint!("\r\n");
                    if key_event.modifiers.contains(KeyModifiers::SHIFT) {
                        buffer.push('\n');
                        eprint!("... ");
                        io::stderr().flush()?;
                    } else {
                        io::stderr().flush()?;
                        return Ok(Some(buffer));
                    }
                }
                KeyCode::Char('d') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                    if buffer.is_empty() {
                        return Ok(None);
                    }
                    eprint!("\r\n");
                    io::stderr().flush()?;
                    return Ok(Some(buffer));
                }
                KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None);
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    eprint!("{c}");
                    io::stderr().flush()?;
                }
                KeyCode::Backspace => {
                    if buffer.pop().is_some() {
                        eprint!("\x08 \x08");
                        io::stderr().flush()?;
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_commands() {
        assert_eq!(parse_input("   "), ChatInput::Empty);
        assert_eq!(parse_input("/history"), ChatInput::ShowHistory);
        assert_eq!(parse_input(" /quit "), ChatInput::Quit);
        assert_eq!(parse_input("/exit"), ChatInput::Quit);
    }

    #[test]
    fn questions_are_trimmed() {
        assert_eq!(
            parse_input("  ¿Cuál es el gasto semanal?\n"),
            ChatInput::Question("¿Cuál es el gasto semanal?")
        );
    }
}
