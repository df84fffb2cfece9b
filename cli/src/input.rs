//! Line-based input from the terminal.

use std::io::BufRead;

use async_trait::async_trait;
use sous_core::{CommandSource, SessionCommand};
use tokio::sync::mpsc;

/// Read stdin lines on a plain thread so a pending read never holds up shutdown.
pub fn spawn_stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read from stdin");
                    break;
                }
            }
        }
    });
    rx
}

/// Map a typed line to a cooking command. Enter alone means "next".
pub fn parse_session_command(line: &str) -> Option<SessionCommand> {
    match line.trim().to_lowercase().as_str() {
        "" | "n" | "next" => Some(SessionCommand::Next),
        "r" | "repeat" => Some(SessionCommand::Repeat),
        "b" | "back" => Some(SessionCommand::Back),
        "h" | "home" | "q" | "quit" => Some(SessionCommand::Home),
        _ => None,
    }
}

/// Cooking commands read from terminal lines.
pub struct LineCommands<'a> {
    lines: &'a mut mpsc::UnboundedReceiver<String>,
}

impl<'a> LineCommands<'a> {
    pub fn new(lines: &'a mut mpsc::UnboundedReceiver<String>) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl CommandSource for LineCommands<'_> {
    async fn next_command(&mut self) -> Option<SessionCommand> {
        loop {
            let line = self.lines.recv().await?;
            match parse_session_command(&line) {
                Some(command) => return Some(command),
                None => println!("\n  Commands: [enter] next, r repeat, b back, h home"),
            }
        }
    }
}

/// A command typed on a menu screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuInput {
    /// `:name rest`
    Command { name: String, arg: String },
    Text(String),
}

pub fn parse_menu_input(line: &str) -> MenuInput {
    let line = line.trim();
    match line.strip_prefix(':') {
        Some(rest) => {
            let mut parts = rest.trim().splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or_default().to_lowercase();
            let arg = parts.next().unwrap_or_default().trim().to_string();
            MenuInput::Command { name, arg }
        }
        None => MenuInput::Text(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_command() {
        assert_eq!(parse_session_command(""), Some(SessionCommand::Next));
        assert_eq!(parse_session_command(" Next "), Some(SessionCommand::Next));
        assert_eq!(parse_session_command("r"), Some(SessionCommand::Repeat));
        assert_eq!(parse_session_command("back"), Some(SessionCommand::Back));
        assert_eq!(parse_session_command("q"), Some(SessionCommand::Home));
        assert_eq!(parse_session_command("dance"), None);
    }

    #[test]
    fn test_parse_menu_input() {
        assert_eq!(
            parse_menu_input(":lang  Assamese"),
            MenuInput::Command {
                name: "lang".to_string(),
                arg: "Assamese".to_string()
            }
        );
        assert_eq!(
            parse_menu_input(":Favorites"),
            MenuInput::Command {
                name: "favorites".to_string(),
                arg: String::new()
            }
        );
        assert_eq!(
            parse_menu_input(" eggs, onion "),
            MenuInput::Text("eggs, onion".to_string())
        );
    }

    #[tokio::test]
    async fn test_line_commands_skip_unknown_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send("dance".to_string()).unwrap();
        tx.send("repeat".to_string()).unwrap();
        drop(tx);

        let mut commands = LineCommands::new(&mut rx);
        assert_eq!(commands.next_command().await, Some(SessionCommand::Repeat));
        assert_eq!(commands.next_command().await, None);
    }
}
