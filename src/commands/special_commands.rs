//! Special commands parser for the terminal chat
//!
//! Special commands are prefixed with `/` and are case-insensitive (their
//! arguments are not). `exit` and `quit` also work without the prefix.
//! Everything else is sent to the assistant as a chat turn.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the session or the terminal rather than being
/// sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Read a log file, show it, and ask for a summary
    ///
    /// The summary is independent of the conversation.
    Upload(PathBuf),

    /// Reprint the conversation so far
    History,

    /// Show the model, calling convention and message count
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a regular chat turn.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is
/// not a valid command, `CommandError::MissingArgument` if `/upload` has no
/// path, and `CommandError::UnsupportedArgument` if an argument-less command
/// is given one.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use troubleshoot::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/upload /var/log/syslog.log").unwrap();
/// assert_eq!(cmd, SpecialCommand::Upload(PathBuf::from("/var/log/syslog.log")));
///
/// let cmd = parse_special_command("nginx returns 502").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    let no_arg = |cmd: SpecialCommand| {
        if arg.is_empty() {
            Ok(cmd)
        } else {
            Err(CommandError::UnsupportedArgument {
                command: command.clone(),
                arg: arg.to_string(),
            })
        }
    };

    match command.as_str() {
        "/upload" | "/log" => {
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: command.clone(),
                    usage: "/upload <path>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Upload(PathBuf::from(arg)))
            }
        }
        "/history" => no_arg(SpecialCommand::History),
        "/status" => no_arg(SpecialCommand::ShowStatus),
        "/help" | "/?" => no_arg(SpecialCommand::Help),
        "exit" | "quit" | "/exit" | "/quit" => no_arg(SpecialCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands
================

LOG ANALYSIS:
  /upload <path>  - Show a .txt, .log or .csv file and summarize it
  /log <path>     - Same as /upload

SESSION:
  /history        - Reprint the conversation so far
  /status         - Show model, calling convention and message count
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  exit            - Exit the chat
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive
  - Anything else is sent to the assistant with the whole conversation
  - Log summaries are not added to the conversation
"#
    );
}
