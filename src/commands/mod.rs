/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes four top-level command modules:

- `serve`     - Web widget server
- `chat`      - Interactive terminal chat
- `summarize` - One-shot log summary
- `auth`      - Store the API key in the system keyring
*/

use crate::config::Config;
use crate::error::Result;
use crate::ingest::LogReport;
use crate::prompts::{LOG_CONTENT_HEADING, LOG_SUMMARY_HEADING};
use crate::providers::{CompletionAdapter, Message, Role};
use colored::Colorize;
use std::sync::Arc;

// Special commands parser for the terminal chat
pub mod special_commands;

/// Lines of a log shown before the preview is cut off
const PREVIEW_LINES: usize = 40;

fn print_message(message: &Message) {
    let tag = match message.role {
        Role::User => "you".cyan().bold(),
        Role::Assistant => "assistant".green().bold(),
        Role::System => "system".dimmed(),
    };
    println!("{}\n{}\n", tag, message.content);
}

fn print_failure(message: &str, trace: &str) {
    eprintln!("{}", message.red());
    eprintln!("{}\n", trace.dimmed());
}

fn print_log_preview(content: &str) {
    println!("\n{}", LOG_CONTENT_HEADING.bold());
    let total = content.lines().count();
    for line in content.lines().take(PREVIEW_LINES) {
        println!("  {}", line);
    }
    if total > PREVIEW_LINES {
        println!(
            "{}",
            format!("  ... {} more lines", total - PREVIEW_LINES).dimmed()
        );
    }
    println!();
}

fn print_log_report(report: &LogReport) {
    print_log_preview(&report.content);
    if let Some(summary) = &report.summary {
        println!("{}\n{}\n", LOG_SUMMARY_HEADING.bold(), summary);
    }
    if let Some(failure) = &report.failure {
        print_failure(&failure.message, &failure.trace);
    }
}

/// Web widget command
pub mod serve {
    use super::*;

    /// Serve the chat widget until Ctrl-C
    pub async fn run_serve(config: Config, adapter: Arc<dyn CompletionAdapter>) -> Result<()> {
        tracing::info!("Starting web widget");
        crate::web::serve(&config, adapter).await
    }
}

// Chat command handler
pub mod chat {
    //! Interactive terminal chat.
    //!
    //! Runs a readline loop over one [`ChatSession`]. Regular input becomes a
    //! chat turn; `/upload <path>` summarizes a log outside the conversation.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::ingest::{check_log_file, ingest_log, read_log_file};
    use crate::prompts::{APP_TITLE, DISCLAIMER};
    use crate::session::ChatSession;
    use crate::turn::TurnHandler;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::{Path, PathBuf};

    /// Start interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `adapter` - The process-wide completion adapter
    /// * `log` - Optional log file summarized before the first prompt
    pub async fn run_chat(
        config: Config,
        adapter: Arc<dyn CompletionAdapter>,
        log: Option<PathBuf>,
    ) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let handler = TurnHandler::from_config(adapter, &config);
        let mut session = ChatSession::new(config.chat.system_prompt.clone());
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner();

        if let Some(path) = log {
            upload(&config, &handler, &path).await;
        }

        loop {
            match rl.readline("troubleshoot> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Upload(path)) => {
                            upload(&config, &handler, &path).await;
                            continue;
                        }
                        Ok(SpecialCommand::History) => {
                            for message in session.transcript().displayed() {
                                print_message(message);
                            }
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status(&session, &handler);
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().yellow());
                            continue;
                        }
                    }

                    if let Some(outcome) = handler.handle_turn(&mut session, &line).await {
                        if let Some(failure) = &outcome.failure {
                            print_failure(&failure.message, &failure.trace);
                        }
                        print_message(session.transcript().last());
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("\n{}", DISCLAIMER.yellow());
        println!("Goodbye!");
        Ok(())
    }

    async fn upload(config: &Config, handler: &TurnHandler, path: &Path) {
        let name = path.display().to_string();
        if let Err(e) = check_log_file(&name, &config.ingest.allowed_extensions) {
            eprintln!("{}\n", e.to_string().yellow());
            return;
        }

        let content = read_log_file(path, config.ingest.max_log_bytes).await;
        println!("{}", format!("Summarizing {}...", name).cyan());
        let report = ingest_log(handler.adapter().as_ref(), handler.model(), content).await;
        print_log_report(&report);
    }

    fn print_welcome_banner() {
        println!("\n{}\n", APP_TITLE.bold());
        println!("{}\n", DISCLAIMER.yellow());
        println!("Describe your network or server issue, or '/upload <path>' to analyze a log.");
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status(session: &ChatSession, handler: &TurnHandler) {
        println!("Session:  {}", session.id());
        println!("Started:  {}", session.created_at().to_rfc3339());
        println!("Model:    {}", handler.model());
        println!("API:      {}", handler.adapter().api_style());
        println!("Messages: {}\n", session.transcript().displayed().len());
    }
}

/// One-shot log summary
pub mod summarize {
    use super::*;
    use crate::ingest::{check_log_file, read_log_file, summarize_log};
    use std::path::Path;

    /// Summarize a log file and print the result to stdout
    ///
    /// # Errors
    ///
    /// Returns error for an unsupported file extension or a failed
    /// completion request
    pub async fn run_summarize(
        config: Config,
        adapter: Arc<dyn CompletionAdapter>,
        file: &Path,
    ) -> Result<()> {
        let name = file.display().to_string();
        check_log_file(&name, &config.ingest.allowed_extensions)?;

        tracing::info!("Summarizing log file {}", name);
        let content = read_log_file(file, config.ingest.max_log_bytes).await;
        let summary = summarize_log(adapter.as_ref(), &config.provider.model, &content).await?;

        println!("{}", summary);
        Ok(())
    }
}

/// Auth command
///
/// Stores the API key in the system keyring so later runs can resolve it
/// without the environment variable.
pub mod auth {
    use super::*;
    use crate::credentials::store_api_key;
    use rustyline::DefaultEditor;

    /// Prompt for an API key and store it
    pub async fn run_auth(config: Config) -> Result<()> {
        let credentials = &config.credentials;
        tracing::info!(
            "Storing API key in keyring entry {}/{}",
            credentials.keyring_service,
            credentials.keyring_user
        );

        let mut rl = DefaultEditor::new()?;
        let key = rl.readline("API key: ")?;
        store_api_key(credentials, &key)?;

        println!(
            "{}",
            format!(
                "API key stored in keyring ({}/{})",
                credentials.keyring_service, credentials.keyring_user
            )
            .green()
        );
        if !credentials.use_keyring {
            println!(
                "{}",
                "credentials.use_keyring is false; the stored key will not be used until it is enabled"
                    .yellow()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{chat_response, ScriptedAdapter};
    use std::io::Write;

    #[tokio::test]
    async fn test_summarize_rejects_unsupported_extension() {
        let adapter = Arc::new(ScriptedAdapter::new());
        let result = summarize::run_summarize(
            Config::default(),
            adapter.clone(),
            std::path::Path::new("capture.pcap"),
        )
        .await;
        assert!(result.is_err());
        assert!(adapter.calls().is_empty());
    }

    #[tokio::test]
    async fn test_summarize_sends_file_content() {
        let mut file = tempfile::Builder::new().suffix(".log").tempfile().unwrap();
        file.write_all(b"sshd: Connection closed by 10.0.0.5").unwrap();

        let adapter = Arc::new(ScriptedAdapter::new());
        adapter.push_response(chat_response("SSH peer closed the connection"));

        summarize::run_summarize(Config::default(), adapter.clone(), file.path())
            .await
            .unwrap();

        let calls = adapter.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].messages[1]
            .content
            .ends_with("sshd: Connection closed by 10.0.0.5"));
    }

    #[tokio::test]
    async fn test_summarize_propagates_failure() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"timeout").unwrap();

        let adapter = Arc::new(ScriptedAdapter::new());
        adapter.push_error("HTTP 500");

        let err = summarize::run_summarize(Config::default(), adapter, file.path())
            .await
            .unwrap_err();
        assert!(format!("{:?}", err).contains("HTTP 500"));
    }
}
