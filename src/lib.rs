//! Troubleshoot - network and server troubleshooting assistant library
//!
//! This library provides a conversational troubleshooting assistant backed
//! by a hosted completion API, including the adapter over its two calling
//! conventions, chat session state, log ingestion, and the web and terminal
//! front ends.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `providers`: Completion adapters (chat and legacy) and response normalization
//! - `session`: Append-only transcripts and chat sessions
//! - `turn`: Chat turn handling against the selected adapter
//! - `ingest`: Log decoding and one-shot summaries
//! - `web`: Single-page widget server and JSON API
//! - `commands`: CLI command handlers
//! - `credentials`: API key resolution and storage
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use troubleshoot::cli::{Cli, Commands};
//! use troubleshoot::{providers, ChatSession, Config, TurnHandler};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = Cli { config: None, verbose: false, command: Commands::Auth };
//!     let config = Config::load("config/config.yaml", &cli)?;
//!     let adapter = providers::select_adapter(&config.provider, "sk-...").await?;
//!
//!     let handler = TurnHandler::from_config(adapter, &config);
//!     let mut session = ChatSession::new(config.chat.system_prompt.clone());
//!     if let Some(outcome) = handler.handle_turn(&mut session, "nginx returns 502").await {
//!         println!("{}", outcome.reply);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod turn;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TroubleshootError};
pub use providers::{CompletionAdapter, Message, Role};
pub use session::{ChatSession, Transcript};
pub use turn::{TurnHandler, TurnOutcome};

#[cfg(test)]
pub mod test_utils;
