//! Command-line interface definition for Troubleshoot
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the web widget, terminal chat, one-shot log
//! summaries and credential storage.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Troubleshoot - network and server troubleshooting assistant
///
/// Chat about connectivity issues, server errors and system configuration,
/// or upload a log for an AI-generated summary.
#[derive(Parser, Debug, Clone)]
#[command(name = "troubleshoot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "TROUBLESHOOT_CONFIG", default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the single-page chat widget over HTTP
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Start an interactive troubleshooting chat in the terminal
    Chat {
        /// Log file to summarize before the chat starts
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// Summarize a troubleshooting log and exit
    Summarize {
        /// Log file to analyze (.txt, .log, .csv)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Store the API key in the system keyring
    Auth,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve_command() {
        let cli = Cli::try_parse_from(["troubleshoot", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { bind: None }));
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_serve_with_bind() {
        let cli = Cli::try_parse_from(["troubleshoot", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Commands::Serve { bind } = cli.command {
            assert_eq!(bind, Some("0.0.0.0:8080".to_string()));
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_chat_with_log() {
        let cli = Cli::try_parse_from(["troubleshoot", "chat", "--log", "nginx.log"]).unwrap();
        if let Commands::Chat { log } = cli.command {
            assert_eq!(log, Some(PathBuf::from("nginx.log")));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_summarize_requires_file() {
        assert!(Cli::try_parse_from(["troubleshoot", "summarize"]).is_err());

        let cli = Cli::try_parse_from(["troubleshoot", "summarize", "-f", "syslog.txt"]).unwrap();
        assert!(matches!(cli.command, Commands::Summarize { .. }));
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "troubleshoot",
            "--config",
            "custom.yaml",
            "--verbose",
            "auth",
        ])
        .unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Auth));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["troubleshoot"]).is_err());
    }
}
