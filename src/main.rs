//! Troubleshoot - network and server troubleshooting assistant
//!
#![doc = "Main entry point for the Troubleshoot application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use troubleshoot::cli::{Cli, Commands};
use troubleshoot::commands;
use troubleshoot::config::Config;
use troubleshoot::credentials::resolve_api_key;
use troubleshoot::providers::select_adapter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Storing a key must work before any key exists
    if let Commands::Auth = cli.command {
        return commands::auth::run_auth(config).await;
    }

    let api_key = resolve_api_key(&config.credentials)?;
    let adapter = select_adapter(&config.provider, &api_key).await?;

    match cli.command {
        Commands::Serve { .. } => {
            commands::serve::run_serve(config, adapter).await?;
            Ok(())
        }
        Commands::Chat { log } => {
            if let Some(path) = &log {
                tracing::debug!("Summarizing {} before chat", path.display());
            }
            commands::chat::run_chat(config, adapter, log).await?;
            Ok(())
        }
        Commands::Summarize { file } => {
            commands::summarize::run_summarize(config, adapter, &file).await?;
            Ok(())
        }
        Commands::Auth => Ok(()),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so chat and summary output on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "troubleshoot=debug"
    } else {
        "troubleshoot=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
