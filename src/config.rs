//! Configuration management for Troubleshoot
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, TroubleshootError};
use crate::prompts::{CHAT_ERROR_REPLY, TROUBLESHOOTING_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Main configuration structure for Troubleshoot
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Completion provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Where the API credential is looked up
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Chat session settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Log ingestion settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Web widget server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Calling convention used against the completion service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiStyle {
    /// Probe the service once at startup and pick a convention
    #[default]
    Auto,
    /// `/chat/completions` with role/content messages
    Chat,
    /// `/chat/completions` with the reply read as untyped JSON
    Legacy,
}

impl ApiStyle {
    /// Parse an API style name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use troubleshoot::config::ApiStyle;
    ///
    /// assert_eq!(ApiStyle::parse_str("LEGACY").unwrap(), ApiStyle::Legacy);
    /// assert!(ApiStyle::parse_str("v3").is_err());
    /// ```
    pub fn parse_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "chat" => Ok(Self::Chat),
            "legacy" => Ok(Self::Legacy),
            other => Err(TroubleshootError::Config(format!(
                "Invalid api_style: {}. Must be one of: auto, chat, legacy",
                other
            ))
            .into()),
        }
    }
}

impl std::fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Chat => write!(f, "chat"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the completion API (endpoints are appended to it)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Calling convention selection
    #[serde(default)]
    pub api_style: ApiStyle,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_style: ApiStyle::default(),
        }
    }
}

/// Credential lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Environment variable holding the API key
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// Fall back to the OS keyring when the variable is unset
    #[serde(default = "default_use_keyring")]
    pub use_keyring: bool,

    /// Keyring service name
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Keyring user name
    #[serde(default = "default_keyring_user")]
    pub keyring_user: String,
}

fn default_env_var() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_use_keyring() -> bool {
    true
}

fn default_keyring_service() -> String {
    "troubleshoot".to_string()
}

fn default_keyring_user() -> String {
    "openai".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_var: default_env_var(),
            use_keyring: default_use_keyring(),
            keyring_service: default_keyring_service(),
            keyring_user: default_keyring_user(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// System directive seeding every transcript
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Assistant reply recorded when a turn's remote call fails
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
}

fn default_system_prompt() -> String {
    TROUBLESHOOTING_SYSTEM_PROMPT.to_string()
}

fn default_error_reply() -> String {
    CHAT_ERROR_REPLY.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            error_reply: default_error_reply(),
        }
    }
}

/// Log ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Largest log accepted (bytes); larger inputs read as the placeholder
    #[serde(default = "default_max_log_bytes")]
    pub max_log_bytes: usize,

    /// File extensions accepted by the upload widget
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_max_log_bytes() -> usize {
    10_485_760
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["txt".to_string(), "log".to_string(), "csv".to_string()]
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_log_bytes: default_max_log_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// Web widget server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Seconds a web session may sit unused before it is evicted
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

fn default_session_idle_secs() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TroubleshootError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| TroubleshootError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("TROUBLESHOOT_API_BASE") {
            tracing::debug!(api_base = %api_base, "Env override: TROUBLESHOOT_API_BASE");
            self.provider.api_base = api_base;
        }

        if let Ok(model) = std::env::var("TROUBLESHOOT_MODEL") {
            tracing::debug!(model = %model, "Env override: TROUBLESHOOT_MODEL");
            self.provider.model = model;
        }

        if let Ok(style) = std::env::var("TROUBLESHOOT_API_STYLE") {
            match ApiStyle::parse_str(&style) {
                Ok(parsed) => self.provider.api_style = parsed,
                Err(_) => tracing::warn!("Invalid TROUBLESHOOT_API_STYLE: {}", style),
            }
        }

        if let Ok(bind) = std::env::var("TROUBLESHOOT_BIND") {
            tracing::debug!(bind = %bind, "Env override: TROUBLESHOOT_BIND");
            self.server.bind = bind;
        }

        if let Ok(max_bytes) = std::env::var("TROUBLESHOOT_MAX_LOG_BYTES") {
            if let Ok(value) = max_bytes.parse() {
                self.ingest.max_log_bytes = value;
            } else {
                tracing::warn!("Invalid TROUBLESHOOT_MAX_LOG_BYTES: {}", max_bytes);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let crate::cli::Commands::Serve {
            bind: Some(bind), ..
        } = &cli.command
        {
            self.server.bind = bind.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let api_base = url::Url::parse(&self.provider.api_base).map_err(|e| {
            TroubleshootError::Config(format!(
                "Invalid provider.api_base '{}': {}",
                self.provider.api_base, e
            ))
        })?;
        if api_base.scheme() != "http" && api_base.scheme() != "https" {
            return Err(TroubleshootError::Config(format!(
                "provider.api_base must use http or https, got: {}",
                api_base.scheme()
            ))
            .into());
        }

        if self.provider.model.trim().is_empty() {
            return Err(
                TroubleshootError::Config("provider.model cannot be empty".to_string()).into(),
            );
        }

        if self.credentials.env_var.trim().is_empty() {
            return Err(TroubleshootError::Config(
                "credentials.env_var cannot be empty".to_string(),
            )
            .into());
        }

        if self.chat.system_prompt.trim().is_empty() {
            return Err(
                TroubleshootError::Config("chat.system_prompt cannot be empty".to_string()).into(),
            );
        }

        if self.ingest.max_log_bytes == 0 {
            return Err(TroubleshootError::Config(
                "ingest.max_log_bytes must be greater than 0".to_string(),
            )
            .into());
        }

        if self.ingest.allowed_extensions.is_empty() {
            return Err(TroubleshootError::Config(
                "ingest.allowed_extensions must list at least one extension".to_string(),
            )
            .into());
        }

        self.server.bind.parse::<SocketAddr>().map_err(|e| {
            TroubleshootError::Config(format!(
                "Invalid server.bind '{}': {}",
                self.server.bind, e
            ))
        })?;

        if self.server.session_idle_secs == 0 {
            return Err(TroubleshootError::Config(
                "server.session_idle_secs must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
