//! Error types for Troubleshoot
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use serde::Serialize;
use thiserror::Error;

/// Main error type for Troubleshoot operations
///
/// Covers configuration loading, credential resolution, completion
/// provider calls, log ingestion and session lookups.
#[derive(Error, Debug)]
pub enum TroubleshootError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (transport failures, non-success status, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// No API credential could be resolved at startup
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Log file loading errors (unsupported extension, unreadable path)
    #[error("File load error: {0}")]
    FileLoad(String),

    /// A chat session id did not match any live session
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Troubleshoot operations
///
/// Uses `anyhow::Error` so callers can attach context and render the full
/// cause chain as a diagnostic trace.
pub type Result<T> = anyhow::Result<T>;

/// Render an error with its full cause chain
///
/// This is the diagnostic trace shown next to inline error messages.
///
/// # Examples
///
/// ```
/// use troubleshoot::error::{diagnostic_trace, TroubleshootError};
///
/// let err = anyhow::Error::from(TroubleshootError::Provider("boom".to_string()))
///     .context("Log summary request failed");
/// let trace = diagnostic_trace(&err);
/// assert!(trace.contains("Log summary request failed"));
/// assert!(trace.contains("boom"));
/// ```
pub fn diagnostic_trace(err: &anyhow::Error) -> String {
    format!("{:?}", err)
}

/// A caught failure as shown to the user: an inline message plus trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    /// Short message for an inline error banner
    pub message: String,
    /// Full cause chain
    pub trace: String,
}

impl FailureReport {
    /// Build a report from a caught error
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            message: err.to_string(),
            trace: diagnostic_trace(err),
        }
    }
}
