//! API credential resolution
//!
//! The completion service credential is looked up once at startup: first
//! the configured environment variable, then (optionally) the OS keyring.

use crate::config::CredentialsConfig;
use crate::error::{Result, TroubleshootError};

/// Resolve the API credential
///
/// Empty values count as absent. A keyring that is unavailable or has no
/// entry is treated the same as a missing entry.
///
/// # Errors
///
/// Returns [`TroubleshootError::MissingCredentials`] when no source yields
/// a credential
pub fn resolve_api_key(config: &CredentialsConfig) -> Result<String> {
    if let Ok(value) = std::env::var(&config.env_var) {
        let value = value.trim();
        if !value.is_empty() {
            tracing::debug!("Using API key from environment variable {}", config.env_var);
            return Ok(value.to_string());
        }
    }

    if config.use_keyring {
        if let Some(value) = load_from_keyring(config) {
            tracing::debug!(
                "Using API key from keyring entry {}/{}",
                config.keyring_service,
                config.keyring_user
            );
            return Ok(value);
        }
    }

    let hint = if config.use_keyring {
        format!(
            "set {} or run `troubleshoot auth` to store a key in the keyring",
            config.env_var
        )
    } else {
        format!("set {}", config.env_var)
    };

    Err(TroubleshootError::MissingCredentials(format!("no API key found; {}", hint)).into())
}

fn load_from_keyring(config: &CredentialsConfig) -> Option<String> {
    let entry = match keyring::Entry::new(&config.keyring_service, &config.keyring_user) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!("Keyring not available: {}", e);
            return None;
        }
    };

    match entry.get_password() {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Ok(_) | Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            tracing::warn!("Failed to read API key from keyring: {}", e);
            None
        }
    }
}

/// Store an API key in the configured keyring entry
///
/// # Errors
///
/// Returns error if the key is blank or the keyring rejects the write
pub fn store_api_key(config: &CredentialsConfig, api_key: &str) -> Result<()> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(TroubleshootError::MissingCredentials("API key is empty".to_string()).into());
    }

    let entry = keyring::Entry::new(&config.keyring_service, &config.keyring_user)?;
    entry.set_password(api_key)?;

    tracing::info!(
        "Stored API key in keyring entry {}/{}",
        config.keyring_service,
        config.keyring_user
    );
    Ok(())
}
