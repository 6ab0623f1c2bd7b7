//! Provider module for Troubleshoot
//!
//! This module contains the completion adapter abstraction, its two
//! implementations (current and legacy client conventions), the
//! response normalizer, and the startup-time selection between adapters.

pub mod base;
pub mod chat_completions;
pub mod legacy;
pub mod normalize;

pub use base::{
    ChatChoice, ChatChoiceMessage, ChatCompletionBody, CompletionAdapter, Message, RawResponse,
    Role, TextChoice, TextCompletionBody, TokenUsage,
};
pub use chat_completions::ChatCompletionsAdapter;
pub use legacy::LegacyCompletionsAdapter;
pub use normalize::extract_text;

use crate::config::{ApiStyle, ProviderConfig};
use crate::error::{Result, TroubleshootError};
use reqwest::StatusCode;
use std::sync::Arc;

/// Create an adapter for an already-resolved calling convention
///
/// # Errors
///
/// Returns error if `style` is [`ApiStyle::Auto`] or HTTP client
/// initialization fails
///
/// # Examples
///
/// ```
/// use troubleshoot::config::{ApiStyle, ProviderConfig};
/// use troubleshoot::providers::create_adapter;
///
/// let adapter = create_adapter(ApiStyle::Legacy, &ProviderConfig::default(), "sk-test").unwrap();
/// assert_eq!(adapter.api_style(), ApiStyle::Legacy);
/// assert!(create_adapter(ApiStyle::Auto, &ProviderConfig::default(), "sk-test").is_err());
/// ```
pub fn create_adapter(
    style: ApiStyle,
    config: &ProviderConfig,
    api_key: &str,
) -> Result<Arc<dyn CompletionAdapter>> {
    match style {
        ApiStyle::Chat => Ok(Arc::new(ChatCompletionsAdapter::new(
            &config.api_base,
            api_key,
        )?)),
        ApiStyle::Legacy => Ok(Arc::new(LegacyCompletionsAdapter::new(
            &config.api_base,
            api_key,
        )?)),
        ApiStyle::Auto => Err(TroubleshootError::Config(
            "api_style must be resolved to chat or legacy before creating an adapter".to_string(),
        )
        .into()),
    }
}

/// Probe the service once to find which calling convention it offers
///
/// Sends `GET {api_base}/models`. A 404, 405 or 501 answer means only the
/// legacy convention is available; any other answer, including a transport
/// failure, selects chat completions.
///
/// # Errors
///
/// Returns error only if the probe's HTTP client cannot be created
pub async fn detect_api_style(api_base: &str, api_key: &str) -> Result<ApiStyle> {
    let client = base::build_http_client()?;
    let url = base::endpoint_url(api_base, "models");

    tracing::debug!("Probing completion service capabilities: {}", url);

    let style = match client.get(&url).bearer_auth(api_key).send().await {
        Ok(response) => match response.status() {
            StatusCode::NOT_FOUND
            | StatusCode::METHOD_NOT_ALLOWED
            | StatusCode::NOT_IMPLEMENTED => {
                tracing::debug!(
                    "Probe returned {}, chat completions unavailable",
                    response.status()
                );
                ApiStyle::Legacy
            }
            status => {
                tracing::debug!("Probe returned {}", status);
                ApiStyle::Chat
            }
        },
        Err(e) => {
            tracing::warn!(
                "Capability probe failed ({}), defaulting to chat completions",
                e
            );
            ApiStyle::Chat
        }
    };

    Ok(style)
}

/// Select the process-wide adapter
///
/// Runs once at startup. With `api_style: auto` the service is probed via
/// [`detect_api_style`]; the result is never re-checked afterwards.
///
/// # Errors
///
/// Returns error if adapter initialization fails
pub async fn select_adapter(
    config: &ProviderConfig,
    api_key: &str,
) -> Result<Arc<dyn CompletionAdapter>> {
    let style = match config.api_style {
        ApiStyle::Auto => detect_api_style(&config.api_base, api_key).await?,
        explicit => explicit,
    };

    tracing::info!(
        "Selected {} calling convention (configured: {})",
        style,
        config.api_style
    );

    create_adapter(style, config, api_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_adapter_chat() {
        let adapter = create_adapter(ApiStyle::Chat, &ProviderConfig::default(), "key").unwrap();
        assert_eq!(adapter.api_style(), ApiStyle::Chat);
    }

    #[test]
    fn test_create_adapter_legacy() {
        let adapter = create_adapter(ApiStyle::Legacy, &ProviderConfig::default(), "key").unwrap();
        assert_eq!(adapter.api_style(), ApiStyle::Legacy);
    }

    #[test]
    fn test_create_adapter_auto_rejected() {
        let result = create_adapter(ApiStyle::Auto, &ProviderConfig::default(), "key");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_select_adapter_explicit_style_skips_probe() {
        // Unroutable base: an explicit style must not touch the network.
        let config = ProviderConfig {
            api_base: "http://127.0.0.1:9/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_style: ApiStyle::Legacy,
        };
        let adapter = select_adapter(&config, "key").await.unwrap();
        assert_eq!(adapter.api_style(), ApiStyle::Legacy);
    }

    #[tokio::test]
    async fn test_detect_api_style_unreachable_defaults_to_chat() {
        let style = detect_api_style("http://127.0.0.1:9/v1", "key").await.unwrap();
        assert_eq!(style, ApiStyle::Chat);
    }
}
