//! Legacy chat adapter
//!
//! Speaks the older client convention against the same
//! `POST {api_base}/chat/completions` endpoint with the same role/content
//! messages. The reply is kept as untyped JSON and read by key lookup, so a
//! service that answers with the text-completion shape still normalizes.

use crate::config::ApiStyle;
use crate::error::Result;
use crate::providers::base::{build_http_client, endpoint_url, post_completion};
use crate::providers::{CompletionAdapter, Message, RawResponse};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Request structure for the legacy convention
#[derive(Debug, Serialize)]
struct LegacyChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

/// Adapter for the legacy client convention
pub struct LegacyCompletionsAdapter {
    client: Client,
    url: String,
    api_key: String,
}

impl LegacyCompletionsAdapter {
    /// Create a new legacy adapter
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(api_base: &str, api_key: impl Into<String>) -> Result<Self> {
        let client = build_http_client()?;
        let url = endpoint_url(api_base, "chat/completions");

        tracing::info!("Initialized legacy completions adapter: url={}", url);

        Ok(Self {
            client,
            url,
            api_key: api_key.into(),
        })
    }

    /// Endpoint requests are sent to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionAdapter for LegacyCompletionsAdapter {
    async fn complete(&self, messages: &[Message], model: &str) -> Result<RawResponse> {
        let request = LegacyChatRequest { model, messages };

        tracing::debug!(
            "Sending legacy completion request: model={}, {} messages",
            model,
            messages.len()
        );

        let body = post_completion(&self.client, &self.url, &self.api_key, &request).await?;
        Ok(RawResponse::Untyped(body))
    }

    fn api_style(&self) -> ApiStyle {
        ApiStyle::Legacy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_creation() {
        let adapter = LegacyCompletionsAdapter::new("http://localhost:9000/v1", "key").unwrap();
        assert_eq!(adapter.url(), "http://localhost:9000/v1/chat/completions");
        assert_eq!(adapter.api_style(), ApiStyle::Legacy);
    }

    #[test]
    fn test_request_serialization() {
        let messages = [Message::system("sys"), Message::user("dns fails")];
        let request = LegacyChatRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "dns fails");
        assert!(value.get("prompt").is_none());
    }
}
