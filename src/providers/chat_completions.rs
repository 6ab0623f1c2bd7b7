//! Chat completions adapter
//!
//! Speaks the current API convention: `POST {api_base}/chat/completions`
//! with the role/content messages passed through unchanged.

use crate::config::ApiStyle;
use crate::error::Result;
use crate::providers::base::{build_http_client, endpoint_url, post_completion};
use crate::providers::{ChatCompletionBody, CompletionAdapter, Message, RawResponse};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Request structure for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

/// Adapter for the chat completions endpoint
///
/// # Examples
///
/// ```no_run
/// use troubleshoot::providers::{ChatCompletionsAdapter, CompletionAdapter, Message};
///
/// # async fn example() -> troubleshoot::error::Result<()> {
/// let adapter = ChatCompletionsAdapter::new("https://api.openai.com/v1", "sk-...")?;
/// let raw = adapter
///     .complete(&[Message::user("ping times out")], "gpt-3.5-turbo")
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ChatCompletionsAdapter {
    client: Client,
    url: String,
    api_key: String,
}

impl ChatCompletionsAdapter {
    /// Create a new chat completions adapter
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(api_base: &str, api_key: impl Into<String>) -> Result<Self> {
        let client = build_http_client()?;
        let url = endpoint_url(api_base, "chat/completions");

        tracing::info!("Initialized chat completions adapter: url={}", url);

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
impl CompletionAdapter for ChatCompletionsAdapter {
    async fn complete(&self, messages: &[Message], model: &str) -> Result<RawResponse> {
        let request = ChatCompletionRequest { model, messages };

        tracing::debug!(
            "Sending chat completion request: model={}, {} messages",
            model,
            messages.len()
        );

        let body = post_completion(&self.client, &self.url, &self.api_key, &request).await?;

        let raw = match serde_json::from_value::<ChatCompletionBody>(body.clone()) {
            Ok(typed) => RawResponse::Chat(typed),
            Err(e) => {
                tracing::debug!("Chat completion body did not match typed shape: {}", e);
                RawResponse::Untyped(body)
            }
        };

        if let Some(usage) = raw.usage() {
            tracing::debug!(
                "Chat completion usage: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(raw)
    }

    fn api_style(&self) -> ApiStyle {
        ApiStyle::Chat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adapter_creation() {
        let adapter = ChatCompletionsAdapter::new("https://api.openai.com/v1/", "key").unwrap();
        assert_eq!(adapter.url(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(adapter.api_style(), ApiStyle::Chat);
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![Message::system("be brief"), Message::user("dns fails")];
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "dns fails"}
                ]
            })
        );
    }
}
