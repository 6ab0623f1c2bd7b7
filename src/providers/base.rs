//! Base adapter trait and common types for Troubleshoot
//!
//! This module defines the [`CompletionAdapter`] trait both calling
//! conventions implement, the role-tagged [`Message`] replayed to the
//! remote model, and the [`RawResponse`] shapes an adapter call returns.

use crate::config::ApiStyle;
use crate::error::{Result, TroubleshootError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Role of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed instruction entry defining assistant behavior
    System,
    /// Text typed or uploaded by the user
    User,
    /// Reply produced by the remote model (or the fixed error reply)
    Assistant,
}

impl Role {
    /// Lowercase wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message structure for conversation
///
/// Serializes to the `{"role": ..., "content": ...}` pair the chat
/// completions endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a message with the given role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use troubleshoot::providers::{Message, Role};
    ///
    /// let msg = Message::system("You are a helpful assistant");
    /// assert_eq!(msg.role, Role::System);
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use troubleshoot::providers::{Message, Role};
    ///
    /// let msg = Message::user("server returns 502");
    /// assert_eq!(msg.role, Role::User);
    /// assert_eq!(msg.content, "server returns 502");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Token usage reported by the completion service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    #[serde(default)]
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    #[serde(default)]
    pub total_tokens: usize,
}

/// Chat completions response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionBody {
    /// Generated choices, best first
    pub choices: Vec<ChatChoice>,
    /// Token usage, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Choice in a chat completions response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    /// Generated message
    pub message: ChatChoiceMessage,
}

/// Message inside a chat completions choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    /// Role reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Generated text; absent for non-text replies
    #[serde(default)]
    pub content: Option<String>,
}

/// Legacy text completions response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCompletionBody {
    /// Generated choices, best first
    pub choices: Vec<TextChoice>,
    /// Token usage, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Choice in a legacy text completions response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChoice {
    /// Generated text
    pub text: String,
}

/// Un-normalized result of one adapter call
///
/// Typed variants hold bodies that matched the convention's documented
/// shape; anything else is kept as untyped JSON (non-JSON bodies become a
/// JSON string) so the normalizer can still show something.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawResponse {
    /// Body matching the chat completions shape
    Chat(ChatCompletionBody),
    /// Body matching the legacy text completions shape
    Text(TextCompletionBody),
    /// Body that matched neither typed shape
    Untyped(serde_json::Value),
}

impl RawResponse {
    /// Token usage carried by a typed body
    pub fn usage(&self) -> Option<TokenUsage> {
        match self {
            Self::Chat(body) => body.usage,
            Self::Text(body) => body.usage,
            Self::Untyped(_) => None,
        }
    }
}

impl std::fmt::Display for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

/// Adapter trait for the remote completion service
///
/// Exactly one implementation is active per process. Both accept the same
/// ordered role/content sequence and model identifier and perform a single
/// request with no retry.
///
/// # Examples
///
/// ```no_run
/// use troubleshoot::config::ApiStyle;
/// use troubleshoot::error::Result;
/// use troubleshoot::providers::{CompletionAdapter, Message, RawResponse};
/// use async_trait::async_trait;
///
/// struct EchoAdapter;
///
/// #[async_trait]
/// impl CompletionAdapter for EchoAdapter {
///     async fn complete(&self, messages: &[Message], _model: &str) -> Result<RawResponse> {
///         let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         Ok(RawResponse::Untyped(serde_json::Value::String(last)))
///     }
///
///     fn api_style(&self) -> ApiStyle {
///         ApiStyle::Chat
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionAdapter: Send + Sync {
    /// Send the ordered messages to the service and return its raw response
    ///
    /// # Errors
    ///
    /// Returns a provider error for any transport failure or non-success
    /// status; errors are not classified further.
    async fn complete(&self, messages: &[Message], model: &str) -> Result<RawResponse>;

    /// Calling convention this adapter speaks
    fn api_style(&self) -> ApiStyle;
}

/// Build the HTTP client shared by both adapters
///
/// No request timeout is configured; calls wait for the service.
pub(crate) fn build_http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("troubleshoot/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            TroubleshootError::Provider(format!("Failed to create HTTP client: {}", e)).into()
        })
}

/// Join an API base URL and an endpoint path
pub(crate) fn endpoint_url(api_base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        api_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// POST a JSON request and return the response body as JSON
///
/// Non-JSON success bodies come back as a JSON string.
pub(crate) async fn post_completion<T: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    api_key: &str,
    request: &T,
) -> Result<serde_json::Value> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Completion request failed: {}", e);
            TroubleshootError::Provider(format!("Completion request failed: {}", e))
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!("Completion service returned error {}: {}", status, error_text);
        return Err(TroubleshootError::Provider(format!(
            "Completion service returned error {}: {}",
            status, error_text
        ))
        .into());
    }

    let body = response.text().await.map_err(|e| {
        tracing::error!("Failed to read completion response body: {}", e);
        TroubleshootError::Provider(format!("Failed to read completion response: {}", e))
    })?;

    Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
}
