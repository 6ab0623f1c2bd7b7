//! Test utilities for Troubleshoot
//!
//! Provides a scripted completion adapter that records every request and
//! replays queued results, plus helpers for building response bodies.

use crate::config::ApiStyle;
use crate::error::{Result, TroubleshootError};
use crate::providers::{
    ChatChoice, ChatChoiceMessage, ChatCompletionBody, CompletionAdapter, Message, RawResponse,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One request seen by [`ScriptedAdapter`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Messages sent, in order
    pub messages: Vec<Message>,
    /// Model identifier sent
    pub model: String,
}

enum Scripted {
    Response(RawResponse),
    Error(String),
}

/// Completion adapter that replays queued results
///
/// When the queue is empty, calls fail with a provider error.
#[derive(Default)]
pub struct ScriptedAdapter {
    queue: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedAdapter {
    /// Create an adapter with an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn push_response(&self, response: RawResponse) {
        self.queue
            .lock()
            .expect("scripted queue poisoned")
            .push_back(Scripted::Response(response));
    }

    /// Queue an untyped JSON response
    pub fn push_untyped(&self, value: serde_json::Value) {
        self.push_response(RawResponse::Untyped(value));
    }

    /// Queue a provider failure
    pub fn push_error(&self, message: &str) {
        self.queue
            .lock()
            .expect("scripted queue poisoned")
            .push_back(Scripted::Error(message.to_string()));
    }

    /// Requests seen so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("scripted calls poisoned").clone()
    }
}

#[async_trait]
impl CompletionAdapter for ScriptedAdapter {
    async fn complete(&self, messages: &[Message], model: &str) -> Result<RawResponse> {
        self.calls
            .lock()
            .expect("scripted calls poisoned")
            .push(RecordedCall {
                messages: messages.to_vec(),
                model: model.to_string(),
            });

        let next = self.queue.lock().expect("scripted queue poisoned").pop_front();
        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Error(message)) => Err(TroubleshootError::Provider(message).into()),
            None => Err(TroubleshootError::Provider("no scripted response".to_string()).into()),
        }
    }

    fn api_style(&self) -> ApiStyle {
        ApiStyle::Chat
    }
}

/// Typed chat completion body with one choice
pub fn chat_response(content: &str) -> RawResponse {
    RawResponse::Chat(ChatCompletionBody {
        choices: vec![ChatChoice {
            message: ChatChoiceMessage {
                role: Some("assistant".to_string()),
                content: Some(content.to_string()),
            },
        }],
        usage: None,
    })
}
