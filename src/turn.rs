//! Chat turn handling
//!
//! A turn appends the user's message, sends the whole transcript through
//! the process-wide adapter, and appends the assistant's reply. A failed
//! remote call still appends an assistant message (the fixed error reply)
//! so the conversation can continue.

use crate::config::Config;
use crate::error::FailureReport;
use crate::providers::{extract_text, CompletionAdapter, Role};
use crate::session::{ChatSession, TurnState};
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;

/// Result of one handled turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    /// Assistant message appended to the transcript
    pub reply: String,
    /// Set when the remote call failed and `reply` is the fixed error text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReport>,
}

impl TurnOutcome {
    /// Whether the remote call failed
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Runs chat turns against the selected adapter
#[derive(Clone)]
pub struct TurnHandler {
    adapter: Arc<dyn CompletionAdapter>,
    model: String,
    error_reply: String,
}

impl TurnHandler {
    /// Create a handler
    pub fn new(
        adapter: Arc<dyn CompletionAdapter>,
        model: impl Into<String>,
        error_reply: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            model: model.into(),
            error_reply: error_reply.into(),
        }
    }

    /// Create a handler using the configured model and error reply
    pub fn from_config(adapter: Arc<dyn CompletionAdapter>, config: &Config) -> Self {
        Self::new(adapter, &config.provider.model, &config.chat.error_reply)
    }

    /// The process-wide adapter
    pub fn adapter(&self) -> &Arc<dyn CompletionAdapter> {
        &self.adapter
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Handle one user message
    ///
    /// Blank input is ignored and returns `None` without touching the
    /// session. Otherwise the transcript grows by exactly two messages:
    /// the user's input and an assistant reply.
    pub async fn handle_turn(
        &self,
        session: &mut ChatSession,
        input: &str,
    ) -> Option<TurnOutcome> {
        if input.trim().is_empty() {
            return None;
        }

        session.transcript_mut().append(Role::User, input);
        session.set_state(TurnState::InFlight);

        tracing::debug!(
            "Session {} turn started: {} messages in transcript",
            session.id(),
            session.transcript().len()
        );

        let result = self
            .adapter
            .complete(session.transcript().messages(), &self.model)
            .await
            .context("Error calling the completion service for chat response");

        let outcome = match result {
            Ok(raw) => TurnOutcome {
                reply: extract_text(&raw),
                failure: None,
            },
            Err(err) => {
                tracing::error!("Chat turn failed for session {}: {:#}", session.id(), err);
                TurnOutcome {
                    reply: self.error_reply.clone(),
                    failure: Some(FailureReport::from_error(&err)),
                }
            }
        };

        session
            .transcript_mut()
            .append(Role::Assistant, outcome.reply.clone());
        session.set_state(TurnState::Idle);

        Some(outcome)
    }
}
