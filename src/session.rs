//! Chat session state
//!
//! A [`Transcript`] is the ordered, append-only list of role-tagged
//! messages replayed to the remote model. It always starts with the system
//! directive, which is never displayed. A [`ChatSession`] owns one
//! transcript plus the turn state; whoever serves the interactive
//! connection owns the session.

use crate::providers::{Message, Role};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Ordered, append-only conversation history
///
/// # Examples
///
/// ```
/// use troubleshoot::providers::Role;
/// use troubleshoot::session::Transcript;
///
/// let mut transcript = Transcript::new("You troubleshoot networks.");
/// transcript.append(Role::User, "ping times out");
/// assert_eq!(transcript.len(), 2);
/// assert_eq!(transcript.displayed().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create a transcript holding only the system directive
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Append a message; the only way a transcript changes
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Every message, system directive first, in chronological order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages shown to the user (everything after the system directive)
    pub fn displayed(&self) -> &[Message] {
        &self.messages[1..]
    }

    /// The system directive seeding this transcript
    pub fn system_message(&self) -> &Message {
        &self.messages[0]
    }

    /// Most recent message
    pub fn last(&self) -> &Message {
        // Never empty: the system directive is always present.
        &self.messages[self.messages.len() - 1]
    }

    /// Number of messages including the system directive
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; a transcript holds at least the system directive
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Turn state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// Waiting for user input
    #[default]
    Idle,
    /// One request outstanding
    InFlight,
}

/// One interactive chat session
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    transcript: Transcript,
    state: TurnState,
}

impl ChatSession {
    /// Start a session seeded with the system directive
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            transcript: Transcript::new(system_prompt),
            state: TurnState::Idle,
        };
        tracing::debug!("Created chat session {}", session.id);
        session
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session started
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Read access to the transcript
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current turn state
    pub fn state(&self) -> TurnState {
        self.state
    }

    pub(crate) fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub(crate) fn set_state(&mut self, state: TurnState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transcript_holds_only_system() {
        let transcript = Transcript::new("sys");
        assert_eq!(transcript.len(), 1);
        assert!(!transcript.is_empty());
        assert_eq!(transcript.system_message(), &Message::system("sys"));
        assert!(transcript.displayed().is_empty());
        assert_eq!(transcript.last().role, Role::System);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new("sys");
        transcript.append(Role::User, "one");
        transcript.append(Role::Assistant, "two");
        transcript.append(Role::User, "three");

        let contents: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["sys", "one", "two", "three"]);
        assert_eq!(transcript.last(), &Message::user("three"));
    }

    #[test]
    fn test_displayed_skips_system_message() {
        let mut transcript = Transcript::new("hidden directive");
        transcript.append(Role::User, "hello");
        transcript.append(Role::Assistant, "hi");

        let displayed = transcript.displayed();
        assert_eq!(displayed.len(), 2);
        assert!(displayed.iter().all(|m| m.role != Role::System));
        assert!(displayed.iter().all(|m| m.content != "hidden directive"));
    }

    #[test]
    fn test_transcript_serializes_messages() {
        let mut transcript = Transcript::new("sys");
        transcript.append(Role::User, "hi");
        let value = serde_json::to_value(&transcript).unwrap();
        assert_eq!(value["messages"][1]["role"], "user");
    }

    #[test]
    fn test_chat_session_starts_idle() {
        let session = ChatSession::new("sys");
        assert_eq!(session.state(), TurnState::Idle);
        assert_eq!(session.transcript().len(), 1);
        assert!(session.created_at() <= Utc::now());
    }

    #[test]
    fn test_chat_sessions_have_distinct_ids() {
        let a = ChatSession::new("sys");
        let b = ChatSession::new("sys");
        assert_ne!(a.id(), b.id());
    }
}
