//! Session identity, lifecycle events, and chat messages.
//!
//! These are the shapes the external call runtime and chat backend hand to
//! MedLens. MedLens never produces them itself outside of tests and the demo.

use serde::{Deserialize, Serialize};

/// Unique identifier for one agent session (one joined call).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A call participant as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: String,
}

impl Participant {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Events delivered by the runtime's event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The realtime model provider accepted the connection.
    ProviderConnected { model: String },
    /// The realtime model provider reported an error.
    ProviderError { error: String },
    /// Someone joined the call.
    ParticipantJoined { participant: Participant },
    /// Someone left the call.
    ParticipantLeft { participant: Participant },
}

/// A message read from the call's chat channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Backend-assigned message id, used for de-duplication.
    pub id: String,
    /// Message body. Attachments-only messages have none.
    pub text: Option<String>,
    /// Author, when the backend reports one.
    pub user_id: Option<String>,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, text: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            user_id: Some(user_id.into()),
        }
    }
}
