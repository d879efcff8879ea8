//! Chat Message Types
//!
//! Conversation histories are append-only ordered sequences; truncation for
//! request context always works on a window at the tail, never by deleting
//! from the stored history.

use serde::{Deserialize, Serialize};

/// Role of a chat message within a persona conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One message in a persona conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Thinking text attached to model replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            thinking: None,
        }
    }

    /// Create a model message.
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
            thinking: None,
        }
    }

    /// Create a model message carrying its thinking text.
    pub fn model_with_thinking(content: impl Into<String>, thinking: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
            thinking: Some(thinking.into()),
        }
    }
}

/// Window of the last `max_turns` conversation turns.
///
/// A turn is one user message plus one model message, so the window holds at
/// most `max_turns * 2` messages.
pub fn truncate_to_turns(history: &[ChatMessage], max_turns: usize) -> &[ChatMessage] {
    last_messages(history, max_turns.saturating_mul(2))
}

/// Window of the last `count` messages.
pub fn last_messages(history: &[ChatMessage], count: usize) -> &[ChatMessage] {
    let start = history.len().saturating_sub(count);
    &history[start..]
}
