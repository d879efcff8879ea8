//! Gateway Wire Types and Errors
//!
//! Request/response envelope for the chat-completion endpoint and the error
//! taxonomy the orchestration layer distinguishes. The `Aborted` kind is
//! load-bearing: callers special-case it so a user-initiated stop is never
//! rendered as a failure.

use serde::{Deserialize, Serialize};

use noesis_core::{ChatMessage, ChatRole};

/// Wire-level message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    System,
    User,
    Assistant,
}

/// One message of the request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::Assistant,
            content: content.into(),
        }
    }
}

/// Conversation messages map onto user/assistant wire roles.
impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        match message.role {
            ChatRole::User => WireMessage::user(message.content.clone()),
            ChatRole::Model => WireMessage::assistant(message.content.clone()),
        }
    }
}

/// Per-request sampling and format options.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling weight; omitted from the envelope when None.
    pub top_p: Option<f32>,
    /// Response token cap; omitted from the envelope when None.
    pub max_tokens: Option<u32>,
    /// Request a JSON object response and strip code fences from the payload.
    pub json_mode: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: None,
            max_tokens: None,
            json_mode: false,
        }
    }
}

/// One chat-completion request: system prompt, message list, options.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub messages: Vec<WireMessage>,
    pub options: RequestOptions,
}

impl ChatRequest {
    /// Request with a system prompt and a single user message.
    pub fn simple(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            messages: vec![WireMessage::user(user)],
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Error kinds a chat-completion call can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Connection-level failure before any HTTP status was received.
    Network { message: String },
    /// Non-2xx HTTP response, message extracted best-effort from the body.
    Transport { status: u16, message: String },
    /// 2xx response whose content is missing or not the expected JSON.
    MalformedResponse { message: String },
    /// The cancellation signal fired before the call settled.
    Aborted,
}

impl LlmError {
    /// Whether this error is a deliberate user-initiated stop.
    pub fn is_aborted(&self) -> bool {
        matches!(self, LlmError::Aborted)
    }
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::Network { message } => write!(f, "Network error: {}", message),
            LlmError::Transport { status, message } => {
                write!(f, "Request failed ({}): {}", status, message)
            }
            LlmError::MalformedResponse { message } => {
                write!(f, "Malformed response: {}", message)
            }
            LlmError::Aborted => write!(f, "Operation aborted"),
        }
    }
}

impl std::error::Error for LlmError {}

/// Result type for gateway operations
pub type LlmResult<T> = Result<T, LlmError>;
