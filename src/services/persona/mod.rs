//! Persona Chat
//!
//! Two configured conversational identities (prompt templates + sampling
//! parameters + history) and the two-call thinking/reply protocol that
//! drives each turn, including the unattended observer mode.

pub mod chat;

use noesis_core::ChatMessage;

use crate::services::prompt::{PERSONA_REPLY_TEMPLATE, PERSONA_THINKING_TEMPLATE};

pub use chat::{ObserverOutcome, ObserverUtterance, PersonaChat, TurnOutcome};

/// The two persona slots of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    A,
    B,
}

impl Speaker {
    /// The opposite slot.
    pub fn other(&self) -> Speaker {
        match self {
            Speaker::A => Speaker::B,
            Speaker::B => Speaker::A,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Speaker::A => 0,
            Speaker::B => 1,
        }
    }
}

/// Prompt payload of one persona.
///
/// Produced by a separate templating step; both templates are rendered per
/// turn with the incoming message (and, for the reply, the thinking text).
#[derive(Debug, Clone)]
pub struct PersonaPrompts {
    /// Placeholder: {message}.
    pub thinking_template: String,
    /// Placeholders: {message}, {thinking}.
    pub reply_template: String,
}

impl Default for PersonaPrompts {
    fn default() -> Self {
        Self {
            thinking_template: PERSONA_THINKING_TEMPLATE.to_string(),
            reply_template: PERSONA_REPLY_TEMPLATE.to_string(),
        }
    }
}

/// One persona: identity, templates, and its independent history.
#[derive(Debug, Clone)]
pub struct PersonaSlot {
    /// Display name
    pub name: String,
    /// Hierarchical code used for parameter resolution
    pub code: String,
    pub prompts: PersonaPrompts,
    pub(crate) history: Vec<ChatMessage>,
}

impl PersonaSlot {
    pub fn new(name: impl Into<String>, code: impl Into<String>, prompts: PersonaPrompts) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            prompts,
            history: Vec::new(),
        }
    }

    /// The append-only conversation history.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Pre-seed history (e.g. when restoring a session).
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }
}
