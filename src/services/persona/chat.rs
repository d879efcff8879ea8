//! Thinking/Reply Turn Protocol
//!
//! Each turn is two sequential completions sharing one cancellation token:
//! a deterministic thinking call over a short fixed context window, whose
//! output is injected as context into the reply call, which runs with the
//! persona's resolved sampling parameters over the truncated history.
//! History is committed only after both calls succeed, so an aborted or
//! failed turn leaves the conversation exactly as it was.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use noesis_core::{
    last_messages, render, truncate_to_turns, ChatMessage, PersonaParameterConfig,
};
use noesis_llm::{ChatCompleter, ChatRequest, RequestOptions, WireMessage};

use crate::services::persona::{PersonaSlot, Speaker};
use crate::services::prompt::PERSONA_SYSTEM_PROMPT;
use crate::utils::error::{AppError, AppResult};

/// Messages of history included in the thinking call.
///
/// A fixed constant, deliberately independent of `max_history_turns`.
pub const THINKING_CONTEXT_MESSAGES: usize = 4;

/// Thinking-call sampling: weighted hard toward determinism.
const THINKING_TEMPERATURE: f32 = 0.2;
const THINKING_TOP_P: f32 = 0.95;

/// Default half-turn cap for observer mode (5 per persona).
pub const DEFAULT_OBSERVER_HALF_TURNS: usize = 10;

/// Result of one committed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub thinking: String,
}

/// One utterance of an observer-mode transcript.
#[derive(Debug, Clone)]
pub struct ObserverUtterance {
    pub speaker: String,
    pub content: String,
}

/// Result of an observer-mode run.
#[derive(Debug, Clone)]
pub struct ObserverOutcome {
    pub transcript: Vec<ObserverUtterance>,
    /// True when the run ended on user cancellation rather than the cap.
    pub stopped: bool,
}

/// Two-persona chat session.
pub struct PersonaChat {
    client: Arc<dyn ChatCompleter>,
    params: PersonaParameterConfig,
    personas: [PersonaSlot; 2],
}

impl PersonaChat {
    pub fn new(
        client: Arc<dyn ChatCompleter>,
        params: PersonaParameterConfig,
        persona_a: PersonaSlot,
        persona_b: PersonaSlot,
    ) -> Self {
        Self {
            client,
            params,
            personas: [persona_a, persona_b],
        }
    }

    /// The persona in a slot.
    pub fn persona(&self, speaker: Speaker) -> &PersonaSlot {
        &self.personas[speaker.index()]
    }

    /// Run one turn for `speaker`: thinking call, then reply call.
    ///
    /// Both calls share `cancel`; aborting either aborts the turn and
    /// nothing is committed to history.
    pub async fn send_turn(
        &mut self,
        speaker: Speaker,
        user_message: &str,
        cancel: &CancellationToken,
    ) -> AppResult<TurnOutcome> {
        let slot = &self.personas[speaker.index()];
        let params = self.params.resolve(&slot.code).clone();
        let persona_name = slot.name.clone();

        debug!(
            persona = %persona_name,
            code = %slot.code,
            temperature = params.temperature,
            "persona: starting turn"
        );

        // Thinking call: short fixed window, deterministic sampling.
        let mut thinking_messages: Vec<WireMessage> =
            last_messages(&slot.history, THINKING_CONTEXT_MESSAGES)
                .iter()
                .map(WireMessage::from)
                .collect();
        thinking_messages.push(WireMessage::user(render(
            &slot.prompts.thinking_template,
            &[("message", user_message)],
        )));
        let thinking_request = ChatRequest {
            system: PERSONA_SYSTEM_PROMPT.to_string(),
            messages: thinking_messages,
            options: RequestOptions {
                temperature: THINKING_TEMPERATURE,
                top_p: Some(THINKING_TOP_P),
                ..Default::default()
            },
        };
        let thinking = self
            .client
            .complete(thinking_request, cancel)
            .await
            .map_err(|source| AppError::Chat {
                persona: persona_name.clone(),
                source,
            })?;

        // Reply call: truncated history + raw message + injected thinking.
        let truncated = truncate_to_turns(&slot.history, params.max_history_turns);
        let mut reply_messages: Vec<WireMessage> =
            truncated.iter().map(WireMessage::from).collect();
        reply_messages.push(WireMessage::user(user_message));
        reply_messages.push(WireMessage::assistant(thinking.clone()));
        reply_messages.push(WireMessage::user(render(
            &slot.prompts.reply_template,
            &[("message", user_message), ("thinking", &thinking)],
        )));
        let reply_request = ChatRequest {
            system: PERSONA_SYSTEM_PROMPT.to_string(),
            messages: reply_messages,
            options: RequestOptions {
                temperature: params.temperature,
                top_p: Some(params.top_p),
                ..Default::default()
            },
        };
        let raw_reply = self
            .client
            .complete(reply_request, cancel)
            .await
            .map_err(|source| AppError::Chat {
                persona: persona_name.clone(),
                source,
            })?;
        let reply = strip_thinking_tags(&raw_reply);

        // Commit point: both calls succeeded.
        let slot = &mut self.personas[speaker.index()];
        slot.history.push(ChatMessage::user(user_message));
        slot.history
            .push(ChatMessage::model_with_thinking(reply.clone(), thinking.clone()));

        info!(persona = %persona_name, reply_len = reply.len(), "persona: turn committed");
        Ok(TurnOutcome { reply, thinking })
    }

    /// Let the two personas converse unattended, starting from `topic`.
    ///
    /// Speakers alternate for at most `max_half_turns` half-turns; each
    /// reply becomes the next speaker's incoming user message, which also
    /// records it in the listener's history when it next speaks.
    /// Cancellation ends the run early as a stop, not a failure.
    pub async fn run_observer(
        &mut self,
        topic: &str,
        max_half_turns: usize,
        cancel: &CancellationToken,
    ) -> AppResult<ObserverOutcome> {
        let mut transcript = Vec::new();
        let mut speaker = Speaker::A;
        let mut incoming = topic.to_string();

        for _ in 0..max_half_turns {
            if cancel.is_cancelled() {
                return Ok(ObserverOutcome {
                    transcript,
                    stopped: true,
                });
            }
            match self.send_turn(speaker, &incoming, cancel).await {
                Ok(turn) => {
                    transcript.push(ObserverUtterance {
                        speaker: self.persona(speaker).name.clone(),
                        content: turn.reply.clone(),
                    });
                    incoming = turn.reply;
                    speaker = speaker.other();
                }
                Err(e) if e.is_aborted() => {
                    return Ok(ObserverOutcome {
                        transcript,
                        stopped: true,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ObserverOutcome {
            transcript,
            stopped: false,
        })
    }
}

/// Remove `<thinking>...</thinking>` spans a model echoes into its reply.
fn strip_thinking_tags(text: &str) -> String {
    const OPEN: &str = "<thinking>";
    const CLOSE: &str = "</thinking>";
    let mut result = text.to_string();
    while let Some(start) = result.find(OPEN) {
        match result[start..].find(CLOSE) {
            Some(offset) => {
                result.replace_range(start..start + offset + CLOSE.len(), "");
            }
            None => {
                // Unclosed tag: drop from the tag to the end
                result.truncate(start);
                break;
            }
        }
    }
    result.trim().to_string()
}
