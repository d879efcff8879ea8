//! Shared test support: a scripted, recording chat completer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use noesis_llm::{ChatCompleter, ChatRequest, LlmError, LlmResult};

type Script = Box<dyn Fn(&ChatRequest) -> LlmResult<String> + Send + Sync>;

/// In-memory completer that records every request and answers from a
/// script. Honors the cancellation token the way the real client does:
/// a cancelled token yields `Aborted` before the script runs.
pub struct MockChat {
    script: Script,
    calls: Mutex<Vec<ChatRequest>>,
}

impl MockChat {
    pub fn new(
        script: impl Fn(&ChatRequest) -> LlmResult<String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Completer that returns the same text for every request.
    pub fn always(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Every request recorded so far, in issue order.
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompleter for MockChat {
    async fn complete(
        &self,
        request: ChatRequest,
        cancel: &CancellationToken,
    ) -> LlmResult<String> {
        if cancel.is_cancelled() {
            return Err(LlmError::Aborted);
        }
        self.calls.lock().unwrap().push(request.clone());
        (self.script)(&request)
    }
}

/// Content of the last message of a recorded request.
pub fn last_user_text(request: &ChatRequest) -> &str {
    request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}
