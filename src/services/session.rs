//! Session Cancellation Control
//!
//! At most one generation-kind and one conversation-kind operation may be in
//! flight per session. Starting a new operation of a kind cancels and
//! replaces the previous token of that kind before any new work is issued —
//! an ownership transfer, not a queue.

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The two logical operation streams a session multiplexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Manuscript analysis pipelines
    Generation,
    /// Persona chat turns and observer runs
    Conversation,
}

/// Per-session owner of the in-flight operation tokens.
#[derive(Debug, Default)]
pub struct SessionController {
    generation: Option<CancellationToken>,
    conversation: Option<CancellationToken>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new operation of `kind`, cancelling any previous one.
    ///
    /// The returned token must be threaded into every network call of the
    /// operation.
    pub fn begin(&mut self, kind: OperationKind) -> CancellationToken {
        let slot = self.slot_mut(kind);
        if let Some(previous) = slot.take() {
            debug!(?kind, "session: cancelling previous operation");
            previous.cancel();
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        token
    }

    /// Cancel the in-flight operation of `kind`, if any.
    pub fn cancel(&mut self, kind: OperationKind) {
        if let Some(token) = self.slot_mut(kind).take() {
            debug!(?kind, "session: user cancelled operation");
            token.cancel();
        }
    }

    /// Cancel everything this session owns.
    pub fn cancel_all(&mut self) {
        self.cancel(OperationKind::Generation);
        self.cancel(OperationKind::Conversation);
    }

    /// Whether an operation of `kind` is currently active.
    pub fn is_active(&self, kind: OperationKind) -> bool {
        match self.slot(kind) {
            Some(token) => !token.is_cancelled(),
            None => false,
        }
    }

    fn slot(&self, kind: OperationKind) -> &Option<CancellationToken> {
        match kind {
            OperationKind::Generation => &self.generation,
            OperationKind::Conversation => &self.conversation,
        }
    }

    fn slot_mut(&mut self, kind: OperationKind) -> &mut Option<CancellationToken> {
        match kind {
            OperationKind::Generation => &mut self.generation,
            OperationKind::Conversation => &mut self.conversation,
        }
    }
}
