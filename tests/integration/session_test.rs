//! Session cancellation threaded through real in-flight calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use noesis::{
    DomainAnalysisPipeline, DomainPrompts, ItemRegistry, OperationKind, SessionController,
};
use noesis_llm::{ChatCompleter, ChatRequest, LlmError, LlmResult};

/// Completer that never answers: it parks until its token is cancelled.
struct BlockingChat;

#[async_trait]
impl ChatCompleter for BlockingChat {
    async fn complete(
        &self,
        _request: ChatRequest,
        cancel: &CancellationToken,
    ) -> LlmResult<String> {
        cancel.cancelled().await;
        Err(LlmError::Aborted)
    }
}

#[tokio::test]
async fn test_cancel_aborts_an_in_flight_call() {
    let mut session = SessionController::new();
    let token = session.begin(OperationKind::Generation);

    let handle = tokio::spawn(async move {
        BlockingChat
            .complete(ChatRequest::simple("system", "user"), &token)
            .await
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    session.cancel(OperationKind::Generation);

    let result = handle.await.unwrap();
    assert_eq!(result, Err(LlmError::Aborted));
    assert!(!session.is_active(OperationKind::Generation));
}

#[tokio::test]
async fn test_starting_a_new_operation_replaces_the_old_one() {
    let mut session = SessionController::new();
    let first = session.begin(OperationKind::Generation);

    let handle = tokio::spawn(async move {
        BlockingChat
            .complete(ChatRequest::simple("system", "user"), &first)
            .await
    });

    // Second run of the same kind preempts the first; other kinds are
    // untouched
    let conversation = session.begin(OperationKind::Conversation);
    let second = session.begin(OperationKind::Generation);

    assert_eq!(handle.await.unwrap(), Err(LlmError::Aborted));
    assert!(!second.is_cancelled());
    assert!(!conversation.is_cancelled());
}

#[tokio::test]
async fn test_mid_pipeline_cancellation_surfaces_as_a_stop() {
    let mut session = SessionController::new();
    let token = session.begin(OperationKind::Generation);

    let pipeline = DomainAnalysisPipeline::new(Arc::new(BlockingChat), 0.3, 4);
    let registry = ItemRegistry::builtin();
    let item = registry.get("1-2").unwrap();
    let prompts = DomainPrompts::default();

    let (result, _) = tokio::join!(
        pipeline.analyze("manuscript", item, &prompts, &token, &|_: &str| {}),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        }
    );

    let err = result.unwrap_err();
    assert!(err.is_aborted());
    assert_eq!(err.user_message(), "Stopped by user.");
}
