//! Structured domain analysis against a scripted completer.

use tokio_util::sync::CancellationToken;

use noesis::{AppError, DomainAnalysisPipeline, DomainPrompts, ItemRegistry};
use noesis_llm::LlmError;

use crate::support::{last_user_text, MockChat};

const MANUSCRIPT: &str = "The way that can be told is not the constant way.";

#[tokio::test]
async fn test_code_depth_bounds_the_fanout() {
    let mock = MockChat::always(r#"{"concepts": [{"name": "dao"}]}"#);
    let pipeline = DomainAnalysisPipeline::new(mock.clone(), 0.3, 2);
    let registry = ItemRegistry::builtin();
    let item = registry.get("1-2").unwrap();

    let analysis = pipeline
        .analyze(
            MANUSCRIPT,
            item,
            &DomainPrompts::default(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap();

    // Depth 2 means exactly the first two domains, nothing more
    assert_eq!(mock.call_count(), 2);
    let keys: Vec<&str> = analysis.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["fieldTheory", "ontology"]);
    // Concepts without ids get prefixed, 1-based ids
    assert_eq!(analysis["fieldTheory"][0].id, "fieldTheory-c1");
}

#[tokio::test]
async fn test_prompts_carry_item_context_per_domain() {
    let mock = MockChat::always(r#"{"concepts": []}"#);
    let pipeline = DomainAnalysisPipeline::new(mock.clone(), 0.3, 4);
    let registry = ItemRegistry::builtin();
    let item = registry.get("1-2").unwrap();

    pipeline
        .analyze(
            MANUSCRIPT,
            item,
            &DomainPrompts::default(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap();

    let calls = mock.calls();
    let texts: Vec<String> = calls.iter().map(|c| last_user_text(c).to_string()).collect();
    assert!(texts.iter().all(|t| t.contains("Daoist naturalism")));
    assert!(texts.iter().all(|t| t.contains(MANUSCRIPT)));
    // Segment "1" of code "1-2" drives the first domain's movement label,
    // segment "2" the second's
    assert!(texts[0].contains("emanation and return"));
    assert!(texts[1].contains("dialectical mediation"));
    assert!(calls.iter().all(|c| c.options.json_mode));
}

#[tokio::test]
async fn test_one_failing_domain_fails_the_analysis() {
    let mock = MockChat::new(|request| {
        if last_user_text(request).contains("ontology") {
            Err(LlmError::Transport {
                status: 500,
                message: "upstream".to_string(),
            })
        } else {
            Ok(r#"{"concepts": []}"#.to_string())
        }
    });
    let pipeline = DomainAnalysisPipeline::new(mock, 0.3, 4);
    let registry = ItemRegistry::builtin();
    let item = registry.get("1-2").unwrap();

    let err = pipeline
        .analyze(
            MANUSCRIPT,
            item,
            &DomainPrompts::default(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Domain { .. }));
    assert!(err.to_string().contains("ontology"));
}

#[tokio::test]
async fn test_non_json_payload_is_a_malformed_response() {
    let mock = MockChat::always("I would rather answer in prose.");
    let pipeline = DomainAnalysisPipeline::new(mock, 0.3, 4);
    let registry = ItemRegistry::builtin();
    let item = registry.get("1-2").unwrap();

    let err = pipeline
        .analyze(
            MANUSCRIPT,
            item,
            &DomainPrompts::default(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Domain {
            source: LlmError::MalformedResponse { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_cancelled_token_aborts_before_any_call() {
    let mock = MockChat::always(r#"{"concepts": []}"#);
    let pipeline = DomainAnalysisPipeline::new(mock.clone(), 0.3, 4);
    let registry = ItemRegistry::builtin();
    let item = registry.get("1-2").unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = pipeline
        .analyze(MANUSCRIPT, item, &DomainPrompts::default(), &cancel, &|_: &str| {})
        .await
        .unwrap_err();

    assert!(err.is_aborted());
    assert_eq!(err.user_message(), "Stopped by user.");
    assert_eq!(mock.call_count(), 0);
}
