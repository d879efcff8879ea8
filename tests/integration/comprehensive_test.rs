//! Three-round comprehensive analysis against a scripted completer.

use tokio_util::sync::CancellationToken;

use noesis::{AnalysisTuning, AppError, ComprehensiveAnalysisPipeline, ComprehensivePrompts};
use noesis_llm::LlmError;

use crate::support::{last_user_text, MockChat};

/// Templates whose rendered text starts with a round marker, so the script
/// (and the assertions) can tell the rounds apart.
fn marked_prompts() -> ComprehensivePrompts {
    ComprehensivePrompts {
        system: "scholar".to_string(),
        summary_template: "R0 {title}\n{manuscript}".to_string(),
        primary_template: "R1 {keyword}\nS={summary}\n{manuscript}".to_string(),
        secondary_template: "R2 {keyword}\nC={conceptJson}\n{manuscript}".to_string(),
    }
}

fn scripted() -> std::sync::Arc<MockChat> {
    MockChat::new(|request| {
        let text = last_user_text(request);
        if text.starts_with("R0") {
            Ok("THE-SUMMARY".to_string())
        } else if text.starts_with("R1 freedom") {
            Ok(r#"{"concepts": [{"name": "liberty"}, {"name": "autonomy"}]}"#.to_string())
        } else if text.starts_with("R1 nature") {
            Ok(r#"{"concepts": [{"name": "physis"}]}"#.to_string())
        } else if text.starts_with("R2") {
            Ok(r#"{"concepts": [{"name": "elaboration"}]}"#.to_string())
        } else {
            Err(LlmError::MalformedResponse {
                message: format!("unexpected prompt: {}", text),
            })
        }
    })
}

fn keywords() -> Vec<String> {
    vec!["freedom".to_string(), "nature".to_string()]
}

#[tokio::test]
async fn test_rounds_run_in_order_and_results_merge() {
    let mock = scripted();
    let pipeline = ComprehensiveAnalysisPipeline::new(mock.clone(), AnalysisTuning::default(), 2);

    let analysis = pipeline
        .analyze(
            "On Freedom",
            "manuscript text",
            &keywords(),
            &marked_prompts(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap();

    assert_eq!(analysis.summary, "THE-SUMMARY");

    // 1 summary + 2 primary + 3 secondary (one per primary concept)
    let calls = mock.calls();
    assert_eq!(calls.len(), 6);
    let markers: Vec<&str> = calls
        .iter()
        .map(|c| &last_user_text(c)[..2])
        .collect();
    assert_eq!(markers, vec!["R0", "R1", "R1", "R2", "R2", "R2"]);
    // Round 1 sees the Round 0 summary
    assert!(last_user_text(&calls[1]).contains("S=THE-SUMMARY"));

    let freedom = &analysis.results["freedom"];
    assert_eq!(freedom.primary.len(), 2);
    assert_eq!(freedom.primary[0].id, "freedom-c1");
    // One secondary call per primary concept, accumulated under the keyword
    assert_eq!(freedom.secondary.len(), 2);
    let parents: Vec<&str> = freedom
        .secondary
        .iter()
        .map(|c| c.parent.as_deref().unwrap())
        .collect();
    assert!(parents.contains(&"freedom-c1"));
    assert!(parents.contains(&"freedom-c2"));

    let nature = &analysis.results["nature"];
    assert_eq!(nature.primary.len(), 1);
    assert_eq!(nature.secondary.len(), 1);
}

#[tokio::test]
async fn test_summary_failure_degrades_instead_of_failing() {
    let mock = MockChat::new(|request| {
        let text = last_user_text(request);
        if text.starts_with("R0") {
            Err(LlmError::Network {
                message: "connection reset".to_string(),
            })
        } else if text.starts_with("R1") {
            Ok(r#"{"concepts": [{"name": "liberty"}]}"#.to_string())
        } else {
            Ok(r#"{"concepts": []}"#.to_string())
        }
    });
    let pipeline = ComprehensiveAnalysisPipeline::new(mock, AnalysisTuning::default(), 2);

    let analysis = pipeline
        .analyze(
            "On Freedom",
            "manuscript text",
            &["freedom".to_string()],
            &marked_prompts(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap();

    assert!(analysis.summary.contains("Document summary unavailable"));
    assert_eq!(analysis.results["freedom"].primary.len(), 1);
}

#[tokio::test]
async fn test_aborted_summary_is_not_degraded() {
    let mock = MockChat::new(|_| Err(LlmError::Aborted));
    let pipeline = ComprehensiveAnalysisPipeline::new(mock.clone(), AnalysisTuning::default(), 2);

    let err = pipeline
        .analyze(
            "On Freedom",
            "manuscript text",
            &keywords(),
            &marked_prompts(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap_err();

    assert!(err.is_aborted());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_secondary_failure_fails_the_whole_pipeline() {
    let mock = MockChat::new(|request| {
        let text = last_user_text(request);
        if text.starts_with("R2") {
            Err(LlmError::Transport {
                status: 429,
                message: "rate limited".to_string(),
            })
        } else if text.starts_with("R0") {
            Ok("summary".to_string())
        } else {
            Ok(r#"{"concepts": [{"name": "liberty"}]}"#.to_string())
        }
    });
    let pipeline = ComprehensiveAnalysisPipeline::new(mock, AnalysisTuning::default(), 2);

    let err = pipeline
        .analyze(
            "On Freedom",
            "manuscript text",
            &keywords(),
            &marked_prompts(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Round { round: 2, .. }));
    assert!(err.to_string().contains("liberty"));
}

#[tokio::test]
async fn test_empty_keyword_set_is_rejected_up_front() {
    let mock = scripted();
    let pipeline = ComprehensiveAnalysisPipeline::new(mock.clone(), AnalysisTuning::default(), 2);

    let err = pipeline
        .analyze(
            "On Freedom",
            "manuscript text",
            &[],
            &marked_prompts(),
            &CancellationToken::new(),
            &|_: &str| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(mock.call_count(), 0);
}
