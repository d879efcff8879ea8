//! Comprehensive Keyword Analysis
//!
//! Three strictly sequential rounds over a keyword set:
//!
//! - Round 0: one summary call over the whole document. Failure degrades to
//!   a placeholder summary and the pipeline continues.
//! - Round 1: batched fan-out, one call per keyword, gated on Round 0.
//! - Round 2: batched fan-out, one call per primary concept produced by
//!   Round 1; its item set only exists once Round 1 has resolved.
//!
//! Rounds 1 and 2 are fail-fast: a single task failure rejects the whole
//! pipeline and no partial result map is surfaced.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use noesis_core::{ensure_concept_ids, render, Concept, ConceptsPayload};
use noesis_llm::{ChatCompleter, ChatRequest, LlmError, RequestOptions, WireMessage};

use crate::config::AnalysisTuning;
use crate::services::batch::process_in_batches;
use crate::services::prompt::{
    COMPREHENSIVE_SYSTEM_PROMPT, PRIMARY_USER_TEMPLATE, SECONDARY_USER_TEMPLATE,
    SUMMARY_USER_TEMPLATE,
};
use crate::utils::error::{AppError, AppResult};

/// Prompt text for the three rounds.
#[derive(Debug, Clone)]
pub struct ComprehensivePrompts {
    pub system: String,
    /// Placeholders: {title}, {manuscript}.
    pub summary_template: String,
    /// Placeholders: {keyword}, {summary}, {manuscript}.
    pub primary_template: String,
    /// Placeholders: {conceptJson}, {keyword}, {summary}, {manuscript}.
    pub secondary_template: String,
}

impl Default for ComprehensivePrompts {
    fn default() -> Self {
        Self {
            system: COMPREHENSIVE_SYSTEM_PROMPT.to_string(),
            summary_template: SUMMARY_USER_TEMPLATE.to_string(),
            primary_template: PRIMARY_USER_TEMPLATE.to_string(),
            secondary_template: SECONDARY_USER_TEMPLATE.to_string(),
        }
    }
}

/// Per-keyword slice of the comprehensive result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    #[serde(default)]
    pub primary: Vec<Concept>,
    #[serde(default)]
    pub secondary: Vec<Concept>,
}

/// Output of the three-round pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveAnalysis {
    pub summary: String,
    pub results: BTreeMap<String, KeywordAnalysis>,
}

/// A Round-1 concept carried into Round 2 with its originating keyword.
struct PrimaryConcept {
    keyword: String,
    concept: Concept,
}

/// Three-round comprehensive analysis pipeline.
pub struct ComprehensiveAnalysisPipeline {
    client: Arc<dyn ChatCompleter>,
    tuning: AnalysisTuning,
    concurrency: usize,
}

impl ComprehensiveAnalysisPipeline {
    pub fn new(client: Arc<dyn ChatCompleter>, tuning: AnalysisTuning, concurrency: usize) -> Self {
        Self {
            client,
            tuning,
            concurrency,
        }
    }

    /// Run all three rounds over the manuscript.
    pub async fn analyze(
        &self,
        title: &str,
        manuscript: &str,
        keywords: &[String],
        prompts: &ComprehensivePrompts,
        cancel: &CancellationToken,
        on_log: &(dyn Fn(&str) + Send + Sync),
    ) -> AppResult<ComprehensiveAnalysis> {
        if keywords.is_empty() {
            return Err(AppError::validation("no keywords selected"));
        }

        let summary = self
            .round_summary(title, manuscript, prompts, cancel, on_log)
            .await?;

        let round_one = self
            .round_primary(manuscript, &summary, keywords, prompts, cancel, on_log)
            .await?;

        // The Round-2 item set exists only now.
        let primaries: Vec<PrimaryConcept> = round_one
            .iter()
            .flat_map(|(keyword, concepts)| {
                concepts.iter().map(move |concept| PrimaryConcept {
                    keyword: keyword.clone(),
                    concept: concept.clone(),
                })
            })
            .collect();

        let round_two = if primaries.is_empty() {
            on_log("No primary concepts found; skipping secondary round");
            Vec::new()
        } else {
            self.round_secondary(manuscript, &summary, &primaries, prompts, cancel, on_log)
                .await?
        };

        let mut results: BTreeMap<String, KeywordAnalysis> = BTreeMap::new();
        for (keyword, concepts) in round_one {
            results.entry(keyword).or_default().primary = concepts;
        }
        // Accumulate, never replace: several primaries may share a keyword.
        for (keyword, concepts) in round_two {
            results.entry(keyword).or_default().secondary.extend(concepts);
        }

        info!(keywords = results.len(), "comprehensive analysis: complete");
        Ok(ComprehensiveAnalysis { summary, results })
    }

    /// Round 0: whole-document summary, degrading to a placeholder on
    /// failure. A summary is supporting context, not load-bearing.
    async fn round_summary(
        &self,
        title: &str,
        manuscript: &str,
        prompts: &ComprehensivePrompts,
        cancel: &CancellationToken,
        on_log: &(dyn Fn(&str) + Send + Sync),
    ) -> AppResult<String> {
        on_log("Round 0: summarizing document");
        let request = ChatRequest {
            system: prompts.system.clone(),
            messages: vec![WireMessage::user(render(
                &prompts.summary_template,
                &[("title", title), ("manuscript", manuscript)],
            ))],
            options: RequestOptions {
                temperature: self.tuning.summary_temperature,
                ..Default::default()
            },
        };
        match self.client.complete(request, cancel).await {
            Ok(summary) => Ok(summary),
            Err(LlmError::Aborted) => Err(AppError::Llm(LlmError::Aborted)),
            Err(e) => {
                warn!(error = %e, "summary round failed, continuing degraded");
                on_log(&format!("Round 0 failed ({}); continuing without a summary", e));
                Ok(format!("(Document summary unavailable: {})", e))
            }
        }
    }

    /// Round 1: one JSON-mode call per keyword, fail-fast.
    async fn round_primary(
        &self,
        manuscript: &str,
        summary: &str,
        keywords: &[String],
        prompts: &ComprehensivePrompts,
        cancel: &CancellationToken,
        on_log: &(dyn Fn(&str) + Send + Sync),
    ) -> AppResult<Vec<(String, Vec<Concept>)>> {
        on_log(&format!("Round 1: analyzing {} keyword(s)", keywords.len()));
        process_in_batches(
            keywords.to_vec(),
            self.concurrency,
            |batch, total| on_log(&format!("Round 1 batch {}/{}", batch, total)),
            |keyword, _| {
                let request = ChatRequest {
                    system: prompts.system.clone(),
                    messages: vec![WireMessage::user(render(
                        &prompts.primary_template,
                        &[
                            ("keyword", &keyword),
                            ("summary", summary),
                            ("manuscript", manuscript),
                        ],
                    ))],
                    options: RequestOptions {
                        temperature: self.tuning.primary_temperature,
                        json_mode: true,
                        ..Default::default()
                    },
                };
                let client = Arc::clone(&self.client);
                let cancel = cancel.clone();
                async move {
                    let text =
                        client
                            .complete(request, &cancel)
                            .await
                            .map_err(|source| AppError::Round {
                                round: 1,
                                subject: keyword.clone(),
                                source,
                            })?;
                    let payload: ConceptsPayload =
                        serde_json::from_str(&text).map_err(|e| AppError::Round {
                            round: 1,
                            subject: keyword.clone(),
                            source: LlmError::MalformedResponse {
                                message: e.to_string(),
                            },
                        })?;
                    let mut concepts = payload.concepts;
                    ensure_concept_ids(&keyword, &mut concepts);
                    Ok::<_, AppError>((keyword, concepts))
                }
            },
        )
        .await
    }

    /// Round 2: one JSON-mode call per primary concept, fail-fast.
    async fn round_secondary(
        &self,
        manuscript: &str,
        summary: &str,
        primaries: &[PrimaryConcept],
        prompts: &ComprehensivePrompts,
        cancel: &CancellationToken,
        on_log: &(dyn Fn(&str) + Send + Sync),
    ) -> AppResult<Vec<(String, Vec<Concept>)>> {
        on_log(&format!(
            "Round 2: elaborating {} primary concept(s)",
            primaries.len()
        ));
        process_in_batches(
            primaries.iter().collect::<Vec<_>>(),
            self.concurrency,
            |batch, total| on_log(&format!("Round 2 batch {}/{}", batch, total)),
            |primary, _| {
                let concept_json = serde_json::to_string(&primary.concept).unwrap_or_default();
                let request = ChatRequest {
                    system: prompts.system.clone(),
                    messages: vec![WireMessage::user(render(
                        &prompts.secondary_template,
                        &[
                            ("conceptJson", &concept_json),
                            ("keyword", &primary.keyword),
                            ("summary", summary),
                            ("manuscript", manuscript),
                        ],
                    ))],
                    options: RequestOptions {
                        temperature: self.tuning.secondary_temperature,
                        json_mode: true,
                        ..Default::default()
                    },
                };
                let client = Arc::clone(&self.client);
                let cancel = cancel.clone();
                let keyword = primary.keyword.clone();
                let parent_id = primary.concept.id.clone();
                let subject = if primary.concept.name.is_empty() {
                    parent_id.clone()
                } else {
                    primary.concept.name.clone()
                };
                async move {
                    let text =
                        client
                            .complete(request, &cancel)
                            .await
                            .map_err(|source| AppError::Round {
                                round: 2,
                                subject: subject.clone(),
                                source,
                            })?;
                    let payload: ConceptsPayload =
                        serde_json::from_str(&text).map_err(|e| AppError::Round {
                            round: 2,
                            subject: subject.clone(),
                            source: LlmError::MalformedResponse {
                                message: e.to_string(),
                            },
                        })?;
                    let mut concepts = payload.concepts;
                    ensure_concept_ids(&parent_id, &mut concepts);
                    for concept in &mut concepts {
                        concept.parent.get_or_insert_with(|| parent_id.clone());
                    }
                    Ok::<_, AppError>((keyword, concepts))
                }
            },
        )
        .await
    }
}
