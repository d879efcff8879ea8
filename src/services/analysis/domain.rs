//! Structured Domain Analysis
//!
//! Single-round fan-out: one JSON-mode completion per applicable domain of
//! the item, run through the batch runner under the configured concurrency
//! bound, merged into a `StructuredAnalysis` keyed by domain.
//!
//! Failure policy is strict at this boundary: one domain's hard failure
//! fails the entire analysis. Callers wanting per-manuscript tolerance
//! catch at the manuscript level (see the generation driver).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use noesis_core::{ensure_concept_ids, render, ConceptsPayload, PhilosophyItem, StructuredAnalysis};
use noesis_llm::{ChatCompleter, ChatRequest, LlmError, RequestOptions, WireMessage};

use crate::services::analysis::AnalysisDomain;
use crate::services::batch::process_in_batches;
use crate::services::prompt::{
    movement_pattern, DOMAIN_ANALYSIS_SYSTEM_PROMPT, DOMAIN_ANALYSIS_USER_TEMPLATE,
};
use crate::utils::error::{AppError, AppResult};

/// Prompt text for the domain analysis.
#[derive(Debug, Clone)]
pub struct DomainPrompts {
    pub system: String,
    /// Placeholders: {domainName}, {itemName}, {itemCode}, {referenceTerm},
    /// {movementPattern}, {domainKey}, {manuscript}.
    pub user_template: String,
}

impl Default for DomainPrompts {
    fn default() -> Self {
        Self {
            system: DOMAIN_ANALYSIS_SYSTEM_PROMPT.to_string(),
            user_template: DOMAIN_ANALYSIS_USER_TEMPLATE.to_string(),
        }
    }
}

/// Single-round domain analysis pipeline.
pub struct DomainAnalysisPipeline {
    client: Arc<dyn ChatCompleter>,
    temperature: f32,
    concurrency: usize,
}

impl DomainAnalysisPipeline {
    pub fn new(client: Arc<dyn ChatCompleter>, temperature: f32, concurrency: usize) -> Self {
        Self {
            client,
            temperature,
            concurrency,
        }
    }

    /// Analyze a manuscript against every domain the item's code declares.
    ///
    /// Returns a map whose key set is exactly the applicable domains.
    pub async fn analyze(
        &self,
        manuscript: &str,
        item: &PhilosophyItem,
        prompts: &DomainPrompts,
        cancel: &CancellationToken,
        on_log: &(dyn Fn(&str) + Send + Sync),
    ) -> AppResult<StructuredAnalysis> {
        let domains = AnalysisDomain::applicable(item.code_depth());
        info!(
            item = %item.code,
            domains = domains.len(),
            "domain analysis: starting"
        );
        on_log(&format!(
            "Analyzing \"{}\" across {} domain(s)",
            item.name,
            domains.len()
        ));

        let tagged = process_in_batches(
            domains.to_vec(),
            self.concurrency,
            |batch, total| on_log(&format!("Domain batch {}/{}", batch, total)),
            |domain, _| {
                let segment = item.code_segment(domain.index()).unwrap_or_default();
                let user_prompt = render(
                    &prompts.user_template,
                    &[
                        ("domainName", domain.display_name()),
                        ("itemName", &item.name),
                        ("itemCode", &item.code),
                        ("referenceTerm", &domain.reference_term(item)),
                        ("movementPattern", movement_pattern(segment)),
                        ("domainKey", domain.key()),
                        ("manuscript", manuscript),
                    ],
                );
                let request = ChatRequest {
                    system: prompts.system.clone(),
                    messages: vec![WireMessage::user(user_prompt)],
                    options: RequestOptions {
                        temperature: self.temperature,
                        json_mode: true,
                        ..Default::default()
                    },
                };
                let client = Arc::clone(&self.client);
                let cancel = cancel.clone();
                async move {
                    let text = client.complete(request, &cancel).await.map_err(|source| {
                        AppError::Domain {
                            domain: domain.display_name().to_string(),
                            source,
                        }
                    })?;
                    let payload: ConceptsPayload =
                        serde_json::from_str(&text).map_err(|e| AppError::Domain {
                            domain: domain.display_name().to_string(),
                            source: LlmError::MalformedResponse {
                                message: e.to_string(),
                            },
                        })?;
                    let mut concepts = payload.concepts;
                    ensure_concept_ids(domain.key(), &mut concepts);
                    Ok::<_, AppError>((domain, concepts))
                }
            },
        )
        .await?;

        let mut analysis = StructuredAnalysis::new();
        for (domain, concepts) in tagged {
            on_log(&format!(
                "Domain '{}' produced {} concept(s)",
                domain.display_name(),
                concepts.len()
            ));
            analysis.insert(domain.key().to_string(), concepts);
        }
        info!(keys = analysis.len(), "domain analysis: complete");
        Ok(analysis)
    }
}
