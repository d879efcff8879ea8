//! Generation Driver
//!
//! Runs the domain analysis pipeline over a set of manuscripts under one
//! session token. Failure is contained per manuscript: one manuscript's
//! error becomes its own failure record while the rest keep running. The
//! only cross-cutting outcome is cancellation, which skips the remaining
//! records instead of storing them as failures.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::info;

use noesis_llm::ChatCompleter;

use crate::config::{AnalysisTuning, ApiSettings};
use crate::services::analysis::{DomainAnalysisPipeline, DomainPrompts};
use crate::services::registry::ItemRegistry;
use crate::services::results::{ProcessStatus, ProcessedFileResult, ResultStore};
use crate::services::session::{OperationKind, SessionController};
use crate::utils::error::{AppError, AppResult};

/// One manuscript queued for processing.
#[derive(Debug, Clone)]
pub struct ManuscriptInput {
    /// Result-store key
    pub file_name: String,
    /// Code of the philosophy item to analyze against
    pub code: String,
    pub content: String,
}

/// Tally of one driver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Manuscripts skipped because the run was cancelled mid-flight.
    pub stopped: usize,
}

/// Multi-manuscript orchestrator over the domain analysis pipeline.
pub struct GenerationDriver {
    pipeline: DomainAnalysisPipeline,
    registry: ItemRegistry,
    prompts: DomainPrompts,
}

impl GenerationDriver {
    pub fn new(
        client: Arc<dyn ChatCompleter>,
        settings: &ApiSettings,
        tuning: &AnalysisTuning,
        registry: ItemRegistry,
    ) -> AppResult<Self> {
        settings.validate()?;
        Ok(Self {
            pipeline: DomainAnalysisPipeline::new(
                client,
                tuning.domain_temperature,
                settings.concurrency,
            ),
            registry,
            prompts: DomainPrompts::default(),
        })
    }

    /// Replace the default prompt texts.
    pub fn with_prompts(mut self, prompts: DomainPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Process every manuscript, storing one record per non-skipped input.
    ///
    /// Begins a generation-kind operation on the session, so a prior
    /// in-flight generation run is cancelled first.
    pub async fn run(
        &self,
        manuscripts: &[ManuscriptInput],
        session: &mut SessionController,
        store: &mut ResultStore,
        on_log: &(dyn Fn(&str) + Send + Sync),
    ) -> AppResult<GenerationSummary> {
        if manuscripts.is_empty() {
            return Err(AppError::validation("no manuscripts supplied"));
        }
        let cancel = session.begin(OperationKind::Generation);
        on_log(&format!("Processing {} manuscript(s)", manuscripts.len()));

        let tasks = manuscripts.iter().map(|manuscript| {
            let cancel = cancel.clone();
            async move {
                let item = match self.registry.get(&manuscript.code) {
                    Ok(item) => item,
                    Err(e) => {
                        // No item record to attribute the result to
                        return Some(ProcessedFileResult {
                            file_name: manuscript.file_name.clone(),
                            code: manuscript.code.clone(),
                            name: String::new(),
                            status: ProcessStatus::Error,
                            report: None,
                            analysis: None,
                            error: Some(e.to_string()),
                            processed_at: Utc::now(),
                        });
                    }
                };
                match self
                    .pipeline
                    .analyze(&manuscript.content, item, &self.prompts, &cancel, on_log)
                    .await
                {
                    Ok(analysis) => Some(ProcessedFileResult::success(
                        &manuscript.file_name,
                        item,
                        analysis,
                    )),
                    Err(e) if e.is_aborted() => {
                        on_log(&format!("'{}' stopped by user", manuscript.file_name));
                        None
                    }
                    Err(e) => Some(ProcessedFileResult::failure(
                        &manuscript.file_name,
                        item,
                        e.to_string(),
                    )),
                }
            }
        });

        let mut summary = GenerationSummary::default();
        for record in join_all(tasks).await {
            match record {
                Some(record) => {
                    match record.status {
                        ProcessStatus::Success => summary.succeeded += 1,
                        ProcessStatus::Error => summary.failed += 1,
                    }
                    store.upsert(record);
                }
                None => summary.stopped += 1,
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            stopped = summary.stopped,
            "generation run finished"
        );
        Ok(summary)
    }
}
