//! Processed Result Store
//!
//! One durable record per processed manuscript, keyed by file name.
//! Re-processing the same file replaces the prior record in place, so the
//! store holds at most one current result per key.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use noesis_core::{PhilosophyItem, StructuredAnalysis};

/// Terminal status of one manuscript run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Success,
    Error,
}

/// Durable record of one processed manuscript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFileResult {
    /// Store key
    pub file_name: String,
    /// Code of the item the manuscript was analyzed against
    pub code: String,
    /// Item display name
    pub name: String,
    pub status: ProcessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<StructuredAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl ProcessedFileResult {
    /// Record for a completed analysis.
    pub fn success(
        file_name: impl Into<String>,
        item: &PhilosophyItem,
        analysis: StructuredAnalysis,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            code: item.code.clone(),
            name: item.name.clone(),
            status: ProcessStatus::Success,
            report: None,
            analysis: Some(analysis),
            error: None,
            processed_at: Utc::now(),
        }
    }

    /// Record for a failed analysis.
    pub fn failure(
        file_name: impl Into<String>,
        item: &PhilosophyItem,
        error: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            code: item.code.clone(),
            name: item.name.clone(),
            status: ProcessStatus::Error,
            report: None,
            analysis: None,
            error: Some(error.into()),
            processed_at: Utc::now(),
        }
    }
}

/// In-memory store of processed results keyed by file name.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: BTreeMap<String, ProcessedFileResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its file name.
    pub fn upsert(&mut self, result: ProcessedFileResult) {
        self.entries.insert(result.file_name.clone(), result);
    }

    pub fn get(&self, file_name: &str) -> Option<&ProcessedFileResult> {
        self.entries.get(file_name)
    }

    /// All records in file-name order.
    pub fn all(&self) -> impl Iterator<Item = &ProcessedFileResult> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
