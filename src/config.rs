//! Configuration
//!
//! Explicit by-value configuration for the pipelines. There is no ambient
//! settings singleton: every pipeline entry point receives what it needs.

use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Remote endpoint settings for one orchestration session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    /// Chat-completion endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer token
    #[serde(default)]
    pub api_key: String,
    /// Model name sent in the request envelope
    #[serde(default = "default_model")]
    pub model: String,
    /// Concurrency bound for batched fan-out
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_concurrency() -> usize {
    3
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            concurrency: default_concurrency(),
        }
    }
}

impl ApiSettings {
    /// Check the settings before any pipeline issues work.
    pub fn validate(&self) -> AppResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::config("API key is not set"));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::config("model name is not set"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(AppError::config("endpoint is not set"));
        }
        Ok(())
    }
}

/// Per-round sampling temperatures.
///
/// Extraction rounds run cool for determinism; the secondary round runs
/// slightly warmer because it synthesizes context-dependent elaborations.
/// Tuning values, not a correctness contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTuning {
    /// Domain analysis fan-out
    #[serde(default = "default_domain_temperature")]
    pub domain_temperature: f32,
    /// Round 0 whole-document summary
    #[serde(default = "default_summary_temperature")]
    pub summary_temperature: f32,
    /// Round 1 per-keyword primary extraction
    #[serde(default = "default_primary_temperature")]
    pub primary_temperature: f32,
    /// Round 2 per-concept secondary synthesis
    #[serde(default = "default_secondary_temperature")]
    pub secondary_temperature: f32,
}

fn default_domain_temperature() -> f32 {
    0.3
}

fn default_summary_temperature() -> f32 {
    0.2
}

fn default_primary_temperature() -> f32 {
    0.4
}

fn default_secondary_temperature() -> f32 {
    0.5
}

impl Default for AnalysisTuning {
    fn default() -> Self {
        Self {
            domain_temperature: default_domain_temperature(),
            summary_temperature: default_summary_temperature(),
            primary_temperature: default_primary_temperature(),
            secondary_temperature: default_secondary_temperature(),
        }
    }
}
