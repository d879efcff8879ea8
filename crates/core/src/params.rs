//! Persona Parameter Resolution
//!
//! Sampling parameters for a persona are resolved by longest hierarchical
//! prefix match on its code: try the whole code, then progressively strip
//! trailing segments; the first direct hit wins. The config carries a
//! mandatory default, so resolution is total by construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sampling parameters applied to a persona's reply call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaParameters {
    /// Sampling temperature in [0, 1].
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling weight in [0, 1].
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Turns of history carried into the reply context.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_max_history_turns() -> usize {
    6
}

impl Default for PersonaParameters {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_history_turns: default_max_history_turns(),
        }
    }
}

/// Persona parameter configuration: a fallback plus per-prefix overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaParameterConfig {
    /// Parameters used when no prefix matches.
    #[serde(default)]
    pub default: PersonaParameters,
    /// Overrides keyed by hierarchical code prefix (e.g. "1", "1-3").
    #[serde(default)]
    pub overrides: BTreeMap<String, PersonaParameters>,
}

impl PersonaParameterConfig {
    /// Resolve parameters for a hierarchical code by longest prefix match.
    ///
    /// Both '-' and '.' act as segment separators. An empty code resolves to
    /// the default.
    pub fn resolve(&self, code: &str) -> &PersonaParameters {
        let mut prefix = code.trim();
        while !prefix.is_empty() {
            if let Some(params) = self.overrides.get(prefix) {
                return params;
            }
            match prefix.rfind(['-', '.']) {
                Some(pos) => prefix = &prefix[..pos],
                None => break,
            }
        }
        &self.default
    }
}
