//! Philosophy Item Reference Model
//!
//! Static reference entities loaded from a fixed external index and never
//! mutated by the pipelines. The hierarchical `code` ("A-B-C-D") determines
//! how many analytical domains apply to the item.

use serde::{Deserialize, Serialize};

/// Field-theory description of an item.
///
/// The index stores this either as a plain term or as a structured
/// four-part record; the untagged representation accepts both shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldTheory {
    /// A single reference term.
    Plain(String),
    /// Four-part structured record.
    #[serde(rename_all = "camelCase")]
    Structured {
        base: String,
        reconciliation: String,
        other: String,
        practice: String,
    },
}

impl FieldTheory {
    /// Canonical single-string rendering for prompt interpolation.
    pub fn as_prompt_text(&self) -> String {
        match self {
            FieldTheory::Plain(term) => term.clone(),
            FieldTheory::Structured {
                base,
                reconciliation,
                other,
                practice,
            } => format!(
                "base: {}; reconciliation: {}; other: {}; practice: {}",
                base, reconciliation, other, practice
            ),
        }
    }
}

impl Default for FieldTheory {
    fn default() -> Self {
        FieldTheory::Plain(String::new())
    }
}

/// One entry of the philosophy reference index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhilosophyItem {
    /// Hierarchical code, dash-separated, 1-4 segments (e.g. "1-2-3-4").
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub field_theory: FieldTheory,
    #[serde(default)]
    pub ontology: String,
    #[serde(default)]
    pub epistemology: String,
    #[serde(default)]
    pub teleology: String,
    #[serde(default)]
    pub representative: String,
}

impl PhilosophyItem {
    /// Number of hierarchical segments in the code, clamped to 1..=4.
    ///
    /// This caps the analysis to the domains the code actually declares.
    pub fn code_depth(&self) -> usize {
        self.code
            .split('-')
            .filter(|segment| !segment.trim().is_empty())
            .count()
            .clamp(1, 4)
    }

    /// The code segment at a 0-based position, if present.
    pub fn code_segment(&self, index: usize) -> Option<&str> {
        self.code
            .split('-')
            .filter(|segment| !segment.trim().is_empty())
            .nth(index)
    }
}
