//! Concept Hierarchy Model
//!
//! Concepts form a two-level hierarchy: primary concepts have no `parent`,
//! secondary concepts reference a primary concept's id. Relationship targets
//! are resolved lazily at display time; a dangling target renders as
//! "unknown" rather than failing the analysis.
//!
//! All fields are serde-lenient: the records are parsed out of LLM output,
//! which routinely omits optional structure.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A cross-reference from one concept to another within the same analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRelationship {
    /// Id of the related concept. May be a forward reference.
    #[serde(default)]
    pub target_id: String,
    /// How the two concepts relate.
    #[serde(default)]
    pub description: String,
}

/// A single analytical concept extracted from a manuscript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// Unique id within one analysis. Assigned if the model omits it.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub examples: String,
    #[serde(default)]
    pub relationships: Vec<ConceptRelationship>,
    /// Id of the primary concept this one elaborates, if secondary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Per-term explanations keyed by the term they contextualize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextual_explanations: Option<HashMap<String, String>>,
}

/// Mapping from a domain key (or keyword) to its ordered concept list.
///
/// A BTreeMap keeps the merged key set deterministic even though the
/// per-key population order depends on task completion.
pub type StructuredAnalysis = BTreeMap<String, Vec<Concept>>;

/// Envelope the pipelines expect from a JSON-mode completion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConceptsPayload {
    /// Missing array parses as empty rather than failing the round.
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

/// Assign deterministic ids to concepts the model emitted without one.
///
/// Ids are `{prefix}-c{n}` with a 1-based position, unique within the
/// prefix's concept list.
pub fn ensure_concept_ids(prefix: &str, concepts: &mut [Concept]) {
    for (idx, concept) in concepts.iter_mut().enumerate() {
        if concept.id.trim().is_empty() {
            concept.id = format!("{}-c{}", prefix, idx + 1);
        }
    }
}
