//! Analysis Pipelines
//!
//! Two pipelines over the batch runner: the single-round structured domain
//! analysis and the three-round comprehensive keyword analysis.

pub mod comprehensive;
pub mod domain;

use noesis_core::PhilosophyItem;

pub use comprehensive::{
    ComprehensiveAnalysis, ComprehensiveAnalysisPipeline, ComprehensivePrompts, KeywordAnalysis,
};
pub use domain::{DomainAnalysisPipeline, DomainPrompts};

/// The four fixed analytical domains, in hierarchical order.
///
/// An item's code depth decides how many of these apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisDomain {
    FieldTheory,
    Ontology,
    Epistemology,
    Teleology,
}

impl AnalysisDomain {
    /// All domains in order.
    pub const ALL: [AnalysisDomain; 4] = [
        AnalysisDomain::FieldTheory,
        AnalysisDomain::Ontology,
        AnalysisDomain::Epistemology,
        AnalysisDomain::Teleology,
    ];

    /// The domains applicable at a given code depth (1..=4).
    pub fn applicable(depth: usize) -> &'static [AnalysisDomain] {
        &Self::ALL[..depth.clamp(1, 4)]
    }

    /// Result-map key for this domain.
    pub fn key(&self) -> &'static str {
        match self {
            AnalysisDomain::FieldTheory => "fieldTheory",
            AnalysisDomain::Ontology => "ontology",
            AnalysisDomain::Epistemology => "epistemology",
            AnalysisDomain::Teleology => "teleology",
        }
    }

    /// Human-readable name used in prompts and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisDomain::FieldTheory => "field theory",
            AnalysisDomain::Ontology => "ontology",
            AnalysisDomain::Epistemology => "epistemology",
            AnalysisDomain::Teleology => "teleology",
        }
    }

    /// 0-based position, which is also the code segment this domain reads.
    pub fn index(&self) -> usize {
        match self {
            AnalysisDomain::FieldTheory => 0,
            AnalysisDomain::Ontology => 1,
            AnalysisDomain::Epistemology => 2,
            AnalysisDomain::Teleology => 3,
        }
    }

    /// The item's own reference term for this domain.
    pub fn reference_term(&self, item: &PhilosophyItem) -> String {
        match self {
            AnalysisDomain::FieldTheory => item.field_theory.as_prompt_text(),
            AnalysisDomain::Ontology => item.ontology.clone(),
            AnalysisDomain::Epistemology => item.epistemology.clone(),
            AnalysisDomain::Teleology => item.teleology.clone(),
        }
    }
}

impl std::fmt::Display for AnalysisDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
