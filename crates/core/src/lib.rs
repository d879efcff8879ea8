//! Noesis Core
//!
//! Foundational types for the Noesis workspace: the concept/analysis data
//! model, the philosophy item reference model, chat message types, persona
//! parameter resolution, and prompt template rendering. This crate has zero
//! dependencies on application-level code (HTTP client, orchestration).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `concept` - Concept hierarchy and structured analysis model
//! - `item` - Philosophy item reference entity with the `FieldTheory` sum type
//! - `chat` - Chat message types and history windowing
//! - `params` - Persona sampling parameters and longest-prefix resolution
//! - `template` - Prompt template placeholder rendering
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/thiserror** - keeps build times minimal
//! 2. **Pure functions for resolution logic** - enables exhaustive unit testing
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod chat;
pub mod concept;
pub mod error;
pub mod item;
pub mod params;
pub mod template;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Concept Model ──────────────────────────────────────────────────────
pub use concept::{
    ensure_concept_ids, Concept, ConceptRelationship, ConceptsPayload, StructuredAnalysis,
};

// ── Philosophy Items ───────────────────────────────────────────────────
pub use item::{FieldTheory, PhilosophyItem};

// ── Chat Messages ──────────────────────────────────────────────────────
pub use chat::{last_messages, truncate_to_turns, ChatMessage, ChatRole};

// ── Persona Parameters ─────────────────────────────────────────────────
pub use params::{PersonaParameterConfig, PersonaParameters};

// ── Template Rendering ─────────────────────────────────────────────────
pub use template::render;
