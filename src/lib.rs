//! Noesis
//!
//! Batched, multi-round LLM orchestration for philosophical manuscript
//! analysis and persona conversation. The crate layers three concerns:
//!
//! - `noesis-core`: pure data model (concepts, items, chat history,
//!   parameter resolution, templating).
//! - `noesis-llm`: the request gateway (wire envelope, HTTP client,
//!   cancellation-aware completion trait, JSON payload extraction).
//! - this crate: the orchestration services, from the generic batch runner
//!   up to the analysis pipelines, the persona chat protocol, the
//!   generation driver, and session cancellation control.
//!
//! Every network-bound operation takes a `CancellationToken`; the `Aborted`
//! error kind is threaded through so a user-initiated stop is reported as a
//! stop, never as a failure.

pub mod config;
pub mod services;
pub mod utils;

pub use config::{AnalysisTuning, ApiSettings};
pub use services::analysis::{
    AnalysisDomain, ComprehensiveAnalysis, ComprehensiveAnalysisPipeline, ComprehensivePrompts,
    DomainAnalysisPipeline, DomainPrompts, KeywordAnalysis,
};
pub use services::batch::process_in_batches;
pub use services::generation::{GenerationDriver, GenerationSummary, ManuscriptInput};
pub use services::persona::{
    ObserverOutcome, ObserverUtterance, PersonaChat, PersonaPrompts, PersonaSlot, Speaker,
    TurnOutcome,
};
pub use services::registry::ItemRegistry;
pub use services::results::{ProcessStatus, ProcessedFileResult, ResultStore};
pub use services::session::{OperationKind, SessionController};
pub use utils::error::{AppError, AppResult};
