//! Orchestration Services
//!
//! The service layer: the batch runner, prompt texts, the item registry and
//! result store, the analysis pipelines, the persona chat protocol, the
//! generation driver, and session cancellation control.

pub mod analysis;
pub mod batch;
pub mod generation;
pub mod persona;
pub mod prompt;
pub mod registry;
pub mod results;
pub mod session;
