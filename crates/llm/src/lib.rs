//! Noesis LLM
//!
//! Chat-completion gateway for the Noesis workspace: builds the request
//! envelope for an OpenAI-compatible endpoint, classifies non-2xx responses
//! into typed errors, extracts the textual payload (stripping code fences in
//! JSON mode), and honors a cancellation token on every call.
//!
//! The `ChatCompleter` trait is the seam the orchestration layer (and its
//! tests) program against; `HttpChatClient` is the production implementation.

pub mod client;
pub mod json;
pub mod types;

// Re-export main types
pub use client::{ChatCompleter, HttpChatClient};
pub use json::extract_json_payload;
pub use types::{ChatRequest, LlmError, LlmResult, RequestOptions, WireMessage, WireRole};
