//! Integration tests
//!
//! End-to-end exercises of the orchestration layer against a scripted
//! in-memory chat completer, so every test observes the exact requests a
//! pipeline issues and the exact order it issues them in.

mod support;

mod batch_test;
mod comprehensive_test;
mod domain_test;
mod session_test;
