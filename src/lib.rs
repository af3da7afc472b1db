//! Scripting - an educational test harness
//!
//! This library discovers tests files, runs them against the code under
//! test, and composes the outcomes into a score through nestable scoring
//! policies.

pub mod cli;
pub mod commands;
pub mod common;
pub mod scoring;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use scoring::{Outcome, Score, ScoringContext};
