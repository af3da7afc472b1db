//! Test runner
//!
//! Discovers YAML tests files, runs each against the tested file in the
//! same directory, and scores the outcomes with the policies declared in
//! the tests file.

mod config;
mod discovery;
mod runner;
mod session;

pub use config::*;
pub use discovery::find_tests_files;
pub use runner::{run_tests_file, TestsRunner};
pub use session::{run_tests, PairStatus, Summary, TestOptions};
