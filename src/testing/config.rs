//! Tests file configuration types
//!
//! Defines the data structures for deserializing YAML tests files.

use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};

/// A complete tests file
#[derive(Deserialize, Debug)]
pub struct TestsFile {
    /// Name shown in verbose output
    pub name: Option<String>,
    /// Optional description of what the tests verify
    pub description: Option<String>,
    /// Command prefix used to run the tested file (e.g. `["python3"]`)
    pub interpreter: Option<Vec<String>>,
    /// Checks and scoring groups, in execution order
    #[serde(default)]
    pub steps: Vec<TestStep>,
}

/// A single step: either a check or a scoring group around more steps
#[derive(Deserialize, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestStep {
    /// Run the tested file and check its behaviour
    Run(RunCheck),
    /// Inspect the tested file's source text
    Source(SourceCheck),
    /// One point per check
    Cumulative { steps: Vec<TestStep> },
    /// Rescale the group's score to `maximum`
    Scale { maximum: f64, steps: Vec<TestStep> },
    /// Zero the group and skip its remaining checks on the first failure
    AllOrNothing { steps: Vec<TestStep> },
}

/// Run the tested file once
#[derive(Deserialize, Debug, Default)]
pub struct RunCheck {
    pub name: Option<String>,
    /// Arguments passed after the tested file
    #[serde(default)]
    pub args: Vec<String>,
    /// Text fed to standard input
    pub stdin: Option<String>,
    #[serde(default)]
    pub expect: RunExpectation,
    /// Report as skipped without running
    #[serde(default)]
    pub skip: bool,
}

/// Expectations for a run of the tested file
#[derive(Deserialize, Debug, Default)]
pub struct RunExpectation {
    /// Expected exact stdout
    pub stdout: Option<String>,
    /// Expected substring in stdout
    pub stdout_contains: Option<String>,
    /// Expected substring in stderr
    pub stderr_contains: Option<String>,
    /// Expected exit code (default: 0)
    pub exit_code: Option<i32>,
}

/// Check the tested file's text
#[derive(Deserialize, Debug, Default)]
pub struct SourceCheck {
    pub name: Option<String>,
    /// Substring that must appear
    pub contains: Option<String>,
    /// Substring that must not appear
    pub not_contains: Option<String>,
    #[serde(default)]
    pub skip: bool,
}

impl TestsFile {
    /// Load and parse a tests file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        Self::parse(&content).map_err(|message| Error::TestsFileParse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}

impl RunCheck {
    /// Label for reports
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None if self.args.is_empty() => "run".to_string(),
            None => format!("run {}", self.args.join(" ")),
        }
    }
}

impl SourceCheck {
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.contains, &self.not_contains) {
            (Some(text), _) => format!("source contains {text:?}"),
            (None, Some(text)) => format!("source lacks {text:?}"),
            (None, None) => "source".to_string(),
        }
    }
}
