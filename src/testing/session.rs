//! Test command session
//!
//! Pairs every discovered tests file with the tested file next to it,
//! runs the pairs in order inside one scoring context and produces the
//! final summary.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::scoring::{keep_score, Counts, Score, ScoringContext};

use super::discovery::find_tests_files;
use super::runner::run_tests_file;

/// Options for one test run
#[derive(Debug, Clone)]
pub struct TestOptions {
    /// Directory searched for tests files
    pub root: PathBuf,
    /// Name of the file holding the code under test
    pub tested_file: String,
    /// Name of the file holding the tests
    pub tests_file: String,
    /// Skip pairs whose tested file is missing instead of aborting
    pub ignore_missing_tested_file: bool,
    pub verbose: bool,
}

/// What happened to one tests file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStatus {
    Executed,
    Ignored,
}

/// Totals of a finished run
#[derive(Debug, Clone)]
pub struct Summary {
    pub counts: Counts,
    pub score: Score,
    pub executed: usize,
    pub ignored: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PASS {}", self.counts.npass)?;
        writeln!(f, "FAIL {}", self.counts.nfail)?;
        writeln!(f, "SKIP {}", self.counts.nskip)?;
        writeln!(f, "Score: {}", self.score)
    }
}

/// Run every tests file below `options.root`
///
/// A missing tested file aborts the run with [`Error::MissingTestedFile`]
/// unless `ignore_missing_tested_file` is set.
pub fn run_tests(options: &TestOptions, config: &Config) -> Result<Summary> {
    let mut ctx = ScoringContext::new();

    let ((executed, ignored), score) = keep_score(&mut ctx, |ctx| {
        let mut executed = 0;
        let mut ignored = 0;
        for tests_path in find_tests_files(&options.root, &options.tests_file) {
            match run_pair(ctx, &tests_path, options, config)? {
                PairStatus::Executed => executed += 1,
                PairStatus::Ignored => ignored += 1,
            }
        }
        Ok((executed, ignored))
    })?;

    info!(executed, ignored, %score, "test run finished");

    Ok(Summary {
        counts: ctx.counts(),
        score,
        executed,
        ignored,
    })
}

fn run_pair(
    ctx: &mut ScoringContext,
    tests_path: &Path,
    options: &TestOptions,
    config: &Config,
) -> Result<PairStatus> {
    let directory = match tests_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let directory = directory.canonicalize()?;
    let tested_file = directory.join(&options.tested_file);

    if !tested_file.is_file() {
        println!(
            "ERROR: Could not find {} in {}",
            options.tested_file,
            directory.display()
        );

        if options.ignore_missing_tested_file {
            println!(
                "WARNING: Continuing with testing --- tests will be fully ignored, not even be counted as skipped"
            );
            warn!(directory = %directory.display(), "tested file missing, tests ignored");
            return Ok(PairStatus::Ignored);
        }

        return Err(Error::MissingTestedFile {
            file: options.tested_file.clone(),
            directory,
        });
    }

    let tests_path = directory.join(tests_path.file_name().unwrap_or(tests_path.as_os_str()));
    run_tests_file(ctx, &tests_path, &tested_file, config, options.verbose)?;
    Ok(PairStatus::Executed)
}
