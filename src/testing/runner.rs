//! Tests file runner
//!
//! Executes the steps of one tests file against its tested file, reporting
//! every check through the scoring context. A failing check is reported
//! and the remaining checks still run.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use colored::Colorize;
use tracing::{debug, info, warn};

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::scoring::{all_or_nothing, cumulative, scale, Outcome, ScoringContext};

use super::config::{RunCheck, RunExpectation, SourceCheck, TestStep, TestsFile};

/// Run a tests file from disk against `tested_file`
pub fn run_tests_file(
    ctx: &mut ScoringContext,
    tests_path: &Path,
    tested_file: &Path,
    config: &Config,
    verbose: bool,
) -> Result<()> {
    let tests = TestsFile::load(tests_path)?;
    info!(path = %tests_path.display(), steps = tests.steps.len(), "running tests file");

    if verbose {
        let title = tests
            .name
            .clone()
            .unwrap_or_else(|| tests_path.display().to_string());
        println!("\n{} {}", "Running Tests:".blue().bold(), title.white().bold());
        if let Some(desc) = &tests.description {
            println!("  {}", desc.dimmed());
        }
    }

    let runner = TestsRunner::new(&tests, tested_file, config, verbose);
    runner.execute_all(ctx, &tests.steps)
}

/// Executes steps against one tested file
pub struct TestsRunner {
    tested_file: PathBuf,
    directory: PathBuf,
    interpreter: Option<Vec<String>>,
    verbose: bool,
}

impl TestsRunner {
    pub fn new(tests: &TestsFile, tested_file: &Path, config: &Config, verbose: bool) -> Self {
        let directory = tested_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let interpreter = tests
            .interpreter
            .clone()
            .or_else(|| config.interpreter_for(tested_file));

        Self {
            tested_file: tested_file.to_path_buf(),
            directory,
            interpreter,
            verbose,
        }
    }

    /// Execute steps in order
    pub fn execute_all(&self, ctx: &mut ScoringContext, steps: &[TestStep]) -> Result<()> {
        for step in steps {
            self.execute(ctx, step)?;
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut ScoringContext, step: &TestStep) -> Result<()> {
        match step {
            TestStep::Run(check) => {
                self.check(ctx, &check.label(), check.skip, || self.run(check))
            }
            TestStep::Source(check) => {
                self.check(ctx, &check.label(), check.skip, || self.inspect_source(check))
            }
            TestStep::Cumulative { steps } => cumulative(ctx, |ctx| self.execute_all(ctx, steps)),
            TestStep::Scale { maximum, steps } => {
                scale(ctx, *maximum, |ctx| self.execute_all(ctx, steps))
            }
            TestStep::AllOrNothing { steps } => {
                all_or_nothing(ctx, |ctx| self.execute_all(ctx, steps))
            }
        }
    }

    /// Run one check unless skipped, and report its outcome
    fn check(
        &self,
        ctx: &mut ScoringContext,
        label: &str,
        skip: bool,
        body: impl FnOnce() -> Result<()>,
    ) -> Result<()> {
        let index = ctx.counts().total();

        let outcome = if skip || ctx.should_skip() {
            Outcome::Skip
        } else {
            match body() {
                Ok(()) => Outcome::Pass,
                Err(e) => Outcome::Fail(e.to_string()),
            }
        };

        self.print_outcome(index, label, &outcome);
        ctx.report(outcome)
    }

    fn print_outcome(&self, index: usize, label: &str, outcome: &Outcome) {
        if self.verbose {
            match outcome {
                Outcome::Pass => println!("  {} [{}] {}", "✓".green(), index, label),
                Outcome::Fail(_) => println!("  {} [{}] {}", "✗".red(), index, label),
                Outcome::Skip => println!("  {} [{}] {}", "-".yellow(), index, label.dimmed()),
            }
        }
        if let Outcome::Fail(message) = outcome {
            println!("[{index}] FAIL {message}");
        }
    }

    /// Build the command that executes the tested file
    fn command(&self) -> Result<Command> {
        let mut command = match self.interpreter.as_deref() {
            Some([program, args @ ..]) => {
                let resolved = which::which(program).map_err(|_| Error::InterpreterNotFound {
                    name: program.clone(),
                })?;
                let mut command = Command::new(resolved);
                command.args(args).arg(&self.tested_file);
                command
            }
            _ => Command::new(&self.tested_file),
        };
        command.current_dir(&self.directory);
        Ok(command)
    }

    fn run(&self, check: &RunCheck) -> Result<()> {
        let mut command = self.command()?;
        command
            .args(&check.args)
            .stdin(if check.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(?command, "spawning tested file");
        let mut child = command.spawn().map_err(|e| {
            warn!(file = %self.tested_file.display(), error = %e, "failed to spawn tested file");
            Error::assertion(format!(
                "Failed to run {}: {}",
                self.tested_file.display(),
                e
            ))
        })?;

        // Feed stdin from its own thread so a child that writes a lot before
        // reading cannot block on a full stdout pipe
        let writer = match (&check.stdin, child.stdin.take()) {
            (Some(input), Some(mut stdin)) => {
                let input = input.clone();
                Some(thread::spawn(move || stdin.write_all(input.as_bytes())))
            }
            _ => None,
        };

        let output = child.wait_with_output()?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The child exited without reading all of its input
                Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("tested file closed stdin early");
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(Error::Internal("stdin writer panicked".to_string())),
            }
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        check_expectation(&check.expect, output.status.code(), &stdout, &stderr)
    }

    fn inspect_source(&self, check: &SourceCheck) -> Result<()> {
        let source = std::fs::read_to_string(&self.tested_file)
            .map_err(|e| Error::file_read(&self.tested_file, &e))?;

        if let Some(expected) = &check.contains {
            if !source.contains(expected.as_str()) {
                return Err(Error::assertion(format!(
                    "Expected source to contain {:?}",
                    expected
                )));
            }
        }

        if let Some(forbidden) = &check.not_contains {
            if source.contains(forbidden.as_str()) {
                return Err(Error::assertion(format!(
                    "Expected source not to contain {:?}",
                    forbidden
                )));
            }
        }

        Ok(())
    }
}

/// Compare a finished run against its expectations
fn check_expectation(
    expect: &RunExpectation,
    exit_code: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> Result<()> {
    let expected_code = expect.exit_code.unwrap_or(0);
    match exit_code {
        Some(code) if code == expected_code => {}
        Some(code) => {
            return Err(Error::assertion(format!(
                "Expected exit code {}, got {}",
                expected_code, code
            )));
        }
        None => {
            return Err(Error::assertion("Process was terminated by a signal"));
        }
    }

    if let Some(expected) = &expect.stdout {
        if stdout != expected {
            return Err(Error::assertion(format!(
                "Expected stdout {:?}, got {:?}",
                expected, stdout
            )));
        }
    }

    if let Some(expected) = &expect.stdout_contains {
        if !stdout.contains(expected.as_str()) {
            return Err(Error::assertion(format!(
                "Expected stdout to contain {:?}, got {:?}",
                expected, stdout
            )));
        }
    }

    if let Some(expected) = &expect.stderr_contains {
        if !stderr.contains(expected.as_str()) {
            return Err(Error::assertion(format!(
                "Expected stderr to contain {:?}, got {:?}",
                expected, stderr
            )));
        }
    }

    Ok(())
}
