//! CLI command handling
//!
//! Dispatches CLI commands and formats their output.

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::Result;
use crate::testing::{self, TestOptions};

/// Dispatch a CLI command
pub fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        Commands::Test {
            tested_file,
            tests_file,
            ignore_missing_tested_file,
            directory,
            verbose,
        } => {
            let config = Config::load()?;

            let options = TestOptions {
                root: directory,
                tested_file: tested_file.unwrap_or_else(|| config.defaults.tested_file.clone()),
                tests_file: tests_file.unwrap_or_else(|| config.defaults.tests_file.clone()),
                ignore_missing_tested_file,
                verbose,
            };

            let summary = testing::run_tests(&options, &config)?;

            if verbose {
                println!(
                    "\n{} tests file(s) run, {} ignored",
                    summary.executed, summary.ignored
                );
            }
            print!("{summary}");

            Ok(())
        }
    }
}
