//! CLI command definitions
//!
//! Defines the clap commands for the scripting CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the version
    Version,

    /// Run tests in all subdirectories
    Test {
        /// File where tested code resides (default: student.py)
        #[arg(long)]
        tested_file: Option<String>,

        /// File where tests reside (default: tests.yaml)
        #[arg(long)]
        tests_file: Option<String>,

        /// If the tested file is missing, ignore its tests instead of aborting
        #[arg(long)]
        ignore_missing_tested_file: bool,

        /// Directory to search for tests files
        #[arg(long, short = 'C', default_value = ".")]
        directory: PathBuf,

        /// Print every check as it runs
        #[arg(long, short)]
        verbose: bool,
    },
}
