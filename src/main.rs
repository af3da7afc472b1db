//! Scripting - an educational test harness
//!
//! Runs YAML tests files against the tested file next to them and prints
//! pass/fail/skip counts and the composed score.

use clap::{CommandFactory, Parser};
use scripting::{cli, commands::Commands, common::logging, Error};

#[derive(Parser)]
#[command(name = "scripting", about = "Educational test harness with composable scoring")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return;
    };

    if let Err(e) = cli::dispatch(command) {
        // The test session already printed its own ERROR line for this one
        if !matches!(e, Error::MissingTestedFile { .. }) {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
