//! CLI command definitions and handlers

mod check;
mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tscheck - normalized TypeScript/JavaScript quality checks
#[derive(Parser, Debug)]
#[command(name = "tscheck")]
#[command(
    version,
    about = "Run prettier, eslint, tsc, and stub detection with one normalized report",
    after_help = "\
Examples:
  tscheck check                        Check the current directory
  tscheck check src/ tests/            Check specific paths
  tscheck check --fix                  Auto-fix formatting and lint issues
  tscheck check --format json          JSON payload for scripting
  tscheck check --checks lint,types    Run a subset of checks
  tscheck watch                        Re-check files as they change"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check files or directories (runs all enabled checks)
    Check {
        /// Files or directories to check (default: current directory)
        paths: Vec<PathBuf>,

        /// Auto-fix issues where supported (prettier and eslint only)
        #[arg(long)]
        fix: bool,

        /// Output format
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Checks to run (default: all enabled in config)
        #[arg(long, value_delimiter = ',', value_parser = ["format", "lint", "types", "stubs"])]
        checks: Vec<String>,
    },

    /// Watch a directory and re-check TypeScript/JavaScript files on save
    Watch {
        /// Directory to watch (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Report verbosity
        #[arg(long, default_value = "normal", value_parser = ["minimal", "normal", "detailed"])]
        verbosity: String,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check {
            paths,
            fix,
            format,
            checks,
        } => check::run(&paths, fix, &format, &checks),
        Commands::Watch { path, verbosity } => watch::run(&path, &verbosity),
    }
}
