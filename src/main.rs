//! tscheck - normalized TypeScript/JavaScript quality checks
//!
//! One command for prettier, eslint, tsc, and stub detection, with a
//! normalized issue model and a live watch mode that tracks per-file
//! progress across edits.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tscheck::cli;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = cli::Cli::parse();
    cli::run(cli)
}
