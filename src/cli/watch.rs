//! `tscheck watch` - live checks on file changes
//!
//! Watches a directory and re-checks TypeScript/JavaScript files as they are
//! saved. Results flow through the stateful [`Reporter`], so a file edited
//! repeatedly only reports when something changed, and a fixed file gets a
//! "clean (was N issues)" note.

use anyhow::{Context, Result};
use console::style;
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::warn;

use crate::checker::Checker;
use crate::checkers::is_excluded;
use crate::config::{find_package_json, load_config};
use crate::models::{Severity, Verbosity};
use crate::report::{FileReport, Reporter};

pub fn run(path: &Path, verbosity: &str) -> Result<()> {
    let watch_root = std::fs::canonicalize(path)
        .with_context(|| format!("resolving watch path {}", path.display()))?;

    let manifest = find_package_json(Some(&watch_root));
    let mut config = load_config(manifest.as_deref(), None);
    config.report.verbosity = parse_verbosity(verbosity);

    let patterns = build_patterns(&config.report.file_patterns)?;
    let exclude_patterns = config.exclude_patterns.clone();
    let reporter = Reporter::new(&config.report, watch_root.clone());
    let checker = Checker::new(config);

    println!(
        "\nWatching {} for changes...\n",
        style(watch_root.display()).cyan()
    );
    println!("  {} Save a file to trigger checks", style("->").dim());
    println!("  {} Press Ctrl+C to stop\n", style("->").dim());

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        None,
        move |result: DebounceEventResult| {
            if let Ok(events) = result {
                let _ = tx.send(events);
            }
        },
    )?;
    debouncer.watch(&watch_root, RecursiveMode::Recursive)?;

    while let Ok(events) = rx.recv() {
        // Unique changed source files, in a stable order
        let changed: BTreeSet<PathBuf> = events
            .iter()
            .flat_map(|event| event.paths.iter())
            .filter(|p| {
                p.is_file()
                    && matches_patterns(p, &patterns)
                    && !is_excluded(p, &exclude_patterns)
            })
            .cloned()
            .collect();

        for file in changed {
            let result = checker.check_files(std::slice::from_ref(&file), false);
            if let Some(report) = reporter.observe(&file, &result) {
                print_report(&report);
            }
        }
    }

    Ok(())
}

fn parse_verbosity(value: &str) -> Verbosity {
    match value {
        "minimal" => Verbosity::Minimal,
        "detailed" => Verbosity::Detailed,
        _ => Verbosity::Normal,
    }
}

fn build_patterns(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("Skipping invalid file pattern {:?}: {}", pattern, e),
        }
    }
    builder.build().context("building file pattern set")
}

/// Match against the bare file name (patterns like `*.ts`) or the full path
fn matches_patterns(path: &Path, patterns: &GlobSet) -> bool {
    if let Some(name) = path.file_name() {
        if patterns.is_match(name) {
            return true;
        }
    }
    patterns.is_match(path)
}

fn print_report(report: &FileReport) {
    let mut lines = report.message.lines();
    if let Some(first) = lines.next() {
        let styled = match report.level {
            Severity::Error => style(first).red(),
            Severity::Warning => style(first).yellow(),
            Severity::Info => style(first).green(),
        };
        println!("{}", styled);
    }
    for line in lines {
        println!("{}", style(line).dim());
    }
}
