//! tscheck - normalized TypeScript/JavaScript quality checks
//!
//! tscheck runs prettier (formatting), eslint (linting), tsc (type
//! checking), and a heuristic stub scanner over TypeScript/JavaScript
//! sources, normalizing their heterogeneous output into one issue model.
//! Aggregated results feed an adaptive reporting layer that tracks per-file
//! issue history across repeated checks, so a watch session can surface
//! progress ("was 4 issues, now clean") without repeating itself.

#![allow(dead_code)]

pub mod checker;
pub mod checkers;
pub mod cli;
pub mod config;
pub mod models;
pub mod report;

use std::path::PathBuf;

pub use checker::Checker;
pub use config::{load_config, CheckConfig, ConfigOverrides};
pub use models::{CheckKind, CheckResult, Issue, Severity, Verbosity};
pub use report::{FileReport, Reporter};

/// Check files or directories with an optional explicit config
///
/// Without a config, configuration is loaded from the nearest
/// `package.json` plus `TSCHECK_*` environment overrides.
pub fn check_files(paths: &[PathBuf], config: Option<CheckConfig>, fix: bool) -> CheckResult {
    let config = config.unwrap_or_else(|| load_config(None, None));
    Checker::new(config).check_files(paths, fix)
}

/// Check a source string under a virtual filename
pub fn check_content(
    content: &str,
    filename: &str,
    config: Option<CheckConfig>,
) -> anyhow::Result<CheckResult> {
    let config = config.unwrap_or_else(|| load_config(None, None));
    Checker::new(config).check_content(content, filename)
}
