//! TypeScript compiler type checker
//!
//! Runs `npx tsc --noEmit --pretty false` project-wide and parses the
//! line-oriented diagnostics. tsc needs tsconfig.json context, so the
//! invocation always covers the whole project regardless of which paths
//! triggered the check.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::checkers::external_tool::{is_tool_missing, npx_args, ToolOutcome, ToolRunner};
use crate::checkers::{npx_not_found, timed_out, tool_not_found};
use crate::models::{CheckKind, CheckResult, Issue, Severity};

static TSC_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Diagnostic shape: `path(line,col): severity TSnnnn: message`
fn tsc_pattern() -> &'static Regex {
    TSC_PATTERN.get_or_init(|| {
        Regex::new(r"^(.+?)\((\d+),(\d+)\):\s+(error|warning)\s+(TS\d+):\s+(.+)$")
            .expect("valid regex")
    })
}

/// Run the TypeScript compiler type check
pub fn run(runner: &dyn ToolRunner) -> CheckResult {
    let args = npx_args(
        "tsc",
        &[
            "--noEmit".to_string(),
            "--pretty".to_string(),
            "false".to_string(),
        ],
    );

    match runner.invoke("npx", &args) {
        ToolOutcome::NotFound => npx_not_found(CheckKind::Tsc),
        ToolOutcome::TimedOut { .. } => timed_out("tsc", CheckKind::Tsc),
        ToolOutcome::Completed { stdout, stderr, .. } => {
            if is_tool_missing(&stderr) {
                return tool_not_found(
                    "typescript",
                    CheckKind::Tsc,
                    "Install with: npm install --save-dev typescript",
                );
            }

            // Diagnostics land on stdout with --pretty false
            let output = if stdout.is_empty() { &stderr } else { &stdout };
            parse(output)
        }
    }
}

/// Parse `tsc --noEmit --pretty false` output; non-matching lines are ignored
pub fn parse(output: &str) -> CheckResult {
    let pattern = tsc_pattern();

    let issues: Vec<Issue> = output
        .lines()
        .filter_map(|line| {
            let caps = pattern.captures(line.trim())?;
            let file = caps.get(1)?.as_str().to_string();
            let line_num: u32 = caps.get(2)?.as_str().parse().ok()?;
            let column: u32 = caps.get(3)?.as_str().parse().ok()?;
            let severity = if caps.get(4)?.as_str() == "error" {
                Severity::Error
            } else {
                Severity::Warning
            };
            let code = caps.get(5)?.as_str().to_string();
            let message = caps.get(6)?.as_str().to_string();

            Some(Issue {
                file,
                line: line_num,
                column,
                code,
                message,
                severity,
                source: CheckKind::Tsc,
                suggestion: None,
                end_line: None,
                end_column: None,
            })
        })
        .collect();

    debug!("tsc reported {} diagnostics", issues.len());
    CheckResult::with_issues(CheckKind::Tsc, issues)
}
