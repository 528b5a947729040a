//! ESLint linter checker
//!
//! Runs `npx eslint --format=json` and maps the structured payload into
//! normalized issues. Handles both ESLint v8 and v9 (same JSON shape).

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::checkers::external_tool::{is_tool_missing, npx_args, ToolOutcome, ToolRunner};
use crate::checkers::{npx_not_found, timed_out, tool_not_found};
use crate::models::{CheckKind, CheckResult, Issue, Severity};

/// Run eslint over the given paths
pub fn run(runner: &dyn ToolRunner, paths: &[String], fix: bool) -> CheckResult {
    let mut rest = vec!["--format=json".to_string()];
    if fix {
        rest.push("--fix".to_string());
    }
    rest.extend(paths.iter().cloned());
    let args = npx_args("eslint", &rest);

    match runner.invoke("npx", &args) {
        ToolOutcome::NotFound => npx_not_found(CheckKind::Eslint),
        ToolOutcome::TimedOut { .. } => timed_out("eslint", CheckKind::Eslint),
        ToolOutcome::Completed { stdout, stderr, .. } => {
            if is_tool_missing(&stderr) {
                return tool_not_found(
                    "eslint",
                    CheckKind::Eslint,
                    "Install with: npm install --save-dev eslint",
                );
            }

            // --format=json goes to stdout even when lint fails
            parse(stdout.trim())
        }
    }
}

/// Parse `eslint --format=json` output
///
/// The payload is an array of per-file objects with `filePath` and
/// `messages` (ruleId, severity 1=warning/2=error, message, line, column,
/// optional endLine/endColumn and fix/suggestions metadata). Non-JSON input
/// yields a clean result: a structural parse failure usually means a broken
/// eslint config, not broken code.
pub fn parse(output: &str) -> CheckResult {
    if output.is_empty() {
        return CheckResult::clean_for(CheckKind::Eslint);
    }

    let parsed: JsonValue = match serde_json::from_str(output) {
        Ok(v) => v,
        Err(e) => {
            debug!("Skipping non-JSON eslint output: {}", e);
            return CheckResult::clean_for(CheckKind::Eslint);
        }
    };
    let Some(file_results) = parsed.as_array() else {
        return CheckResult::clean_for(CheckKind::Eslint);
    };

    let mut issues = Vec::new();
    for file_result in file_results {
        let file_path = file_result
            .get("filePath")
            .and_then(|f| f.as_str())
            .unwrap_or("");
        let messages = file_result
            .get("messages")
            .and_then(|m| m.as_array())
            .map(|a| a.as_slice())
            .unwrap_or(&[]);

        for msg in messages {
            issues.push(issue_from_message(file_path, msg));
        }
    }

    CheckResult::with_issues(CheckKind::Eslint, issues)
}

fn issue_from_message(file_path: &str, msg: &JsonValue) -> Issue {
    let eslint_severity = msg.get("severity").and_then(|s| s.as_i64()).unwrap_or(2);
    let severity = if eslint_severity == 1 {
        Severity::Warning
    } else {
        Severity::Error
    };

    // A null/absent ruleId (e.g. parse errors) falls back to a generic label
    let rule_id = msg.get("ruleId").and_then(|r| r.as_str()).unwrap_or("eslint");

    let suggestion = if msg.get("fix").is_some_and(|f| !f.is_null()) {
        Some("Auto-fixable with --fix".to_string())
    } else {
        msg.get("suggestions")
            .and_then(|s| s.as_array())
            .and_then(|a| a.first())
            .map(|first| {
                first
                    .get("desc")
                    .and_then(|d| d.as_str())
                    .unwrap_or("Fix available")
                    .to_string()
            })
    };

    Issue {
        file: file_path.to_string(),
        line: msg.get("line").and_then(|l| l.as_u64()).unwrap_or(0) as u32,
        column: msg.get("column").and_then(|c| c.as_u64()).unwrap_or(0) as u32,
        code: rule_id.to_string(),
        message: msg
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("")
            .to_string(),
        severity,
        source: CheckKind::Eslint,
        suggestion,
        end_line: msg.get("endLine").and_then(|l| l.as_u64()).map(|l| l as u32),
        end_column: msg
            .get("endColumn")
            .and_then(|c| c.as_u64())
            .map(|c| c as u32),
    }
}
