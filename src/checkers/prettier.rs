//! Prettier format checker
//!
//! Runs `npx prettier --check` (or `--write` when fixing) and parses the
//! `[warn]` diagnostic lines prettier v3+ emits on stderr.

use tracing::debug;

use crate::checkers::external_tool::{is_tool_missing, npx_args, ToolOutcome, ToolRunner};
use crate::checkers::{npx_not_found, timed_out, tool_not_found};
use crate::models::{CheckKind, CheckResult, Issue, Severity};

/// Run the prettier format check over the given paths
pub fn run(runner: &dyn ToolRunner, paths: &[String], fix: bool) -> CheckResult {
    let mut rest = vec![if fix { "--write" } else { "--check" }.to_string()];
    rest.extend(paths.iter().cloned());
    let args = npx_args("prettier", &rest);

    match runner.invoke("npx", &args) {
        ToolOutcome::NotFound => npx_not_found(CheckKind::Prettier),
        ToolOutcome::TimedOut { .. } => timed_out("prettier", CheckKind::Prettier),
        ToolOutcome::Completed {
            stderr, exit_code, ..
        } => {
            if is_tool_missing(&stderr) {
                return tool_not_found(
                    "prettier",
                    CheckKind::Prettier,
                    "Install with: npm install --save-dev prettier",
                );
            }

            if exit_code != 0 && !fix {
                return parse(&stderr);
            }

            debug!("prettier reported no formatting issues");
            CheckResult::clean_for(CheckKind::Prettier)
        }
    }
}

/// Parse `prettier --check` diagnostic output
///
/// Prettier emits lines like:
/// ```text
/// [warn] src/utils.ts
/// [warn] Code style issues found in 2 files. Run Prettier to fix.
/// ```
/// File lines become issues; the trailing summary line is skipped, and any
/// other chatter is ignored.
pub fn parse(output: &str) -> CheckResult {
    let mut issues = Vec::new();

    for line in output.lines() {
        if line.starts_with("[warn] Code style") {
            continue;
        }
        let Some(file_path) = line.strip_prefix("[warn] ") else {
            continue;
        };
        let file_path = file_path.trim();
        if file_path.is_empty() {
            continue;
        }

        issues.push(Issue {
            file: file_path.to_string(),
            line: 1,
            column: 1,
            code: "FORMAT".to_string(),
            message: "File would be reformatted".to_string(),
            severity: Severity::Warning,
            source: CheckKind::Prettier,
            suggestion: Some("Run with --fix to auto-format".to_string()),
            end_line: None,
            end_column: None,
        });
    }

    CheckResult::with_issues(CheckKind::Prettier, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
[warn] src/utils.ts
[warn] src/components/Button.tsx
[warn] Code style issues found in 2 files. Run Prettier to fix.";

    #[test]
    fn test_parses_files_needing_format() {
        let result = parse(OUTPUT);
        assert_eq!(result.issues.len(), 2);
        assert!(result.issues.iter().all(|i| i.code == "FORMAT"));
        assert!(result.issues.iter().all(|i| i.severity == Severity::Warning));
        assert_eq!(result.issues[0].file, "src/utils.ts");
        assert_eq!(result.issues[1].file, "src/components/Button.tsx");
    }

    #[test]
    fn test_skips_summary_line() {
        let result = parse("[warn] Code style issues found in 5 files. Run Prettier to fix.");
        assert!(result.clean());
    }

    #[test]
    fn test_ignores_unrelated_chatter() {
        let result = parse("Checking formatting...\nDone in 0.4s.");
        assert!(result.clean());
        assert_eq!(result.checks_run, vec![CheckKind::Prettier]);
    }

    #[test]
    fn test_empty_output_means_clean() {
        assert!(parse("").clean());
    }

    #[test]
    fn test_suggestion_mentions_fix() {
        let result = parse("[warn] src/utils.ts");
        let suggestion = result.issues[0].suggestion.as_deref().unwrap();
        assert!(suggestion.contains("--fix"));
    }
}
