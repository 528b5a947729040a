//! Checkers for TypeScript/JavaScript quality tools
//!
//! Each checker wraps one tool and follows the same pattern:
//! 1. Build the tool invocation and hand it to a [`external_tool::ToolRunner`]
//! 2. Parse the raw output into normalized [`Issue`]s with a pure function
//! 3. Return a [`CheckResult`] tagged with the checker's [`CheckKind`]
//!
//! Parsers never fail: malformed or empty tool output yields a clean result
//! for that tool, and tool-infrastructure problems (missing executable,
//! timeout) become synthetic `TOOL-NOT-FOUND` / `TIMEOUT` issues instead of
//! errors. Adding a tool means adding a parser module and a `CheckKind`
//! variant, not a type hierarchy.

pub mod eslint;
pub mod external_tool;
pub mod prettier;
pub mod stubs;
pub mod tsc;

use std::path::{Path, PathBuf};

use crate::models::{CheckKind, CheckResult, Issue, Severity, ALL_EXTENSIONS};

/// Synthetic result for a tool that is not installed
pub(crate) fn tool_not_found(tool: &str, kind: CheckKind, install_hint: &str) -> CheckResult {
    CheckResult::with_issues(
        kind,
        vec![Issue {
            file: String::new(),
            line: 0,
            column: 0,
            code: "TOOL-NOT-FOUND".to_string(),
            message: format!("{} not found. {}", tool, install_hint),
            severity: Severity::Error,
            source: kind,
            suggestion: None,
            end_line: None,
            end_column: None,
        }],
    )
}

/// Synthetic result for when npx itself is missing
pub(crate) fn npx_not_found(kind: CheckKind) -> CheckResult {
    tool_not_found("npx", kind, "Install Node.js: https://nodejs.org/")
}

/// Synthetic result for a timed-out invocation
pub(crate) fn timed_out(tool: &str, kind: CheckKind) -> CheckResult {
    CheckResult::with_issues(
        kind,
        vec![Issue {
            file: String::new(),
            line: 0,
            column: 0,
            code: "TIMEOUT".to_string(),
            message: format!("{} check timed out", tool),
            severity: Severity::Error,
            source: kind,
            suggestion: None,
            end_line: None,
            end_column: None,
        }],
    )
}

/// Walk source files under `root`, respecting .gitignore, filtered to the
/// given extensions
pub fn walk_source_files<'a>(
    root: &Path,
    extensions: &'a [&'a str],
) -> impl Iterator<Item = PathBuf> + 'a {
    use ignore::WalkBuilder;

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false);

    builder.build().filter_map(move |entry| {
        let entry = entry.ok()?;
        let path = entry.path();

        if !path.is_file() {
            return None;
        }

        let ext = path.extension()?.to_str()?;
        if !extensions.contains(&ext) {
            return None;
        }

        Some(path.to_path_buf())
    })
}

/// Check whether a path matches any exclude pattern
///
/// Patterns ending in `/**` match any path containing the directory prefix;
/// other patterns match as plain substrings.
pub fn is_excluded(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        if let Some(dir) = pattern.strip_suffix("/**") {
            path_str.contains(dir)
        } else {
            path_str.contains(pattern.as_str())
        }
    })
}

/// True if the path has a TypeScript or JavaScript extension
pub fn has_checkable_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ALL_EXTENSIONS.contains(&ext))
}

/// Count TypeScript/JavaScript files in the given paths, for reporting
pub fn count_source_files(paths: &[PathBuf]) -> usize {
    paths
        .iter()
        .map(|p| {
            if p.is_file() {
                usize::from(has_checkable_extension(p))
            } else if p.is_dir() {
                walk_source_files(p, ALL_EXTENSIONS).count()
            } else {
                0
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_patterns() {
        let patterns = vec!["node_modules/**".to_string(), ".min.js".to_string()];
        assert!(is_excluded(
            Path::new("web/node_modules/react/index.js"),
            &patterns
        ));
        assert!(is_excluded(Path::new("dist/app.min.js"), &patterns));
        assert!(!is_excluded(Path::new("src/app.ts"), &patterns));
    }

    #[test]
    fn test_checkable_extensions() {
        assert!(has_checkable_extension(Path::new("a.ts")));
        assert!(has_checkable_extension(Path::new("a.tsx")));
        assert!(has_checkable_extension(Path::new("a.cjs")));
        assert!(!has_checkable_extension(Path::new("a.py")));
        assert!(!has_checkable_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_tool_not_found_shape() {
        let result = npx_not_found(CheckKind::Eslint);
        assert_eq!(result.issues.len(), 1);
        let issue = &result.issues[0];
        assert_eq!(issue.code, "TOOL-NOT-FOUND");
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.file, "");
        assert!(issue.message.contains("nodejs.org"));
        assert_eq!(result.checks_run, vec![CheckKind::Eslint]);
    }
}
