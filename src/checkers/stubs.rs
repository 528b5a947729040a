//! Stub and placeholder scanner
//!
//! Unlike the other checkers this one reads source content directly: every
//! line of every scanned file is tested against the configured stub patterns
//! (TODO/FIXME/HACK comments, not-implemented throws, bare suppression
//! directives), with exemptions for the places such markers are legitimate.

use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::checkers::{has_checkable_extension, is_excluded, walk_source_files};
use crate::config::CheckConfig;
use crate::models::{CheckKind, CheckResult, Issue, Severity, ALL_EXTENSIONS};

/// Path fragments that mark test and mock files
const TEST_FILE_MARKERS: &[&str] = &[".test.", ".spec.", "__tests__", "__mocks__"];

pub struct StubScanner {
    patterns: Vec<(Regex, String)>,
    exclude_patterns: Vec<String>,
}

impl StubScanner {
    /// Compile the configured patterns (case-insensitive); invalid patterns
    /// are skipped with a warning
    pub fn new(config: &CheckConfig) -> Self {
        let patterns = config
            .stub_patterns
            .iter()
            .filter_map(|p| {
                match RegexBuilder::new(&p.pattern).case_insensitive(true).build() {
                    Ok(regex) => Some((regex, p.description.clone())),
                    Err(e) => {
                        warn!("Skipping invalid stub pattern {:?}: {}", p.pattern, e);
                        None
                    }
                }
            })
            .collect();

        Self {
            patterns,
            exclude_patterns: config.exclude_patterns.clone(),
        }
    }

    /// Scan files and directories for stub markers
    pub fn scan(&self, paths: &[PathBuf]) -> CheckResult {
        let mut issues = Vec::new();

        for path in paths {
            if path.is_file() {
                if has_checkable_extension(path) {
                    issues.extend(self.scan_file(path));
                }
            } else if path.is_dir() {
                for file in walk_source_files(path, ALL_EXTENSIONS) {
                    if is_excluded(&file, &self.exclude_patterns) {
                        continue;
                    }
                    issues.extend(self.scan_file(&file));
                }
            }
        }

        debug!("stub scan produced {} issues", issues.len());
        CheckResult::with_issues(CheckKind::StubCheck, issues)
    }

    fn scan_file(&self, path: &Path) -> Vec<Issue> {
        match std::fs::read_to_string(path) {
            Ok(content) => self.scan_source(path, &content),
            Err(_) => Vec::new(),
        }
    }

    /// Scan in-memory source content attributed to `path`
    pub fn scan_source(&self, path: &Path, content: &str) -> Vec<Issue> {
        let lines: Vec<&str> = content.lines().collect();
        let mut issues = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            for (pattern, description) in &self.patterns {
                if !pattern.is_match(line) {
                    continue;
                }
                if is_exempt(path, idx, line, &lines) {
                    continue;
                }

                let excerpt: String = line.trim().chars().take(60).collect();
                issues.push(Issue {
                    file: path.to_string_lossy().to_string(),
                    line: (idx + 1) as u32,
                    column: 1,
                    code: "STUB".to_string(),
                    message: format!("{}: {}", description, excerpt),
                    severity: Severity::Warning,
                    source: CheckKind::StubCheck,
                    suggestion: Some("Remove placeholder or implement functionality".to_string()),
                    end_line: None,
                    end_column: None,
                });
            }
        }

        issues
    }
}

/// Whether a matched line is a legitimate marker rather than a placeholder
///
/// `idx` is the zero-based index of `line` within `lines`.
fn is_exempt(path: &Path, idx: usize, line: &str, lines: &[&str]) -> bool {
    // Test and mock files are allowed unrestricted placeholders
    let path_lower = path.to_string_lossy().to_lowercase();
    if TEST_FILE_MARKERS.iter().any(|m| path_lower.contains(m)) {
        return true;
    }

    // @ts-expect-error with an explanation after it is legitimate; the bare
    // directive is still flagged
    if line.contains("@ts-expect-error") && !line.trim().ends_with("@ts-expect-error") {
        return true;
    }

    // @ts-ignore in ambient declaration files (.d.ts) is sometimes necessary
    if line.contains("@ts-ignore")
        && path.extension().and_then(|e| e.to_str()) == Some("ts")
        && path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.ends_with(".d"))
    {
        return true;
    }

    // A not-implemented throw directly under an abstract declaration is an
    // abstract-method stub, not a placeholder
    let trimmed = line.trim();
    if trimmed == "throw new Error('not implemented');"
        || trimmed == "throw new Error(\"not implemented\");"
    {
        let start = idx.saturating_sub(2);
        if lines[start..idx].iter().any(|l| l.contains("abstract")) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> StubScanner {
        StubScanner::new(&CheckConfig::default())
    }

    #[test]
    fn test_finds_todo_fixme_hack() {
        let source = "function f() {\n  // TODO: fix\n  // FIXME: handle edge case\n  // HACK: workaround\n}\n";
        let issues = scanner().scan_source(Path::new("src/app.ts"), source);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.code == "STUB"));
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert_eq!(issues[0].line, 2);
    }

    #[test]
    fn test_message_carries_description_and_excerpt() {
        let issues = scanner().scan_source(Path::new("src/app.ts"), "// TODO: fix\n");
        assert_eq!(issues[0].message, "TODO comment: // TODO: fix");
    }

    #[test]
    fn test_long_lines_truncated() {
        let source = format!("// TODO: {}\n", "x".repeat(200));
        let issues = scanner().scan_source(Path::new("src/app.ts"), &source);
        let excerpt = issues[0].message.split(": ").skip(1).collect::<Vec<_>>().join(": ");
        assert!(excerpt.len() <= 60);
    }

    #[test]
    fn test_finds_not_implemented_throw() {
        let source = "function f() {\n  throw new Error('not implemented');\n}\n";
        let issues = scanner().scan_source(Path::new("src/app.ts"), source);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_abstract_stub_exempt() {
        let source = "abstract class Base {\n  method() {\n    throw new Error('not implemented');\n  }\n}\n";
        let issues = scanner().scan_source(Path::new("src/base.ts"), source);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_finds_bare_suppression_directives() {
        let source = "// @ts-ignore\nconst a = 1;\n// @ts-expect-error\nconst b = 2;\n";
        let issues = scanner().scan_source(Path::new("src/app.ts"), source);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_explained_expect_error_not_flagged() {
        let source = "// @ts-expect-error upstream types are wrong for this overload\nconst b = 2;\n";
        let issues = scanner().scan_source(Path::new("src/app.ts"), source);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_ts_ignore_in_declaration_file_exempt() {
        let source = "// @ts-ignore\ndeclare const x: unknown;\n";
        assert!(scanner()
            .scan_source(Path::new("types/global.d.ts"), source)
            .is_empty());
        assert!(!scanner()
            .scan_source(Path::new("src/app.ts"), source)
            .is_empty());
    }

    #[test]
    fn test_test_files_exempt() {
        let source = "// TODO: flesh this out\n";
        for path in [
            "src/app.test.ts",
            "src/app.spec.ts",
            "src/__tests__/app.ts",
            "src/__mocks__/api.ts",
        ] {
            assert!(
                scanner().scan_source(Path::new(path), source).is_empty(),
                "expected {path} to be exempt"
            );
        }
        assert!(!scanner().scan_source(Path::new("src/app.ts"), source).is_empty());
    }

    #[test]
    fn test_patterns_case_insensitive() {
        let issues = scanner().scan_source(Path::new("src/app.ts"), "// todo: later\n");
        assert_eq!(issues.len(), 1);
    }
}
