//! Core data models for tscheck
//!
//! These models are shared by every checker and the reporting layer:
//! normalized issues, aggregated check results, and the severity and
//! check-kind vocabularies.

use serde::{Deserialize, Serialize};

/// TypeScript file extensions
pub const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// JavaScript file extensions
pub const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// All extensions the checkers care about
pub const ALL_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Severity levels for issues
///
/// Ordered `Error < Warning < Info` so that threshold filtering
/// (`severity <= report_level`) keeps the more severe levels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Report verbosity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Minimal,
    #[default]
    Normal,
    Detailed,
}

/// Which checker produced an issue
///
/// Doubles as the `checks_run` vocabulary on [`CheckResult`]. Adding a new
/// tool means adding a variant and a parser module, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    Prettier,
    Eslint,
    Tsc,
    StubCheck,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Prettier => "prettier",
            CheckKind::Eslint => "eslint",
            CheckKind::Tsc => "tsc",
            CheckKind::StubCheck => "stub-check",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized issue from any checker
///
/// `file` is empty for tool-level failures (missing tool, timeout), and
/// `line`/`column` are 0 when not applicable. `code` carries the producing
/// tool's vocabulary: a tsc code like `TS2322`, an eslint rule id, or one of
/// the reserved sentinels `FORMAT`, `STUB`, `TOOL-NOT-FOUND`, `TIMEOUT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub source: CheckKind,
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl Issue {
    /// Format as `file:line:column`
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }

    /// Format as a short one-liner
    pub fn format_short(&self) -> String {
        format!("{}: [{}] {}", self.location(), self.code, self.message)
    }
}

/// Aggregated outcome of one check invocation
///
/// Constructed fresh per checker, combined pairwise via [`CheckResult::merge`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResult {
    pub issues: Vec<Issue>,
    pub files_checked: usize,
    pub checks_run: Vec<CheckKind>,
}

impl CheckResult {
    /// An empty (clean) result for a single check kind
    pub fn clean_for(kind: CheckKind) -> Self {
        Self {
            issues: Vec::new(),
            files_checked: 0,
            checks_run: vec![kind],
        }
    }

    /// A result holding the given issues for a single check kind
    pub fn with_issues(kind: CheckKind, issues: Vec<Issue>) -> Self {
        Self {
            issues,
            files_checked: 0,
            checks_run: vec![kind],
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Info)
            .count()
    }

    /// True if no issues at all
    pub fn clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// True if no errors (warnings are acceptable)
    pub fn success(&self) -> bool {
        self.error_count() == 0
    }

    /// Exit code: 0 = clean, 1 = warnings only, 2 = errors
    pub fn exit_code(&self) -> i32 {
        if self.error_count() > 0 {
            2
        } else if self.warning_count() > 0 {
            1
        } else {
            0
        }
    }

    /// Human-readable summary line
    pub fn summary(&self) -> String {
        if self.clean() {
            return format!("All checks passed ({} files)", self.files_checked);
        }

        let mut parts = Vec::new();
        let errors = self.error_count();
        let warnings = self.warning_count();
        let infos = self.info_count();
        if errors > 0 {
            parts.push(format!("{} error{}", errors, plural(errors)));
        }
        if warnings > 0 {
            parts.push(format!("{} warning{}", warnings, plural(warnings)));
        }
        if infos > 0 {
            parts.push(format!("{} info", infos));
        }

        format!("Found {} in {} files", parts.join(", "), self.files_checked)
    }

    /// Merge another result into this one
    ///
    /// Issues concatenate in invocation order, `files_checked` takes the max
    /// (the counts cover possibly-overlapping path sets), and `checks_run`
    /// unions, keeping first-occurrence order for determinism.
    pub fn merge(mut self, other: CheckResult) -> CheckResult {
        self.issues.extend(other.issues);
        self.files_checked = self.files_checked.max(other.files_checked);
        for kind in other.checks_run {
            if !self.checks_run.contains(&kind) {
                self.checks_run.push(kind);
            }
        }
        self
    }

    /// Structured payload for machine consumption
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "success": self.success(),
            "clean": self.clean(),
            "summary": self.summary(),
            "files_checked": self.files_checked,
            "checks_run": self.checks_run,
            "error_count": self.error_count(),
            "warning_count": self.warning_count(),
            "issues": self.issues,
        })
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
