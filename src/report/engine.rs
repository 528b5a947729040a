//! Severity-adaptive message formatting
//!
//! Policy, top to bottom: categorize issues by source, choose an icon and
//! message level, render for the configured verbosity tier, suppress
//! unchanged repeat reports, and (optionally) build a context digest for
//! upstream agent consumption.

use std::path::{Path, PathBuf};

use crate::config::ReportConfig;
use crate::models::{CheckKind, CheckResult, Issue, Severity, Verbosity};
use crate::report::state::FileStateTracker;

pub const ICON_CLEAN: &str = "\u{2713}"; // checkmark
pub const ICON_MINOR: &str = "\u{25d0}"; // half circle (warnings/style)
pub const ICON_ERRORS: &str = "\u{25cf}"; // filled circle (errors)
pub const ICON_STUBS: &str = "\u{25d1}"; // half circle reversed (incomplete)

const MAX_DETAIL_LINES: usize = 5;
const MAX_CONTEXT_ISSUES: usize = 10;

/// A rendered per-file report
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Human-facing message (may span multiple lines at higher verbosity)
    pub message: String,
    pub level: Severity,
    /// Digest for injection into an agent/LLM context, when enabled
    pub context: Option<String>,
}

/// Issue counts per display category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Categories {
    type_errors: usize,
    lint_errors: usize,
    style_issues: usize,
    stubs: usize,
}

impl Categories {
    fn from_issues(issues: &[Issue]) -> Self {
        let mut cats = Self::default();
        for issue in issues {
            match issue.source {
                CheckKind::Tsc => cats.type_errors += 1,
                CheckKind::StubCheck => cats.stubs += 1,
                CheckKind::Prettier => cats.style_issues += 1,
                CheckKind::Eslint => {
                    if issue.severity == Severity::Error {
                        cats.lint_errors += 1;
                    } else {
                        cats.style_issues += 1;
                    }
                }
            }
        }
        cats
    }

    fn summary(&self) -> String {
        let mut parts = Vec::new();
        for (count, label) in [
            (self.type_errors, "type error"),
            (self.lint_errors, "lint error"),
            (self.style_issues, "style issue"),
            (self.stubs, "stub"),
        ] {
            if count > 0 {
                parts.push(format!(
                    "{} {}{}",
                    count,
                    label,
                    if count == 1 { "" } else { "s" }
                ));
            }
        }
        if parts.is_empty() {
            "no issues".to_string()
        } else {
            parts.join(", ")
        }
    }

    fn only_stubs(&self) -> bool {
        self.stubs > 0 && self.type_errors == 0 && self.lint_errors == 0
    }
}

/// Renders per-file reports, remembering history across calls
pub struct Reporter {
    verbosity: Verbosity,
    report_level: Severity,
    show_clean: bool,
    auto_inject: bool,
    working_dir: PathBuf,
    states: FileStateTracker,
}

impl Reporter {
    pub fn new(config: &ReportConfig, working_dir: PathBuf) -> Self {
        Self {
            verbosity: config.verbosity,
            report_level: config.report_level,
            show_clean: config.show_clean,
            auto_inject: config.auto_inject,
            working_dir,
            states: FileStateTracker::new(),
        }
    }

    /// Record a check of `file_path` and render its report
    ///
    /// Returns `None` when there is nothing worth saying: a clean pass with
    /// `show_clean` off, or a repeat report with counts identical to the
    /// previous check (at non-detailed verbosity).
    pub fn observe(&self, file_path: &Path, result: &CheckResult) -> Option<FileReport> {
        let mut filtered = result.clone();
        filtered.issues.retain(|i| i.severity <= self.report_level);

        let display_path = self.display_path(file_path);
        let (state, (prev_errors, prev_warnings)) =
            self.states
                .record(file_path, filtered.error_count(), filtered.warning_count());

        if filtered.clean() {
            if !self.show_clean {
                return None;
            }
            let message = clean_message(
                &display_path,
                state.check_count,
                prev_errors,
                prev_warnings,
            );
            return Some(FileReport {
                message,
                level: Severity::Info,
                context: None,
            });
        }

        let unchanged = state.check_count > 1
            && filtered.error_count() == prev_errors
            && filtered.warning_count() == prev_warnings;
        if unchanged && self.verbosity != Verbosity::Detailed {
            return None;
        }

        let (mut message, level) = summary_message(
            &filtered,
            &display_path,
            state.check_count,
            prev_errors,
            prev_warnings,
            self.verbosity,
        );

        if show_details(self.verbosity, filtered.error_count() > 0) {
            message.push('\n');
            message.push_str(&detail_lines(&filtered));
        }

        let context = self
            .auto_inject
            .then(|| context_digest(&display_path, &filtered.issues));

        Some(FileReport {
            message,
            level,
            context,
        })
    }

    /// Shorten a path for display: working-dir-relative, then home-relative,
    /// then bare file name
    fn display_path(&self, path: &Path) -> String {
        if path.is_absolute() {
            if let Ok(rel) = path.strip_prefix(&self.working_dir) {
                return rel.display().to_string();
            }
            if let Some(home) = dirs::home_dir() {
                if let Ok(rel) = path.strip_prefix(&home) {
                    return format!("~/{}", rel.display());
                }
            }
        }
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }
}

fn clean_message(
    display_path: &str,
    check_count: u32,
    prev_errors: usize,
    prev_warnings: usize,
) -> String {
    let prev_total = prev_errors + prev_warnings;
    if check_count > 1 && prev_total > 0 {
        format!(
            "{} {}: clean (was {} issue{})",
            ICON_CLEAN,
            display_path,
            prev_total,
            if prev_total == 1 { "" } else { "s" }
        )
    } else {
        format!("{} {}: clean", ICON_CLEAN, display_path)
    }
}

fn summary_message(
    result: &CheckResult,
    display_path: &str,
    check_count: u32,
    prev_errors: usize,
    prev_warnings: usize,
    verbosity: Verbosity,
) -> (String, Severity) {
    let categories = Categories::from_issues(&result.issues);
    let icon = severity_icon(result, &categories);
    let level = if result.error_count() > 0 {
        Severity::Error
    } else {
        Severity::Warning
    };

    if verbosity == Verbosity::Minimal {
        let total = result.issues.len();
        return (
            format!(
                "{} {}: {} issue{}",
                icon,
                display_path,
                total,
                if total == 1 { "" } else { "s" }
            ),
            level,
        );
    }

    let mut message = format!("{} {}: {}", icon, display_path, categories.summary());

    // Progress note only when the total strictly decreased
    if check_count > 1 {
        let prev_total = prev_errors + prev_warnings;
        let curr_total = result.error_count() + result.warning_count();
        if curr_total < prev_total {
            message.push_str(&format!(" (was {})", prev_total));
        }
    }

    (message, level)
}

fn severity_icon(result: &CheckResult, categories: &Categories) -> &'static str {
    if result.clean() {
        ICON_CLEAN
    } else if categories.only_stubs() {
        ICON_STUBS
    } else if result.error_count() > 0 {
        ICON_ERRORS
    } else {
        ICON_MINOR
    }
}

/// Detail block policy: always at detailed verbosity, never at minimal,
/// only when errors are present at normal
fn show_details(verbosity: Verbosity, has_errors: bool) -> bool {
    match verbosity {
        Verbosity::Detailed => true,
        Verbosity::Minimal => false,
        Verbosity::Normal => has_errors,
    }
}

fn detail_lines(result: &CheckResult) -> String {
    let mut sorted: Vec<&Issue> = result.issues.iter().collect();
    sorted.sort_by_key(|i| (i.severity != Severity::Error, i.line));

    let mut lines = Vec::new();
    for issue in sorted.iter().take(MAX_DETAIL_LINES) {
        let label = if issue.severity == Severity::Error {
            "error"
        } else {
            "warn "
        };
        let msg = if issue.message.chars().count() > 63 {
            let head: String = issue.message.chars().take(60).collect();
            format!("{}...", head)
        } else {
            issue.message.clone()
        };
        lines.push(format!(
            "\u{2502} {}  line {:<4}  {}",
            label, issue.line, msg
        ));
    }
    if sorted.len() > MAX_DETAIL_LINES {
        lines.push(format!(
            "\u{2502} ... and {} more",
            sorted.len() - MAX_DETAIL_LINES
        ));
    }
    lines.join("\n")
}

/// Digest of up to 10 issues for agent context injection
fn context_digest(display_path: &str, issues: &[Issue]) -> String {
    let mut lines = vec![format!("tscheck found issues in {}:", display_path)];
    for issue in issues.iter().take(MAX_CONTEXT_ISSUES) {
        lines.push(format!("- {}", issue.format_short()));
    }
    if issues.len() > MAX_CONTEXT_ISSUES {
        lines.push(format!(
            "  ... and {} more issues",
            issues.len() - MAX_CONTEXT_ISSUES
        ));
    }
    lines.join("\n")
}
