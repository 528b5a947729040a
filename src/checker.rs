//! Check orchestration
//!
//! [`Checker`] folds the enabled checkers over a set of paths into one
//! [`CheckResult`], in the fixed order format -> lint -> types -> stubs.
//! Content checks go through a scoped temporary file with the type checker
//! disabled (tsc needs project-wide tsconfig context that an in-memory
//! snippet cannot supply).

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::checkers::external_tool::{ProcessRunner, ToolRunner};
use crate::checkers::stubs::StubScanner;
use crate::checkers::{count_source_files, eslint, prettier, tsc};
use crate::config::CheckConfig;
use crate::models::CheckResult;

/// Runs the enabled checks and aggregates their results
pub struct Checker {
    config: CheckConfig,
    runner: Arc<dyn ToolRunner>,
}

impl Checker {
    pub fn new(config: CheckConfig) -> Self {
        Self {
            config,
            runner: Arc::new(ProcessRunner::new()),
        }
    }

    /// Use a custom tool runner (tests substitute canned outcomes here)
    pub fn with_runner(config: CheckConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Run all enabled checks on the given paths
    ///
    /// An empty path list checks the current directory. `fix` asks prettier
    /// and eslint to auto-remediate; tsc and the stub scan ignore it.
    pub fn check_files(&self, paths: &[PathBuf], fix: bool) -> CheckResult {
        let paths: Vec<PathBuf> = if paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            paths.to_vec()
        };

        let path_strs: Vec<String> = paths
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();

        let mut result = CheckResult {
            files_checked: count_source_files(&paths),
            ..Default::default()
        };

        if self.config.enable_prettier {
            result = result.merge(prettier::run(self.runner.as_ref(), &path_strs, fix));
        }

        if self.config.enable_eslint {
            result = result.merge(eslint::run(self.runner.as_ref(), &path_strs, fix));
        }

        if self.config.enable_tsc {
            result = result.merge(tsc::run(self.runner.as_ref()));
        }

        if self.config.enable_stub_check {
            let scanner = StubScanner::new(&self.config);
            result = result.merge(scanner.scan(&paths));
        }

        info!(
            "Checked {} files: {} errors, {} warnings",
            result.files_checked,
            result.error_count(),
            result.warning_count()
        );
        result
    }

    /// Check a source string under a virtual filename
    ///
    /// The content is materialized to a temporary file which is removed on
    /// every exit path; resulting issue paths are rewritten back to the
    /// virtual filename.
    pub fn check_content(&self, content: &str, filename: &str) -> Result<CheckResult> {
        let suffix = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_else(|| ".ts".to_string());

        let mut temp = tempfile::Builder::new()
            .prefix("tscheck-")
            .suffix(&suffix)
            .tempfile()
            .context("creating temporary file for content check")?;
        temp.write_all(content.as_bytes())
            .context("writing content to temporary file")?;
        temp.flush()?;

        let temp_path = temp.path().to_path_buf();
        let temp_str = temp_path.to_string_lossy().to_string();

        // Derived config for this call only; the caller's config is untouched
        let inner = Checker::with_runner(
            CheckConfig {
                enable_tsc: false,
                ..self.config.clone()
            },
            Arc::clone(&self.runner),
        );

        let mut result = inner.check_files(std::slice::from_ref(&temp_path), false);

        for issue in &mut result.issues {
            if issue.file == temp_str {
                issue.file = filename.to_string();
            }
        }

        // `temp` drops here, deleting the file
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::external_tool::ToolOutcome;
    use crate::models::CheckKind;

    /// Runner that answers every invocation with a canned outcome
    struct CannedRunner(ToolOutcome);

    impl ToolRunner for CannedRunner {
        fn invoke(&self, _command: &str, _args: &[String]) -> ToolOutcome {
            self.0.clone()
        }
    }

    fn tools_disabled() -> CheckConfig {
        CheckConfig {
            enable_prettier: false,
            enable_eslint: false,
            enable_tsc: false,
            ..CheckConfig::default()
        }
    }

    #[test]
    fn test_check_content_rewrites_virtual_filename() {
        let checker = Checker::new(tools_disabled());
        let result = checker
            .check_content("// TODO: finish this\nexport const x = 1;\n", "snippet.ts")
            .unwrap();

        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].file, "snippet.ts");
        assert_eq!(result.issues[0].code, "STUB");
    }

    #[test]
    fn test_check_content_skips_tsc() {
        // Even with every tool "available", content checks must not run tsc
        let config = CheckConfig {
            enable_prettier: false,
            enable_eslint: false,
            ..CheckConfig::default()
        };
        let runner = Arc::new(CannedRunner(ToolOutcome::Completed {
            stdout: "src/app.ts(1,1): error TS2322: should never appear".to_string(),
            stderr: String::new(),
            exit_code: 2,
        }));
        let checker = Checker::with_runner(config, runner);
        let result = checker.check_content("export const x = 1;\n", "snippet.ts").unwrap();

        assert!(!result.checks_run.contains(&CheckKind::Tsc));
        assert!(result.clean());
    }

    #[test]
    fn test_checks_run_reflects_enabled_checks() {
        let runner = Arc::new(CannedRunner(ToolOutcome::Completed {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        }));
        let checker = Checker::with_runner(CheckConfig::default(), runner);
        let dir = tempfile::tempdir().unwrap();
        let result = checker.check_files(&[dir.path().to_path_buf()], false);

        assert_eq!(
            result.checks_run,
            vec![
                CheckKind::Prettier,
                CheckKind::Eslint,
                CheckKind::Tsc,
                CheckKind::StubCheck
            ]
        );
        assert!(result.clean());
    }

    #[test]
    fn test_missing_npx_becomes_issues_not_errors() {
        let runner = Arc::new(CannedRunner(ToolOutcome::NotFound));
        let config = CheckConfig {
            enable_stub_check: false,
            ..CheckConfig::default()
        };
        let checker = Checker::with_runner(config, runner);
        let dir = tempfile::tempdir().unwrap();
        let result = checker.check_files(&[dir.path().to_path_buf()], false);

        assert_eq!(result.issues.len(), 3);
        assert!(result.issues.iter().all(|i| i.code == "TOOL-NOT-FOUND"));
        assert!(!result.success());
    }

    #[test]
    fn test_timeout_becomes_issue_and_other_checks_still_run() {
        let runner = Arc::new(CannedRunner(ToolOutcome::TimedOut { limit_secs: 120 }));
        let config = CheckConfig {
            enable_eslint: false,
            enable_tsc: false,
            ..CheckConfig::default()
        };
        let checker = Checker::with_runner(config, runner);
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.ts"), "// TODO: later\n").unwrap();
        let result = checker.check_files(&[dir.path().to_path_buf()], false);

        assert!(result.issues.iter().any(|i| i.code == "TIMEOUT"));
        assert!(result.issues.iter().any(|i| i.code == "STUB"));
        assert_eq!(
            result.checks_run,
            vec![CheckKind::Prettier, CheckKind::StubCheck]
        );
    }
}
