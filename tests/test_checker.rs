//! Integration tests for parsing, aggregation, and content checks

use std::sync::Arc;

use tscheck::checker::Checker;
use tscheck::checkers::external_tool::{ToolOutcome, ToolRunner};
use tscheck::checkers::{eslint, prettier, tsc};
use tscheck::{CheckConfig, CheckKind, CheckResult, Issue, Severity};

/// Runner that answers every invocation with the same canned outcome
struct CannedRunner(ToolOutcome);

impl ToolRunner for CannedRunner {
    fn invoke(&self, _command: &str, _args: &[String]) -> ToolOutcome {
        self.0.clone()
    }
}

fn clean_outcome() -> ToolOutcome {
    ToolOutcome::Completed {
        stdout: String::new(),
        stderr: String::new(),
        exit_code: 0,
    }
}

fn make_issue(severity: Severity, source: CheckKind) -> Issue {
    Issue {
        file: "src/app.ts".to_string(),
        line: 1,
        column: 1,
        code: "X".to_string(),
        message: "test issue".to_string(),
        severity,
        source,
        suggestion: None,
        end_line: None,
        end_column: None,
    }
}

#[test]
fn prettier_fixture_produces_two_format_warnings() {
    let output = "\
[warn] src/utils.ts
[warn] src/components/Button.tsx
[warn] Code style issues found in 2 files. Run Prettier to fix.";

    let result = prettier::parse(output);
    assert_eq!(result.issues.len(), 2);
    assert!(result.issues.iter().all(|i| i.code == "FORMAT"));
    assert!(result
        .issues
        .iter()
        .all(|i| i.severity == Severity::Warning));
    assert_eq!(result.issues[0].file, "src/utils.ts");
    assert_eq!(result.issues[1].file, "src/components/Button.tsx");
    assert_eq!(result.issues[0].line, 1);
    assert_eq!(result.issues[0].column, 1);
}

#[test]
fn eslint_fixture_maps_severities_and_ranges() {
    let payload = serde_json::json!([
        {
            "filePath": "src/app.ts",
            "messages": [
                {
                    "ruleId": "prefer-const",
                    "severity": 1,
                    "message": "'x' is never reassigned. Use 'const' instead.",
                    "line": 4,
                    "column": 5,
                    "endLine": 4,
                    "endColumn": 6
                },
                {
                    "ruleId": "no-undef",
                    "severity": 2,
                    "message": "'foo' is not defined.",
                    "line": 9,
                    "column": 3
                }
            ]
        }
    ])
    .to_string();

    let result = eslint::parse(&payload);
    assert_eq!(result.issues.len(), 2);
    assert_eq!(result.warning_count(), 1);
    assert_eq!(result.error_count(), 1);

    let warning = &result.issues[0];
    assert_eq!(warning.file, "src/app.ts");
    assert_eq!(warning.code, "prefer-const");
    assert_eq!((warning.line, warning.column), (4, 5));
    assert_eq!((warning.end_line, warning.end_column), (Some(4), Some(6)));

    assert!(eslint::parse("").clean());
    assert!(eslint::parse("not json at all").clean());
}

#[test]
fn tsc_fixture_parses_location_and_code() {
    let result = tsc::parse(
        "src/app.ts(10,5): error TS2322: Type 'string' is not assignable to type 'number'.",
    );
    assert_eq!(result.issues.len(), 1);
    let issue = &result.issues[0];
    assert_eq!(issue.file, "src/app.ts");
    assert_eq!(issue.line, 10);
    assert_eq!(issue.column, 5);
    assert_eq!(issue.code, "TS2322");
    assert_eq!(issue.severity, Severity::Error);
}

#[test]
fn parsing_is_idempotent() {
    let output = "src/a.ts(1,2): error TS2304: Cannot find name 'x'.";
    assert_eq!(tsc::parse(output).issues, tsc::parse(output).issues);

    let prettier_output = "[warn] src/a.ts";
    assert_eq!(
        prettier::parse(prettier_output).issues,
        prettier::parse(prettier_output).issues
    );
}

#[test]
fn merge_is_associative_on_counts_and_kinds() {
    let mut a = CheckResult::with_issues(
        CheckKind::Prettier,
        vec![make_issue(Severity::Warning, CheckKind::Prettier)],
    );
    a.files_checked = 2;
    let mut b = CheckResult::with_issues(
        CheckKind::Eslint,
        vec![make_issue(Severity::Error, CheckKind::Eslint)],
    );
    b.files_checked = 7;
    let mut c = CheckResult::with_issues(
        CheckKind::Tsc,
        vec![
            make_issue(Severity::Error, CheckKind::Tsc),
            make_issue(Severity::Warning, CheckKind::Tsc),
        ],
    );
    c.files_checked = 4;

    let left = a.clone().merge(b.clone()).merge(c.clone());
    let right = a.merge(b.merge(c));

    assert_eq!(left.files_checked, 7);
    assert_eq!(right.files_checked, 7);
    assert_eq!(left.issues.len(), 4);
    assert_eq!(right.issues.len(), 4);
    assert_eq!(left.error_count(), right.error_count());
    assert_eq!(left.checks_run, right.checks_run);
}

#[test]
fn exit_code_law_holds() {
    let clean = CheckResult::default();
    assert_eq!(clean.exit_code(), 0);
    assert!(clean.success());
    assert!(clean.clean());

    let warnings = CheckResult::with_issues(
        CheckKind::Eslint,
        vec![
            make_issue(Severity::Warning, CheckKind::Eslint),
            make_issue(Severity::Warning, CheckKind::Eslint),
        ],
    );
    assert_eq!(warnings.exit_code(), 1);
    assert!(warnings.success());
    assert!(!warnings.clean());

    let errors = CheckResult::with_issues(
        CheckKind::Tsc,
        vec![
            make_issue(Severity::Error, CheckKind::Tsc),
            make_issue(Severity::Warning, CheckKind::Eslint),
        ],
    );
    assert_eq!(errors.exit_code(), 2);
    assert!(!errors.success());
}

#[test]
fn payload_exposes_required_fields() {
    let result = CheckResult::with_issues(
        CheckKind::Tsc,
        vec![make_issue(Severity::Error, CheckKind::Tsc)],
    );
    let payload = result.to_payload();

    for key in [
        "success",
        "clean",
        "summary",
        "files_checked",
        "checks_run",
        "error_count",
        "warning_count",
        "issues",
    ] {
        assert!(payload.get(key).is_some(), "missing key {key}");
    }
    let issue = &payload["issues"][0];
    assert_eq!(issue["severity"], "error");
    assert_eq!(issue["source"], "tsc");
}

#[test]
fn stub_scan_over_directory_applies_exemptions() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(
        src.join("app.ts"),
        "// TODO: wire up the API\nexport const x = 1;\n// @ts-ignore\nconst y = 2;\n",
    )
    .unwrap();
    std::fs::write(src.join("app.test.ts"), "// TODO: add more cases\n").unwrap();

    let config = CheckConfig {
        enable_prettier: false,
        enable_eslint: false,
        enable_tsc: false,
        ..CheckConfig::default()
    };
    let result = Checker::new(config).check_files(&[dir.path().to_path_buf()], false);

    // app.ts: TODO + bare @ts-ignore flagged; the test file is exempt
    assert_eq!(result.issues.len(), 2);
    assert!(result.issues.iter().all(|i| i.code == "STUB"));
    assert!(result.issues.iter().all(|i| i.file.ends_with("app.ts")));
    assert_eq!(result.files_checked, 2);
}

#[test]
fn check_content_uses_virtual_filename_and_skips_tsc() {
    let config = CheckConfig {
        enable_prettier: false,
        enable_eslint: false,
        ..CheckConfig::default()
    };
    let runner = Arc::new(CannedRunner(ToolOutcome::Completed {
        stdout: "should-not-run(1,1): error TS0000: never".to_string(),
        stderr: String::new(),
        exit_code: 2,
    }));
    let checker = Checker::with_runner(config, runner);

    let result = checker
        .check_content("// FIXME: broken\nexport {};\n", "snippet.ts")
        .unwrap();

    assert!(!result.checks_run.contains(&CheckKind::Tsc));
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].file, "snippet.ts");
    assert_eq!(result.issues[0].line, 1);
}

#[test]
fn missing_tools_become_synthetic_issues() {
    let runner = Arc::new(CannedRunner(ToolOutcome::Completed {
        stdout: String::new(),
        stderr: "npm ERR! could not determine executable to run".to_string(),
        exit_code: 1,
    }));
    let config = CheckConfig {
        enable_stub_check: false,
        ..CheckConfig::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let result =
        Checker::with_runner(config, runner).check_files(&[dir.path().to_path_buf()], false);

    assert_eq!(result.issues.len(), 3);
    assert!(result.issues.iter().all(|i| i.code == "TOOL-NOT-FOUND"));
    assert!(result.issues.iter().all(|i| i.severity == Severity::Error));
    assert!(result.issues.iter().all(|i| i.file.is_empty()));
    assert_eq!(result.exit_code(), 2);
}

#[test]
fn timed_out_tool_does_not_stop_other_checks() {
    let runner = Arc::new(CannedRunner(ToolOutcome::TimedOut { limit_secs: 120 }));
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.ts"), "// HACK: temporary\n").unwrap();

    let result = Checker::with_runner(CheckConfig::default(), runner)
        .check_files(&[dir.path().to_path_buf()], false);

    let timeouts = result.issues.iter().filter(|i| i.code == "TIMEOUT").count();
    assert_eq!(timeouts, 3);
    assert!(result.issues.iter().any(|i| i.code == "STUB"));
    assert_eq!(
        result.checks_run,
        vec![
            CheckKind::Prettier,
            CheckKind::Eslint,
            CheckKind::Tsc,
            CheckKind::StubCheck
        ]
    );
}

#[test]
fn all_checks_clean_on_empty_project() {
    let runner = Arc::new(CannedRunner(clean_outcome()));
    let dir = tempfile::tempdir().unwrap();
    let result = Checker::with_runner(CheckConfig::default(), runner)
        .check_files(&[dir.path().to_path_buf()], false);

    assert!(result.clean());
    assert!(result.success());
    assert_eq!(result.files_checked, 0);
    assert_eq!(result.summary(), "All checks passed (0 files)");
}

#[test]
fn files_checked_counts_only_checkable_extensions() {
    let runner = Arc::new(CannedRunner(clean_outcome()));
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "export {};\n").unwrap();
    std::fs::write(dir.path().join("b.jsx"), "export default 1;\n").unwrap();
    std::fs::write(dir.path().join("c.py"), "pass\n").unwrap();

    let result = Checker::with_runner(CheckConfig::default(), runner)
        .check_files(&[dir.path().to_path_buf()], false);
    assert_eq!(result.files_checked, 2);

    let single = Checker::with_runner(CheckConfig::default(), Arc::new(CannedRunner(clean_outcome())))
        .check_files(&[dir.path().join("a.ts")], false);
    assert_eq!(single.files_checked, 1);
}
