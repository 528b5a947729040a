//! `tscheck check` - one-shot check of files or directories

use anyhow::Result;
use console::style;
use std::path::PathBuf;

use crate::checker::Checker;
use crate::config::{load_config, ConfigOverrides};
use crate::models::{CheckResult, Severity};

pub fn run(paths: &[PathBuf], fix: bool, format: &str, checks: &[String]) -> Result<()> {
    let overrides = overrides_from_checks(checks);
    let config = load_config(None, overrides.as_ref());
    let fix = fix || config.auto_fix;
    let fail_on_warning = config.fail_on_warning;

    let checker = Checker::new(config);
    let result = checker.check_files(paths, fix);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result.to_payload())?),
        _ => print_text(&result),
    }

    // Errors always fail the process; warnings only with fail_on_warning.
    // CheckResult::exit_code() itself distinguishes warnings (1) for
    // library consumers.
    let status = if result.error_count() > 0 {
        2
    } else if fail_on_warning && result.warning_count() > 0 {
        1
    } else {
        0
    };
    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}

/// Map `--checks format,lint,...` to config overrides; an empty selection
/// leaves the configured enables alone
fn overrides_from_checks(checks: &[String]) -> Option<ConfigOverrides> {
    if checks.is_empty() {
        return None;
    }
    let has = |name: &str| checks.iter().any(|c| c == name);
    Some(ConfigOverrides {
        enable_prettier: Some(has("format")),
        enable_eslint: Some(has("lint")),
        enable_tsc: Some(has("types")),
        enable_stub_check: Some(has("stubs")),
        ..Default::default()
    })
}

fn print_text(result: &CheckResult) {
    if result.clean() {
        println!("{} {}", style("\u{2713}").green().bold(), result.summary());
        return;
    }

    for issue in &result.issues {
        let tag = match issue.severity {
            Severity::Error => style("error").red().bold(),
            Severity::Warning => style("warn ").yellow(),
            Severity::Info => style("info ").dim(),
        };
        println!("  {}  {}", tag, issue.format_short());
        if let Some(suggestion) = &issue.suggestion {
            println!("         {}", style(format!("hint: {suggestion}")).dim());
        }
    }

    println!("\n{}", style(result.summary()).bold());
    let checks: Vec<&str> = result.checks_run.iter().map(|k| k.as_str()).collect();
    println!("{}", style(format!("checks run: {}", checks.join(", "))).dim());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks_selection() {
        let overrides = overrides_from_checks(&["lint".to_string(), "types".to_string()]).unwrap();
        assert_eq!(overrides.enable_prettier, Some(false));
        assert_eq!(overrides.enable_eslint, Some(true));
        assert_eq!(overrides.enable_tsc, Some(true));
        assert_eq!(overrides.enable_stub_check, Some(false));
    }

    #[test]
    fn test_empty_selection_keeps_config() {
        assert!(overrides_from_checks(&[]).is_none());
    }
}
