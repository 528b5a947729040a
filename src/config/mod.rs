//! Configuration for tscheck
//!
//! Configuration merges, in increasing priority:
//! 1. Built-in defaults
//! 2. The `"tscheck"` key of the nearest `package.json` (walk-up discovery)
//! 3. `TSCHECK_*` environment variable booleans
//! 4. Explicit caller overrides
//!
//! The loaded [`CheckConfig`] is an immutable value passed into every check
//! invocation; callers that need a variant (e.g. content checks with the type
//! checker disabled) derive a new value instead of mutating a shared one.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::{Severity, Verbosity};

/// Built-in exclusion patterns for generated and third-party code
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "node_modules/**",
    "dist/**",
    "build/**",
    "coverage/**",
    ".next/**",
    ".git/**",
];

/// Default file patterns for the watch/report layer
pub const DEFAULT_FILE_PATTERNS: &[&str] = &[
    "*.ts", "*.tsx", "*.mts", "*.cts", "*.js", "*.jsx", "*.mjs", "*.cjs",
];

/// One stub-detection rule: a regex source plus a human description
#[derive(Debug, Clone, Deserialize)]
pub struct StubPattern {
    pub pattern: String,
    pub description: String,
}

impl StubPattern {
    fn new(pattern: &str, description: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            description: description.to_string(),
        }
    }
}

fn default_stub_patterns() -> Vec<StubPattern> {
    vec![
        StubPattern::new(r"\bTODO\b", "TODO comment"),
        StubPattern::new(r"\bFIXME\b", "FIXME comment"),
        StubPattern::new(r"\bHACK\b", "HACK comment"),
        StubPattern::new(
            r#"throw\s+new\s+Error\(\s*["']not\s+implemented"#,
            "Not implemented error",
        ),
        StubPattern::new(r"//\s*@ts-ignore\s*$", "@ts-ignore without explanation"),
        StubPattern::new(
            r"//\s*@ts-expect-error\s*$",
            "@ts-expect-error without explanation",
        ),
    ]
}

/// Reporting knobs for the adaptive reporting engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub enabled: bool,
    /// File name patterns the watch layer reacts to
    pub file_patterns: Vec<String>,
    /// Severity threshold: issues above this level are not reported
    pub report_level: Severity,
    pub verbosity: Verbosity,
    /// Surface a one-line message for clean passes
    pub show_clean: bool,
    /// Attach a context digest for upstream agent consumption
    pub auto_inject: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_patterns: DEFAULT_FILE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            report_level: Severity::Warning,
            verbosity: Verbosity::Normal,
            show_clean: true,
            auto_inject: true,
        }
    }
}

/// Configuration for a check invocation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub enable_prettier: bool,
    pub enable_eslint: bool,
    pub enable_tsc: bool,
    pub enable_stub_check: bool,
    pub exclude_patterns: Vec<String>,
    pub fail_on_warning: bool,
    pub auto_fix: bool,
    pub stub_patterns: Vec<StubPattern>,
    #[serde(alias = "hook")]
    pub report: ReportConfig,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            enable_prettier: true,
            enable_eslint: true,
            enable_tsc: true,
            enable_stub_check: true,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fail_on_warning: false,
            auto_fix: false,
            stub_patterns: default_stub_patterns(),
            report: ReportConfig::default(),
        }
    }
}

/// Explicit caller overrides, applied last
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub enable_prettier: Option<bool>,
    pub enable_eslint: Option<bool>,
    pub enable_tsc: Option<bool>,
    pub enable_stub_check: Option<bool>,
    pub fail_on_warning: Option<bool>,
    pub auto_fix: Option<bool>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut CheckConfig) {
        if let Some(v) = self.enable_prettier {
            config.enable_prettier = v;
        }
        if let Some(v) = self.enable_eslint {
            config.enable_eslint = v;
        }
        if let Some(v) = self.enable_tsc {
            config.enable_tsc = v;
        }
        if let Some(v) = self.enable_stub_check {
            config.enable_stub_check = v;
        }
        if let Some(v) = self.fail_on_warning {
            config.fail_on_warning = v;
        }
        if let Some(v) = self.auto_fix {
            config.auto_fix = v;
        }
    }
}

/// Find `package.json` by walking up from `start` (or the current directory)
pub fn find_package_json(start: Option<&Path>) -> Option<PathBuf> {
    let start = match start {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };

    let mut current = start.as_path();
    loop {
        let candidate = current.join("package.json");
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Parse a boolean env-var value; unrecognized forms are ignored
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn apply_env(config: &mut CheckConfig) {
    let mapping: &[(&str, fn(&mut CheckConfig, bool))] = &[
        ("TSCHECK_ENABLE_PRETTIER", |c, v| c.enable_prettier = v),
        ("TSCHECK_ENABLE_ESLINT", |c, v| c.enable_eslint = v),
        ("TSCHECK_ENABLE_TSC", |c, v| c.enable_tsc = v),
        ("TSCHECK_ENABLE_STUB_CHECK", |c, v| c.enable_stub_check = v),
        ("TSCHECK_FAIL_ON_WARNING", |c, v| c.fail_on_warning = v),
        ("TSCHECK_AUTO_FIX", |c, v| c.auto_fix = v),
    ];

    for (var, set) in mapping {
        if let Ok(value) = std::env::var(var) {
            if let Some(parsed) = parse_bool(&value) {
                set(config, parsed);
            }
        }
    }
}

/// Load configuration from `package.json` with env and explicit overrides
pub fn load_config(config_path: Option<&Path>, overrides: Option<&ConfigOverrides>) -> CheckConfig {
    let mut config = CheckConfig::default();

    let manifest = config_path
        .map(|p| p.to_path_buf())
        .or_else(|| find_package_json(None));

    if let Some(path) = manifest {
        match read_manifest_section(&path) {
            Ok(Some(section)) => match serde_json::from_value::<CheckConfig>(section) {
                Ok(loaded) => config = loaded,
                Err(e) => warn!("Ignoring malformed tscheck config in {}: {}", path.display(), e),
            },
            Ok(None) => debug!("No tscheck section in {}", path.display()),
            Err(e) => debug!("Could not read {}: {}", path.display(), e),
        }
    }

    apply_env(&mut config);

    if let Some(overrides) = overrides {
        overrides.apply(&mut config);
    }

    config
}

fn read_manifest_section(path: &Path) -> anyhow::Result<Option<serde_json::Value>> {
    let text = std::fs::read_to_string(path)?;
    let manifest: serde_json::Value = serde_json::from_str(&text)?;
    Ok(manifest.get("tscheck").cloned())
}
