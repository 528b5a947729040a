//! Tool execution boundary for checkers that wrap external tools
//!
//! All external tools (prettier, eslint, tsc) are invoked through npx. The
//! [`ToolRunner`] trait is the seam: checkers build a command and interpret a
//! [`ToolOutcome`], and never learn how the invocation happens, so tests can
//! substitute canned outcomes.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Ceiling for a single external tool invocation (seconds)
pub const TOOL_TIMEOUT_SECS: u64 = 120;

/// Outcome of one external tool invocation
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    /// The process ran to completion (it may still have reported issues)
    Completed {
        stdout: String,
        stderr: String,
        exit_code: i32,
    },
    /// The executable could not be located
    NotFound,
    /// The invocation exceeded the timeout ceiling
    TimedOut { limit_secs: u64 },
}

/// Executes external tools on behalf of checkers
pub trait ToolRunner: Send + Sync {
    fn invoke(&self, command: &str, args: &[String]) -> ToolOutcome;
}

#[derive(Debug, Error)]
enum ToolError {
    #[error("{tool} not found")]
    NotFound { tool: String },
    #[error("{tool} timed out after {limit}s")]
    TimedOut { tool: String, limit: u64 },
    #[error("failed to run {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// Production runner: spawns the tool as a subprocess with piped output and
/// a poll/kill timeout
#[derive(Debug)]
pub struct ProcessRunner {
    timeout_secs: u64,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {
            timeout_secs: TOOL_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    fn run(&self, command: &str, args: &[String]) -> Result<ToolOutcome, ToolError> {
        debug!("Running {} {:?}", command, args);

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ToolError::NotFound {
                        tool: command.to_string(),
                    }
                } else {
                    ToolError::Io {
                        tool: command.to_string(),
                        source: e,
                    }
                }
            })?;

        // Drain pipes on threads so a chatty tool cannot fill the pipe
        // buffer and stall the poll loop below.
        let stdout_handle = child.stdout.take().map(spawn_reader);
        let stderr_handle = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + Duration::from_secs(self.timeout_secs);
        let exit_code = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status.code().unwrap_or(-1),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ToolError::TimedOut {
                            tool: command.to_string(),
                            limit: self.timeout_secs,
                        });
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    return Err(ToolError::Io {
                        tool: command.to_string(),
                        source: e,
                    })
                }
            }
        };

        let stdout = join_reader(stdout_handle);
        let stderr = join_reader(stderr_handle);

        Ok(ToolOutcome::Completed {
            stdout,
            stderr,
            exit_code,
        })
    }
}

impl ToolRunner for ProcessRunner {
    fn invoke(&self, command: &str, args: &[String]) -> ToolOutcome {
        match self.run(command, args) {
            Ok(outcome) => outcome,
            Err(ToolError::NotFound { .. }) => ToolOutcome::NotFound,
            Err(ToolError::TimedOut { tool, limit }) => {
                warn!("{} timed out after {}s", tool, limit);
                ToolOutcome::TimedOut { limit_secs: limit }
            }
            Err(e @ ToolError::Io { .. }) => {
                // Degrade like malformed output: the affected checker parses
                // nothing and reports a clean result for this tool.
                warn!("{}", e);
                ToolOutcome::Completed {
                    stdout: String::new(),
                    stderr: String::new(),
                    exit_code: -1,
                }
            }
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = source.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<std::thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Stderr substrings that mean "the tool behind npx is not installed", even
/// when the process itself exited normally.
const MISSING_TOOL_INDICATORS: &[&str] = &[
    "not found",
    "ERR_MODULE_NOT_FOUND",
    "Cannot find module",
    "command not found",
    "could not determine executable",
];

/// Check whether npx stderr indicates a missing tool
pub fn is_tool_missing(stderr: &str) -> bool {
    let stderr_lower = stderr.to_lowercase();
    MISSING_TOOL_INDICATORS
        .iter()
        .any(|ind| stderr_lower.contains(&ind.to_lowercase()))
}

/// Build the argument vector for an `npx <tool> ...` invocation
pub fn npx_args(tool: &str, rest: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(rest.len() + 1);
    args.push(tool.to_string());
    args.extend(rest.iter().cloned());
    args
}
