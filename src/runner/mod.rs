//! External command execution abstraction
//!
//! This module provides a trait-based abstraction over child-process
//! execution, allowing for a real implementation that spawns `git`/`gh`
//! and a recording implementation for testing.
//!
//! Most code should depend on the [CommandRunner] trait rather than
//! concrete implementations so pipelines can be exercised without
//! touching a real repository.

pub mod mock;
pub mod process;

pub use mock::RecordingRunner;
pub use process::ProcessRunner;

use crate::error::Result;
use std::path::Path;

/// Captured result of a single child-process invocation.
///
/// Produced once per invocation and never mutated. stdout and stderr are
/// captured separately because callers parse stdout for machine-readable
/// values (branch names, counts, URLs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Build a successful result with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandResult {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Build a failed result with the given exit code and stderr
    pub fn err(exit_code: i32, stderr: impl Into<String>) -> Self {
        CommandResult {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the invocation exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout with surrounding whitespace removed
    pub fn stdout_trimmed(&self) -> String {
        self.stdout.trim().to_string()
    }
}

/// Common command execution trait
///
/// Implementations spawn a child process (or pretend to) and capture its
/// output. No retries happen at this layer; retry policy belongs to
/// callers.
///
/// ## Implementations
///
/// - [ProcessRunner](process::ProcessRunner): real implementation spawning child processes
/// - [RecordingRunner](mock::RecordingRunner): test implementation recording issued argv
pub trait CommandRunner: Send + Sync {
    /// Run a command described by `argv`.
    ///
    /// When `check` is true and the process exits non-zero, fails with
    /// [crate::error::AutoFlowError::Command] carrying argv, exit code and
    /// stderr. When `check` is false, a non-zero exit is a valid result
    /// left for the caller to interpret.
    ///
    /// # Arguments
    /// * `argv` - Program and arguments, e.g. `["git", "fetch", "origin"]`
    /// * `cwd` - Working directory for the child; `None` inherits the caller's
    /// * `check` - Whether a non-zero exit code is an error
    fn run(&self, argv: &[&str], cwd: Option<&Path>, check: bool) -> Result<CommandResult>;
}

/// Render an argv slice the way it would be typed in a shell.
pub fn format_argv(argv: &[&str]) -> String {
    argv.join(" ")
}
