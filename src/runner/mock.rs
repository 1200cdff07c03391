use crate::error::{AutoFlowError, Result};
use crate::runner::{format_argv, CommandResult, CommandRunner};
use std::path::Path;
use std::sync::Mutex;

/// Recording command runner for testing without spawning processes.
///
/// Every argv issued through [CommandRunner::run] is recorded in order.
/// Responses are scripted per argv; unscripted commands succeed with
/// empty output, so tests only describe the commands they care about.
#[derive(Debug)]
pub struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    responses: Mutex<Vec<(String, CommandResult)>>,
}

impl RecordingRunner {
    /// Create a new empty recording runner
    pub fn new() -> Self {
        RecordingRunner {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
        }
    }

    /// Script a response for an exact command line (argv joined by spaces).
    ///
    /// Later scripts for the same command line win over earlier ones.
    pub fn respond(&self, command_line: impl Into<String>, result: CommandResult) {
        self.responses
            .lock()
            .unwrap()
            .push((command_line.into(), result));
    }

    /// Script a failure (non-zero exit) for an exact command line
    pub fn fail(&self, command_line: impl Into<String>, exit_code: i32, stderr: impl Into<String>) {
        self.respond(command_line, CommandResult::err(exit_code, stderr));
    }

    /// Every command line issued so far, in order
    pub fn recorded(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether any issued command line starts with the given prefix
    pub fn issued_with_prefix(&self, prefix: &str) -> bool {
        self.recorded().iter().any(|c| c.starts_with(prefix))
    }

    /// Count of issued command lines starting with the given prefix
    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.recorded()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, argv: &[&str], _cwd: Option<&Path>, check: bool) -> Result<CommandResult> {
        let command_line = format_argv(argv);
        self.calls.lock().unwrap().push(command_line.clone());

        let result = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(line, _)| *line == command_line)
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| CommandResult::ok(""));

        if check && !result.success() {
            return Err(AutoFlowError::Command {
                argv: command_line,
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let runner = RecordingRunner::new();
        runner.run(&["git", "fetch", "origin"], None, true).unwrap();
        runner
            .run(&["git", "rev-list", "--count", "HEAD..origin/develop"], None, true)
            .unwrap();

        let calls = runner.recorded();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], "git fetch origin");
        assert!(calls[1].starts_with("git rev-list"));
    }

    #[test]
    fn test_unscripted_commands_succeed_empty() {
        let runner = RecordingRunner::new();
        let result = runner.run(&["git", "checkout", "develop"], None, true).unwrap();
        assert!(result.success());
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn test_scripted_response() {
        let runner = RecordingRunner::new();
        runner.respond("git branch --show-current", CommandResult::ok("feature/x\n"));

        let result = runner
            .run(&["git", "branch", "--show-current"], None, true)
            .unwrap();
        assert_eq!(result.stdout_trimmed(), "feature/x");
    }

    #[test]
    fn test_scripted_failure_checked() {
        let runner = RecordingRunner::new();
        runner.fail("git rebase origin/develop", 1, "conflict");

        let err = runner
            .run(&["git", "rebase", "origin/develop"], None, true)
            .unwrap_err();
        assert!(matches!(err, AutoFlowError::Command { .. }));
    }

    #[test]
    fn test_scripted_failure_unchecked() {
        let runner = RecordingRunner::new();
        runner.fail("git rebase origin/develop", 1, "conflict");

        let result = runner
            .run(&["git", "rebase", "origin/develop"], None, false)
            .unwrap();
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn test_later_scripts_win() {
        let runner = RecordingRunner::new();
        runner.respond("git tag -l --sort=-v:refname", CommandResult::ok("v1.0.0\n"));
        runner.respond("git tag -l --sort=-v:refname", CommandResult::ok("v2.0.0\n"));

        let result = runner
            .run(&["git", "tag", "-l", "--sort=-v:refname"], None, true)
            .unwrap();
        assert_eq!(result.stdout_trimmed(), "v2.0.0");
    }

    #[test]
    fn test_prefix_helpers() {
        let runner = RecordingRunner::new();
        runner.run(&["git", "stash", "push", "--staged"], None, true).unwrap();
        assert!(runner.issued_with_prefix("git stash"));
        assert!(!runner.issued_with_prefix("git rebase"));
        assert_eq!(runner.count_with_prefix("git stash"), 1);
    }
}
