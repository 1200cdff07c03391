use crate::error::{AutoFlowError, Result};
use crate::runner::{format_argv, CommandResult, CommandRunner};
use std::path::Path;
use std::process::Command;

/// Real command runner spawning child processes.
///
/// Debug echoing is a construction-time flag threaded through from the
/// CLI, not a process-wide toggle. When enabled, every command is echoed
/// to stderr before it runs.
pub struct ProcessRunner {
    debug: bool,
}

impl ProcessRunner {
    /// Create a new runner
    pub fn new(debug: bool) -> Self {
        ProcessRunner { debug }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[&str], cwd: Option<&Path>, check: bool) -> Result<CommandResult> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| AutoFlowError::config("empty command line"))?;

        if self.debug {
            eprintln!("\x1b[2m$ {}\x1b[0m", format_argv(argv));
        }

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output()?;

        let result = CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if check && !result.success() {
            return Err(AutoFlowError::Command {
                argv: format_argv(argv),
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(result)
    }
}
