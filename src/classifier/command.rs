use crate::classifier::{ChangeClassifier, ClassificationRequest, ReleaseAnalysis};
use crate::error::{AutoFlowError, Result};
use crate::runner::CommandRunner;

/// Classifier that shells out to a configured command.
///
/// The command receives the serialized request as its final argument and
/// must print the classification JSON on stdout. Keeping the transport on
/// the same command-execution boundary as git/gh means the whole pipeline
/// can be exercised with a recording runner.
#[derive(Debug)]
pub struct CommandClassifier<'a, R: CommandRunner> {
    runner: &'a R,
    command: Vec<String>,
}

impl<'a, R: CommandRunner> CommandClassifier<'a, R> {
    pub fn new(runner: &'a R, command: Vec<String>) -> Self {
        CommandClassifier { runner, command }
    }
}

impl<R: CommandRunner> ChangeClassifier for CommandClassifier<'_, R> {
    fn analyze_for_release(&self, request: &ClassificationRequest) -> Result<ReleaseAnalysis> {
        if self.command.is_empty() {
            return Err(AutoFlowError::config(
                "no classifier command configured (set [classifier].command in gitautoflow.toml)",
            ));
        }

        let payload = serde_json::to_string(request)
            .map_err(|e| AutoFlowError::classifier(format!("could not encode request: {}", e)))?;

        let mut argv: Vec<&str> = self.command.iter().map(String::as_str).collect();
        argv.push(&payload);

        let result = self.runner.run(&argv, None, false)?;
        if !result.success() {
            return Err(AutoFlowError::classifier(format!(
                "'{}' exited with code {}: {}",
                self.command.join(" "),
                result.exit_code,
                result.stderr.trim()
            )));
        }

        ReleaseAnalysis::from_json(&result.stdout)
    }
}
