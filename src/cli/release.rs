//! Release command orchestration.

use crate::classifier::CommandClassifier;
use crate::config::{load_config, Config};
use crate::confirm::{AutoApprove, ConfirmationProvider, TerminalConfirmation};
use crate::error::{AutoFlowError, Result};
use crate::pipeline::{MergeMethod, ReleaseOptions, ReleaseOutcome, ReleasePipeline};
use crate::runner::{CommandRunner, ProcessRunner};
use crate::state::RepositoryState;
use crate::ui;

/// Arguments for the release workflow.
///
/// Mirrors the CLI flags in a format that does not depend on clap, so the
/// workflow can be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Explicit version overriding the computed one
    pub forced_version: Option<String>,

    /// Merge the release PR immediately after creation
    pub auto_merge: bool,

    pub merge_method: MergeMethod,

    /// Skip confirmation prompts
    pub force: bool,

    /// Echo every external command before running it
    pub debug: bool,
}

/// Run the full release pipeline
pub fn run_release(args: &ReleaseArgs) -> Result<ReleaseOutcome> {
    let config = load_config(args.config_path.as_deref())?;
    let runner = ProcessRunner::new(args.debug);
    let repo = RepositoryState::new(&runner, &config.remote);

    if !repo.is_git_repository() {
        return Err(AutoFlowError::NotAGitRepository);
    }
    preflight_gh(&runner)?;

    let classifier = build_classifier(&runner, &config)?;
    let options = ReleaseOptions {
        forced_version: args.forced_version.clone(),
        auto_merge: args.auto_merge,
        merge_method: args.merge_method,
    };

    let outcome = if args.force {
        ReleasePipeline::new(&runner, &repo, &classifier, &AutoApprove, config.commit_limit)
            .run(&options)?
    } else {
        ReleasePipeline::new(
            &runner,
            &repo,
            &classifier,
            &TerminalConfirmation,
            config.commit_limit,
        )
        .run(&options)?
    };

    Ok(outcome)
}

/// Preview the next version without mutating anything
pub fn run_next_version(config_path: Option<&str>, debug: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let runner = ProcessRunner::new(debug);
    let repo = RepositoryState::new(&runner, &config.remote);

    if !repo.is_git_repository() {
        return Err(AutoFlowError::NotAGitRepository);
    }

    let classifier = build_classifier(&runner, &config)?;
    let pipeline =
        ReleasePipeline::new(&runner, &repo, &classifier, &AutoApprove, config.commit_limit);

    match pipeline.next_version()? {
        Some(version) => {
            ui::display_success(&format!("Next version would be {}", version.tag_name()))
        }
        None => ui::display_status("No changes to release"),
    }
    Ok(())
}

fn build_classifier<'a, R: CommandRunner>(
    runner: &'a R,
    config: &Config,
) -> Result<CommandClassifier<'a, R>> {
    if config.classifier.command.is_empty() {
        return Err(AutoFlowError::config(
            "no classifier command configured; set [classifier] command in gitautoflow.toml",
        ));
    }
    Ok(CommandClassifier::new(
        runner,
        config.classifier.command.clone(),
    ))
}

/// Verify the GitHub CLI is installed and authenticated before any
/// mutating stage runs
fn preflight_gh<R: CommandRunner>(runner: &R) -> Result<()> {
    let installed = runner
        .run(&["gh", "--version"], None, false)
        .map(|r| r.success())
        .unwrap_or(false);
    if !installed {
        return Err(AutoFlowError::config(
            "GitHub CLI (gh) is not installed; install it with 'brew install gh' or 'apt install gh'",
        ));
    }

    let authenticated = runner
        .run(&["gh", "auth", "status"], None, false)
        .map(|r| r.success())
        .unwrap_or(false);
    if !authenticated {
        return Err(AutoFlowError::config(
            "GitHub CLI is not authenticated; run 'gh auth login'",
        ));
    }

    Ok(())
}
