//! Sync command orchestration.

use crate::config::load_config;
use crate::error::{AutoFlowError, Result};
use crate::runner::ProcessRunner;
use crate::state::RepositoryState;
use crate::sync::{SyncEngine, SyncOutcome};
use crate::ui;

/// Rebase the current branch on top of `base_branch`
pub fn run_sync(base_branch: &str, config_path: Option<&str>, debug: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let runner = ProcessRunner::new(debug);
    let repo = RepositoryState::new(&runner, &config.remote);

    if !repo.is_git_repository() {
        return Err(AutoFlowError::NotAGitRepository);
    }

    let engine = SyncEngine::new(&runner, &repo);
    match engine.sync(base_branch)? {
        SyncOutcome::NotNeeded => {
            ui::display_status(&format!("Already on '{}', nothing to sync", base_branch))
        }
        SyncOutcome::UpToDate => {
            ui::display_success(&format!("Already up to date with '{}'", base_branch))
        }
        SyncOutcome::Skipped { reason } => {
            ui::display_warning(&format!("sync skipped: {}", reason))
        }
        SyncOutcome::Rebased { stash_restored } => {
            ui::display_success(&format!("Rebased onto '{}'", base_branch));
            if !stash_restored {
                ui::display_warning("staged changes are still stashed; run 'git stash pop'");
            }
        }
    }

    Ok(())
}
