//! Branch synchronization engine.
//!
//! Brings the current branch up to date with a base branch via fetch +
//! rebase, bracketing the rebase with a stash push/pop when staged work
//! exists. Whatever path it exits through, the working tree is never
//! left mid-rebase: a conflicted rebase is always aborted before the
//! error is reported.

use crate::error::{AutoFlowError, Result};
use crate::runner::CommandRunner;
use crate::state::RepositoryState;
use crate::ui;

/// Stash label identifying snapshots taken by the sync engine
pub const STASH_LABEL: &str = "git-autoflow: auto-stash before rebase";

/// Terminal result of one sync attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Already on the base branch; nothing was fetched or rebased
    NotNeeded,
    /// Behind count was zero; nothing was rebased
    UpToDate,
    /// Remote unreachable; continuing with stale local state
    Skipped { reason: String },
    /// Rebase completed; `stash_restored` is false when a snapshot was
    /// taken but could not be popped back (manual `git stash pop` needed)
    Rebased { stash_restored: bool },
}

/// State machine over a single rebase attempt
pub struct SyncEngine<'a, R: CommandRunner> {
    runner: &'a R,
    repo: &'a RepositoryState<'a, R>,
}

impl<'a, R: CommandRunner> SyncEngine<'a, R> {
    pub fn new(runner: &'a R, repo: &'a RepositoryState<'a, R>) -> Self {
        SyncEngine { runner, repo }
    }

    fn run(&self, argv: &[&str], check: bool) -> Result<crate::runner::CommandResult> {
        self.runner.run(argv, self.repo.working_dir(), check)
    }

    /// Synchronize the current branch with `base_branch`.
    ///
    /// Short-circuits without issuing any git command beyond the branch
    /// query when already on the base branch, and without rebasing when
    /// the branch is not behind. A fetch failure downgrades to
    /// [SyncOutcome::Skipped]; only a rebase conflict is fatal.
    pub fn sync(&self, base_branch: &str) -> Result<SyncOutcome> {
        let current = self.repo.current_branch()?;
        if current == base_branch {
            return Ok(SyncOutcome::NotNeeded);
        }

        let behind = match self.repo.behind_count(base_branch) {
            Ok(count) => count,
            Err(AutoFlowError::Network(reason)) => {
                ui::display_warning(&format!(
                    "could not check '{}' for new commits: {}",
                    base_branch, reason
                ));
                return Ok(SyncOutcome::Skipped { reason });
            }
            Err(e) => return Err(e),
        };

        if behind == 0 {
            return Ok(SyncOutcome::UpToDate);
        }

        ui::display_status(&format!(
            "Branch '{}' is {} commits behind '{}', rebasing...",
            current, behind, base_branch
        ));

        let has_snapshot = self.repo.has_staged_changes()?;
        if has_snapshot {
            // Staged edits must survive the history rewrite
            self.run(
                &["git", "stash", "push", "--staged", "-m", STASH_LABEL],
                true,
            )?;
        }

        let upstream = format!("{}/{}", self.repo.remote(), base_branch);
        let rebase = self.run(&["git", "rebase", &upstream], false)?;

        if rebase.success() {
            let stash_restored = if has_snapshot {
                self.restore_snapshot()
            } else {
                true
            };
            return Ok(SyncOutcome::Rebased { stash_restored });
        }

        // Conflict: return the tree to its pre-rebase state before failing
        match self.run(&["git", "rebase", "--abort"], false) {
            Ok(result) if result.success() => {}
            _ => ui::display_warning(
                "'git rebase --abort' failed; the rebase may still be in progress",
            ),
        }
        if has_snapshot && !self.restore_snapshot() {
            ui::display_warning("staged changes are still stashed; run 'git stash pop' manually");
        }

        Err(AutoFlowError::RebaseConflict {
            base_branch: base_branch.to_string(),
        })
    }

    /// Pop the stash snapshot. Fail-open: a failed pop is reported as a
    /// warning and `false`, never an error, since the rebase itself
    /// already completed or was rolled back.
    fn restore_snapshot(&self) -> bool {
        match self.run(&["git", "stash", "pop"], false) {
            Ok(result) if result.success() => true,
            Ok(result) => {
                ui::display_warning(&format!(
                    "could not restore stashed changes: {}. Resolve manually with 'git stash pop'",
                    result.stderr.trim()
                ));
                false
            }
            Err(e) => {
                ui::display_warning(&format!(
                    "could not restore stashed changes: {}. Resolve manually with 'git stash pop'",
                    e
                ));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandResult, RecordingRunner};

    fn on_branch(runner: &RecordingRunner, branch: &str) {
        runner.respond(
            "git branch --show-current",
            CommandResult::ok(format!("{}\n", branch)),
        );
    }

    fn behind_by(runner: &RecordingRunner, base: &str, count: u32) {
        runner.respond(
            format!("git rev-list --count HEAD..origin/{}", base),
            CommandResult::ok(format!("{}\n", count)),
        );
    }

    #[test]
    fn test_sync_on_base_branch_issues_nothing() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "develop");

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        assert_eq!(engine.sync("develop").unwrap(), SyncOutcome::NotNeeded);

        assert!(!runner.issued_with_prefix("git fetch"));
        assert!(!runner.issued_with_prefix("git stash"));
        assert!(!runner.issued_with_prefix("git rebase"));
    }

    #[test]
    fn test_sync_up_to_date_skips_rebase() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "feature/x");
        behind_by(&runner, "develop", 0);

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        assert_eq!(engine.sync("develop").unwrap(), SyncOutcome::UpToDate);

        assert!(runner.issued_with_prefix("git fetch origin develop"));
        assert!(!runner.issued_with_prefix("git rebase"));
    }

    #[test]
    fn test_sync_fetch_failure_is_skipped_not_fatal() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "feature/x");
        runner.fail("git fetch origin develop", 128, "could not resolve host");

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        assert!(matches!(
            engine.sync("develop").unwrap(),
            SyncOutcome::Skipped { .. }
        ));
        assert!(!runner.issued_with_prefix("git rebase"));
    }

    #[test]
    fn test_sync_rebases_without_stash_when_nothing_staged() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "feature/x");
        behind_by(&runner, "develop", 2);
        runner.respond("git diff --cached --name-only", CommandResult::ok(""));

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        assert_eq!(
            engine.sync("develop").unwrap(),
            SyncOutcome::Rebased {
                stash_restored: true
            }
        );

        assert!(runner.issued_with_prefix("git rebase origin/develop"));
        assert!(!runner.issued_with_prefix("git stash"));
    }

    #[test]
    fn test_sync_brackets_rebase_with_stash() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "feature/x");
        behind_by(&runner, "develop", 1);
        runner.respond(
            "git diff --cached --name-only",
            CommandResult::ok("src/lib.rs\n"),
        );

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        assert_eq!(
            engine.sync("develop").unwrap(),
            SyncOutcome::Rebased {
                stash_restored: true
            }
        );

        let calls = runner.recorded();
        let stash_push = calls
            .iter()
            .position(|c| c.starts_with("git stash push"))
            .expect("stash push issued");
        let rebase = calls
            .iter()
            .position(|c| c.starts_with("git rebase"))
            .expect("rebase issued");
        let stash_pop = calls
            .iter()
            .position(|c| c.starts_with("git stash pop"))
            .expect("stash pop issued");
        assert!(stash_push < rebase);
        assert!(rebase < stash_pop);
    }

    #[test]
    fn test_sync_pop_failure_is_fail_open() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "feature/x");
        behind_by(&runner, "develop", 1);
        runner.respond(
            "git diff --cached --name-only",
            CommandResult::ok("src/lib.rs\n"),
        );
        runner.fail("git stash pop", 1, "could not restore untracked files");

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        // Rebase succeeded: a lost stash must not fail the sync retroactively
        assert_eq!(
            engine.sync("develop").unwrap(),
            SyncOutcome::Rebased {
                stash_restored: false
            }
        );
    }

    #[test]
    fn test_sync_conflict_aborts_and_restores() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "feature/x");
        behind_by(&runner, "develop", 3);
        runner.respond(
            "git diff --cached --name-only",
            CommandResult::ok("src/lib.rs\n"),
        );
        runner.fail("git rebase origin/develop", 1, "CONFLICT (content)");

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        let err = engine.sync("develop").unwrap_err();
        assert!(matches!(err, AutoFlowError::RebaseConflict { .. }));

        // Abort must be issued so the tree is not left mid-rebase, and the
        // snapshot restore attempted afterwards
        let calls = runner.recorded();
        let abort = calls
            .iter()
            .position(|c| c == "git rebase --abort")
            .expect("abort issued");
        let pop = calls
            .iter()
            .position(|c| c == "git stash pop")
            .expect("pop attempted");
        assert!(abort < pop);
    }

    #[test]
    fn test_sync_failed_abort_still_reports_conflict() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "feature/x");
        behind_by(&runner, "develop", 3);
        runner.respond("git diff --cached --name-only", CommandResult::ok(""));
        runner.fail("git rebase origin/develop", 1, "CONFLICT (content)");
        runner.fail("git rebase --abort", 128, "could not remove rebase state");

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        // The conflict error must come through even when the abort fails
        let err = engine.sync("develop").unwrap_err();
        assert!(matches!(err, AutoFlowError::RebaseConflict { .. }));
        assert!(runner.recorded().contains(&"git rebase --abort".to_string()));
    }

    #[test]
    fn test_sync_conflict_without_stash_still_aborts() {
        let runner = RecordingRunner::new();
        on_branch(&runner, "feature/x");
        behind_by(&runner, "develop", 3);
        runner.respond("git diff --cached --name-only", CommandResult::ok(""));
        runner.fail("git rebase origin/develop", 1, "CONFLICT (content)");

        let repo = RepositoryState::new(&runner, "origin");
        let engine = SyncEngine::new(&runner, &repo);
        assert!(engine.sync("develop").is_err());
        assert!(runner.recorded().contains(&"git rebase --abort".to_string()));
        assert!(!runner.issued_with_prefix("git stash"));
    }
}
