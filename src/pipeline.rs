//! End-to-end release pipeline.
//!
//! Linear develop → main release sequence: sync the base branch, inspect
//! the diff, classify the changes, compute the next version, open the
//! release PR, merge it, then tag and publish the GitHub release. Each
//! stage has an explicit failure mode; merge and return-to-branch degrade
//! gracefully, everything else aborts the run.

use crate::calculator;
use crate::classifier::{ChangeClassifier, ClassificationRequest, ReleaseAnalysis};
use crate::confirm::ConfirmationProvider;
use crate::domain::Version;
use crate::error::{AutoFlowError, Result};
use crate::notes::generate_release_notes;
use crate::runner::{CommandResult, CommandRunner};
use crate::state::RepositoryState;
use crate::ui;

/// Branch a release is cut from
pub const BASE_BRANCH: &str = "develop";
/// Branch a release lands on
pub const TARGET_BRANCH: &str = "main";

/// Labels the release PR may carry; anything else from the classifier is dropped
pub const ALLOWED_PR_LABELS: &[&str] = &["release", "enhancement", "feature"];

/// How the release PR gets merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    Merge,
    Squash,
    Rebase,
}

impl MergeMethod {
    fn flag(self) -> &'static str {
        match self {
            MergeMethod::Merge => "--merge",
            MergeMethod::Squash => "--squash",
            MergeMethod::Rebase => "--rebase",
        }
    }
}

/// Per-run options, mirroring the CLI flags
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// User-forced version; bypasses the computed bump
    pub forced_version: Option<String>,
    /// Merge the PR immediately after creating it
    pub auto_merge: bool,
    pub merge_method: MergeMethod,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        ReleaseOptions {
            forced_version: None,
            auto_merge: true,
            merge_method: MergeMethod::Merge,
        }
    }
}

/// Per-run record, mutated stage by stage and discarded at exit.
///
/// Idempotence of the whole workflow rests on the external git/GitHub
/// state, never on local bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRun {
    pub starting_branch: String,
    pub pr_url: Option<String>,
    pub merged: bool,
    pub version: Option<Version>,
    pub release_url: Option<String>,
}

/// How a pipeline run ended (all of these are exit code 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No difference between develop and main; nothing was created
    NothingToRelease,
    /// The user declined the confirmation prompt
    Cancelled,
    /// PR created but not merged (merge declined, disabled, or failed);
    /// tagging is skipped because tagging an unmerged change is wrong
    PrOpen { pr_url: String, version: Version },
    /// PR merged, tag pushed, GitHub release published
    Released {
        version: Version,
        pr_url: String,
        release_url: Option<String>,
    },
}

pub struct ReleasePipeline<'a, R, C, P>
where
    R: CommandRunner,
    C: ChangeClassifier,
    P: ConfirmationProvider,
{
    runner: &'a R,
    repo: &'a RepositoryState<'a, R>,
    classifier: &'a C,
    confirm: &'a P,
    commit_limit: usize,
}

impl<'a, R, C, P> ReleasePipeline<'a, R, C, P>
where
    R: CommandRunner,
    C: ChangeClassifier,
    P: ConfirmationProvider,
{
    pub fn new(
        runner: &'a R,
        repo: &'a RepositoryState<'a, R>,
        classifier: &'a C,
        confirm: &'a P,
        commit_limit: usize,
    ) -> Self {
        ReleasePipeline {
            runner,
            repo,
            classifier,
            confirm,
            commit_limit,
        }
    }

    fn run_cmd(&self, argv: &[&str], check: bool) -> Result<CommandResult> {
        self.runner.run(argv, self.repo.working_dir(), check)
    }

    /// Run the full release sequence
    pub fn run(&self, options: &ReleaseOptions) -> Result<ReleaseOutcome> {
        let mut run = ReleaseRun {
            starting_branch: self.repo.current_branch()?,
            pr_url: None,
            merged: false,
            version: None,
            release_url: None,
        };

        ui::display_header(&format!(
            "Release: {} -> {}",
            BASE_BRANCH, TARGET_BRANCH
        ));

        // Stage 1: sync the base branch. Without a known-good develop
        // there is nothing meaningful to release.
        ui::display_status(&format!("Step 1: Synchronizing '{}'...", BASE_BRANCH));
        self.run_cmd(&["git", "checkout", BASE_BRANCH], true)?;
        self.run_cmd(&["git", "pull", self.repo.remote(), BASE_BRANCH], true)?;
        ui::display_success(&format!("'{}' is up to date", BASE_BRANCH));

        // Stage 2: anything to release?
        ui::display_status(&format!(
            "Step 2: Comparing '{}' against '{}'...",
            BASE_BRANCH, TARGET_BRANCH
        ));
        if !self.repo.has_branch_changes(TARGET_BRANCH)? {
            ui::display_success(&format!(
                "No changes between '{}' and '{}', nothing to release",
                BASE_BRANCH, TARGET_BRANCH
            ));
            self.return_to(&run.starting_branch);
            return Ok(ReleaseOutcome::NothingToRelease);
        }

        // Stage 3: classify. The classifier is required; there is no
        // local fallback heuristic.
        ui::display_status("Step 3: Classifying changes...");
        let latest_tag = self.repo.latest_tag();
        let request = ClassificationRequest::new(
            self.repo.branch_diff(TARGET_BRANCH)?,
            self.repo.branch_files(TARGET_BRANCH)?,
            self.repo.commit_messages(TARGET_BRANCH, self.commit_limit)?,
            latest_tag.clone(),
        );
        ui::display_status(&format!(
            "{} commits, {} files changed since {}",
            request.commits.len(),
            request.files.len(),
            latest_tag
        ));
        let analysis = self.classifier.analyze_for_release(&request)?;

        // Stage 4: next version
        ui::display_status("Step 4: Computing next version...");
        let version = calculator::compute(
            &latest_tag,
            &analysis.release,
            options.forced_version.as_deref(),
        )?;
        run.version = Some(version);
        let origin = if options.forced_version.is_some() {
            "forced by user"
        } else {
            "computed from classification"
        };
        ui::display_version_decision(&latest_tag, &version.tag_name(), origin);

        // Stage 5: create the release PR
        let pr_url = match self.create_pr(&analysis, version, options)? {
            Some(url) => url,
            None => {
                ui::display_status("Release cancelled");
                self.return_to(&run.starting_branch);
                return Ok(ReleaseOutcome::Cancelled);
            }
        };
        run.pr_url = Some(pr_url.clone());
        ui::display_success(&format!("Release PR created: {}", pr_url));

        // Stage 6: merge. Non-fatal: a failed merge leaves the PR open
        // for manual handling, and tagging is skipped.
        run.merged = options.auto_merge && self.merge_pr(&pr_url, options.merge_method);
        if !run.merged {
            if options.auto_merge {
                ui::display_warning("PR was not merged; merge it manually to finish the release");
            } else {
                ui::display_status("Auto-merge disabled; merge the PR manually to finish the release");
            }
            self.return_to(&run.starting_branch);
            return Ok(ReleaseOutcome::PrOpen { pr_url, version });
        }

        // Stage 7: tag + GitHub release. Fatal: a merged PR without a
        // tag is an inconsistent end state that must be surfaced.
        let release_url = self.tag_and_publish(version, &analysis, &latest_tag)?;
        run.release_url = release_url.clone();

        // Stage 8: best-effort return to where the user started
        self.return_to(&run.starting_branch);

        ui::display_success(&format!("Release {} published", version.tag_name()));
        Ok(ReleaseOutcome::Released {
            version,
            pr_url,
            release_url,
        })
    }

    /// Compute the next version without mutating anything (dry preview)
    pub fn next_version(&self) -> Result<Option<Version>> {
        if !self.repo.has_branch_changes(TARGET_BRANCH)? {
            return Ok(None);
        }

        let latest_tag = self.repo.latest_tag();
        let request = ClassificationRequest::new(
            self.repo.branch_diff(TARGET_BRANCH)?,
            self.repo.branch_files(TARGET_BRANCH)?,
            self.repo.commit_messages(TARGET_BRANCH, self.commit_limit)?,
            latest_tag.clone(),
        );
        let analysis = self.classifier.analyze_for_release(&request)?;
        calculator::compute(&latest_tag, &analysis.release, None).map(Some)
    }

    fn create_pr(
        &self,
        analysis: &ReleaseAnalysis,
        version: Version,
        options: &ReleaseOptions,
    ) -> Result<Option<String>> {
        ui::display_status("Step 5: Creating release PR...");

        // A user-forced version also overrides the generated title
        let title = if options.forced_version.is_some() {
            format!("Release {}", version.tag_name())
        } else {
            analysis.pr.title.clone()
        };
        let labels = filter_labels(&analysis.pr.labels);

        ui::display_proposed_pr(&title, TARGET_BRANCH, &labels, &analysis.pr.body);
        if options.auto_merge {
            ui::display_status("The PR will be merged immediately after creation");
        }

        if !self.confirm.confirm("Create this release PR?")? {
            return Ok(None);
        }

        let mut argv = vec![
            "gh",
            "pr",
            "create",
            "--base",
            TARGET_BRANCH,
            "--head",
            BASE_BRANCH,
            "--title",
            &title,
            "--body",
            &analysis.pr.body,
        ];
        for label in &labels {
            argv.push("--label");
            argv.push(label);
        }

        let result = self.run_cmd(&argv, true)?;
        Ok(Some(result.stdout_trimmed()))
    }

    fn merge_pr(&self, pr_url: &str, method: MergeMethod) -> bool {
        let pr_number = match pr_url.rsplit('/').next() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                ui::display_warning(&format!("could not extract PR number from '{}'", pr_url));
                return false;
            }
        };

        ui::display_status(&format!("Step 6: Merging PR #{}...", pr_number));
        match self.run_cmd(&["gh", "pr", "merge", &pr_number, method.flag()], false) {
            Ok(result) if result.success() => {
                ui::display_success("PR merged");
                true
            }
            Ok(result) => {
                ui::display_warning(&format!("merge failed: {}", result.stderr.trim()));
                false
            }
            Err(e) => {
                ui::display_warning(&format!("merge failed: {}", e));
                false
            }
        }
    }

    fn tag_and_publish(
        &self,
        version: Version,
        analysis: &ReleaseAnalysis,
        previous_tag: &str,
    ) -> Result<Option<String>> {
        let tag = version.tag_name();
        ui::display_status(&format!("Step 7: Tagging {} and publishing...", tag));

        self.run_cmd(&["git", "checkout", TARGET_BRANCH], true)?;
        self.run_cmd(&["git", "pull", self.repo.remote(), TARGET_BRANCH], true)?;

        let message = format!("Release {}", tag);
        self.run_cmd(&["git", "tag", "-a", &tag, "-m", &message], true)?;
        self.run_cmd(&["git", "push", self.repo.remote(), &tag], true)?;

        let notes = generate_release_notes(
            &version,
            &analysis.release,
            &self.repo.remote_repo_slug(),
            previous_tag,
        );

        let result = self.run_cmd(
            &[
                "gh", "release", "create", &tag, "--title", &tag, "--notes", &notes,
            ],
            false,
        )?;
        if !result.success() {
            return Err(AutoFlowError::release(format!(
                "'gh release create {}' failed: {}",
                tag,
                result.stderr.trim()
            )));
        }

        let url = result.stdout_trimmed();
        Ok(if url.is_empty() { None } else { Some(url) })
    }

    /// Best-effort checkout back to where the user started; a failure
    /// here is a warning, never an error
    fn return_to(&self, branch: &str) {
        if branch.is_empty() || branch == BASE_BRANCH {
            return;
        }
        match self.run_cmd(&["git", "checkout", branch], false) {
            Ok(result) if result.success() => {
                ui::display_status(&format!("Back on '{}'", branch));
            }
            _ => ui::display_warning(&format!("could not switch back to '{}'", branch)),
        }
    }
}

/// Keep only allowed labels, and make sure "release" is among them
fn filter_labels(labels: &[String]) -> Vec<String> {
    let mut filtered: Vec<String> = labels
        .iter()
        .filter(|l| ALLOWED_PR_LABELS.contains(&l.as_str()))
        .cloned()
        .collect();
    if !filtered.iter().any(|l| l == "release") {
        filtered.insert(0, "release".to_string());
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_method_flags() {
        assert_eq!(MergeMethod::Merge.flag(), "--merge");
        assert_eq!(MergeMethod::Squash.flag(), "--squash");
        assert_eq!(MergeMethod::Rebase.flag(), "--rebase");
    }

    #[test]
    fn test_filter_labels_drops_unknown() {
        let labels = vec![
            "release".to_string(),
            "urgent".to_string(),
            "enhancement".to_string(),
        ];
        assert_eq!(filter_labels(&labels), vec!["release", "enhancement"]);
    }

    #[test]
    fn test_filter_labels_always_includes_release() {
        let labels = vec!["feature".to_string()];
        assert_eq!(filter_labels(&labels), vec!["release", "feature"]);
        assert_eq!(filter_labels(&[]), vec!["release"]);
    }

    #[test]
    fn test_default_options() {
        let options = ReleaseOptions::default();
        assert!(options.auto_merge);
        assert!(options.forced_version.is_none());
        assert_eq!(options.merge_method, MergeMethod::Merge);
    }
}
