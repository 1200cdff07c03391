use crate::domain::version::normalize_tag;
use crate::error::{AutoFlowError, Result};
use crate::runner::{CommandResult, CommandRunner};
use std::path::{Path, PathBuf};

/// Tag returned when the repository has no tags yet.
///
/// A sentinel, not an error: it seeds the version math for first releases.
pub const NO_TAG_SENTINEL: &str = "v0.0.0";

/// Read-only queries over a git working tree.
///
/// Every method shells out through the injected [CommandRunner]; none of
/// them mutate repository state. Results are derived fresh on each call
/// because remote state can change mid-run.
pub struct RepositoryState<'a, R: CommandRunner> {
    runner: &'a R,
    remote: String,
    cwd: Option<PathBuf>,
}

impl<'a, R: CommandRunner> RepositoryState<'a, R> {
    /// Create a state reader using the given remote name (usually "origin")
    pub fn new(runner: &'a R, remote: impl Into<String>) -> Self {
        RepositoryState {
            runner,
            remote: remote.into(),
            cwd: None,
        }
    }

    /// Pin all queries to an explicit working directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// The remote this reader fetches from and compares against
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Working directory queries are pinned to, if any
    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn run(&self, argv: &[&str], check: bool) -> Result<CommandResult> {
        self.runner.run(argv, self.cwd(), check)
    }

    /// Whether the working directory is inside a git repository
    pub fn is_git_repository(&self) -> bool {
        self.run(&["git", "rev-parse", "--git-dir"], false)
            .map(|r| r.success())
            .unwrap_or(false)
    }

    /// Name of the currently checked-out branch
    pub fn current_branch(&self) -> Result<String> {
        let result = self.run(&["git", "branch", "--show-current"], false)?;
        if !result.success() {
            return Err(AutoFlowError::NotAGitRepository);
        }
        Ok(result.stdout_trimmed())
    }

    /// Whether a branch exists, locally or on the remote.
    ///
    /// Absence is a valid `false` result, never an error.
    pub fn branch_exists(&self, name: &str, remote: bool) -> bool {
        let reference = if remote {
            format!("refs/remotes/{}/{}", self.remote, name)
        } else {
            format!("refs/heads/{}", name)
        };
        self.run(
            &["git", "show-ref", "--verify", "--quiet", &reference],
            false,
        )
        .map(|r| r.success())
        .unwrap_or(false)
    }

    /// Commits on the remote base branch not reachable from HEAD.
    ///
    /// Fetches the base branch first; a failed fetch is a network error
    /// which callers may treat as non-fatal and continue stale.
    pub fn behind_count(&self, base_branch: &str) -> Result<u32> {
        let fetch = self.run(&["git", "fetch", &self.remote, base_branch], false)?;
        if !fetch.success() {
            return Err(AutoFlowError::network(format!(
                "could not fetch '{}' from '{}': {}",
                base_branch,
                self.remote,
                fetch.stderr.trim()
            )));
        }

        let range = format!("HEAD..{}/{}", self.remote, base_branch);
        let result = self.run(&["git", "rev-list", "--count", &range], true)?;
        result.stdout_trimmed().parse::<u32>().map_err(|_| {
            AutoFlowError::network(format!(
                "unexpected rev-list output: '{}'",
                result.stdout_trimmed()
            ))
        })
    }

    /// Whether any changes are staged in the index
    pub fn has_staged_changes(&self) -> Result<bool> {
        let result = self.run(&["git", "diff", "--cached", "--name-only"], true)?;
        Ok(!result.stdout_trimmed().is_empty())
    }

    /// Whether the current branch differs from `base_branch`
    pub fn has_branch_changes(&self, base_branch: &str) -> Result<bool> {
        let range = format!("{}...HEAD", base_branch);
        let result = self.run(&["git", "diff", "--name-only", &range], true)?;
        Ok(!result.stdout_trimmed().is_empty())
    }

    /// Full diff of the current branch against `base_branch`
    pub fn branch_diff(&self, base_branch: &str) -> Result<String> {
        let range = format!("{}...HEAD", base_branch);
        let result = self.run(&["git", "diff", &range], true)?;
        Ok(result.stdout)
    }

    /// Names of files changed on the current branch vs `base_branch`
    pub fn branch_files(&self, base_branch: &str) -> Result<Vec<String>> {
        let range = format!("{}...HEAD", base_branch);
        let result = self.run(&["git", "diff", "--name-only", &range], true)?;
        Ok(result
            .stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_string())
            .collect())
    }

    /// One-line commit messages on the current branch vs `base_branch`
    pub fn commit_messages(&self, base_branch: &str, limit: usize) -> Result<Vec<String>> {
        let count = format!("-{}", limit);
        let range = format!("{}..HEAD", base_branch);
        let result = self.run(&["git", "log", "--oneline", &count, &range], true)?;
        Ok(result
            .stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_string())
            .collect())
    }

    /// Latest tag by version order, or [NO_TAG_SENTINEL] when none exists.
    ///
    /// Tag fetching is best-effort; a repository with no tags or an
    /// unreachable remote still yields the sentinel. Duplicated 'v'
    /// prefixes from historically malformed tags are normalized.
    pub fn latest_tag(&self) -> String {
        // Best-effort refresh; local tags are good enough if it fails
        let _ = self.run(&["git", "fetch", &self.remote, "--tags"], false);

        let listed = match self.run(&["git", "tag", "-l", "--sort=-v:refname"], false) {
            Ok(result) if result.success() => result,
            _ => return NO_TAG_SENTINEL.to_string(),
        };

        match listed.stdout.lines().next() {
            Some(tag) if !tag.trim().is_empty() => normalize_tag(tag.trim()),
            _ => NO_TAG_SENTINEL.to_string(),
        }
    }

    /// GitHub `owner/repo` slug parsed from the remote URL.
    ///
    /// Used for changelog compare links; falls back to "unknown/unknown"
    /// when the remote is missing or not a GitHub URL.
    pub fn remote_repo_slug(&self) -> String {
        let result = match self.run(&["git", "remote", "get-url", &self.remote], false) {
            Ok(result) if result.success() => result,
            _ => return "unknown/unknown".to_string(),
        };

        let url = result.stdout_trimmed();
        // Handles https://github.com/user/repo.git and git@github.com:user/repo.git
        if let Some(rest) = url.split("github.com").nth(1) {
            let slug = rest.trim_start_matches(['/', ':']);
            let slug = slug.strip_suffix(".git").unwrap_or(slug);
            if !slug.is_empty() {
                return slug.to_string();
            }
        }
        "unknown/unknown".to_string()
    }
}
