use thiserror::Error;

/// Unified error type for git-autoflow operations
#[derive(Error, Debug)]
pub enum AutoFlowError {
    #[error("Not inside a git repository")]
    NotAGitRepository,

    #[error("Command `{argv}` failed with exit code {exit_code}: {stderr}")]
    Command {
        argv: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Network operation failed: {0}")]
    Network(String),

    #[error("Rebase onto 'origin/{base_branch}' hit conflicts; the rebase was aborted")]
    RebaseConflict { base_branch: String },

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Invalid version format: {0}")]
    Version(String),

    #[error("GitHub release failed: {0}")]
    Release(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-autoflow
pub type Result<T> = std::result::Result<T, AutoFlowError>;

impl AutoFlowError {
    /// Create a network error with context
    pub fn network(msg: impl Into<String>) -> Self {
        AutoFlowError::Network(msg.into())
    }

    /// Create a classifier error with context
    pub fn classifier(msg: impl Into<String>) -> Self {
        AutoFlowError::Classifier(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        AutoFlowError::Version(msg.into())
    }

    /// Create a release error with context
    pub fn release(msg: impl Into<String>) -> Self {
        AutoFlowError::Release(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        AutoFlowError::Config(msg.into())
    }
}
