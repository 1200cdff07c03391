//! Change classification boundary
//!
//! The release pipeline needs a structured classification of the changes
//! going out in a release: a PR draft plus a semantic-version assessment.
//! That work is delegated to an external classifier behind the
//! [ChangeClassifier] trait; the crate depends only on the JSON contract,
//! validated eagerly here so malformed payloads fail at the boundary
//! instead of deep inside version math.
//!
//! ## Implementations
//!
//! - [CommandClassifier](command::CommandClassifier): shells out to a configured command
//! - [StaticClassifier](mock::StaticClassifier): canned responses for testing

pub mod command;
pub mod mock;

pub use command::CommandClassifier;
pub use mock::StaticClassifier;

use crate::error::{AutoFlowError, Result};
use serde::{Deserialize, Serialize};

/// Diffs handed to the classifier are truncated to this many characters
pub const DIFF_CHAR_LIMIT: usize = 4000;

/// Everything the classifier gets to look at for one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRequest {
    pub diff: String,
    pub files: Vec<String>,
    pub commits: Vec<String>,
    pub latest_tag: String,
}

impl ClassificationRequest {
    /// Build a request, truncating the diff to [DIFF_CHAR_LIMIT]
    pub fn new(
        diff: impl Into<String>,
        files: Vec<String>,
        commits: Vec<String>,
        latest_tag: impl Into<String>,
    ) -> Self {
        let diff: String = diff.into();
        let diff = if diff.chars().count() > DIFF_CHAR_LIMIT {
            diff.chars().take(DIFF_CHAR_LIMIT).collect()
        } else {
            diff
        };

        ClassificationRequest {
            diff,
            files,
            commits,
            latest_tag: latest_tag.into(),
        }
    }
}

/// Semantic-version bump category reported by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    Major,
    Minor,
    Patch,
    Forced,
}

/// Draft pull request content
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Version assessment and categorized change lists
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleasePlan {
    /// Version string suggested by the classifier. Advisory only: the
    /// authoritative next version comes from the calculator.
    pub version: String,
    pub version_type: VersionType,
    pub breaking_changes: bool,
    pub major_changes: Vec<String>,
    pub minor_changes: Vec<String>,
    pub patch_changes: Vec<String>,
}

/// Validated classifier payload. Produced once per release, read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAnalysis {
    pub pr: PrDraft,
    pub release: ReleasePlan,
}

impl ReleaseAnalysis {
    /// Parse and validate a raw classifier response.
    ///
    /// Accepts the JSON object directly or wrapped in markdown code
    /// fences, which is how LLM backends tend to return it. Any missing
    /// required key is a classifier error.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cleaned = strip_code_fences(raw);
        serde_json::from_str(cleaned)
            .map_err(|e| AutoFlowError::classifier(format!("malformed response: {}", e)))
    }
}

/// External change classifier contract
pub trait ChangeClassifier: Send + Sync {
    /// Classify the changes going into one release
    fn analyze_for_release(&self, request: &ClassificationRequest) -> Result<ReleaseAnalysis>;
}

/// Remove surrounding ```json fences from a response body
fn strip_code_fences(content: &str) -> &str {
    let mut content = content.trim();
    if let Some(rest) = content.strip_prefix("```json") {
        content = rest;
    } else if let Some(rest) = content.strip_prefix("```") {
        content = rest;
    }
    if let Some(rest) = content.strip_suffix("```") {
        content = rest;
    }
    content.trim()
}
