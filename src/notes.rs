//! Release notes generation.
//!
//! Notes are rendered deterministically from the categorized change
//! lists the classifier already produced; the classifier is never
//! re-invoked here.

use crate::classifier::ReleasePlan;
use crate::domain::Version;

/// Render GitHub release notes for a version.
///
/// Sections, in order: breaking changes, features, fixes, other. A
/// section is omitted when it has nothing to say. `major_changes` land
/// under "breaking changes" when the release is breaking, and under
/// "other" when it is not (e.g. a forced version over a large refactor).
pub fn generate_release_notes(
    version: &Version,
    plan: &ReleasePlan,
    repo_slug: &str,
    previous_tag: &str,
) -> String {
    let mut notes = format!("## 🚀 Release v{}\n\n", version);

    if plan.breaking_changes && !plan.major_changes.is_empty() {
        notes.push_str("### ⚠️ BREAKING CHANGES\n");
        for change in &plan.major_changes {
            notes.push_str(&format!("- {}\n", change));
        }
        notes.push('\n');
    }

    if !plan.minor_changes.is_empty() {
        notes.push_str("### ✨ New Features\n");
        for change in &plan.minor_changes {
            notes.push_str(&format!("- {}\n", change));
        }
        notes.push('\n');
    }

    if !plan.patch_changes.is_empty() {
        notes.push_str("### 🐛 Bug Fixes & Improvements\n");
        for change in &plan.patch_changes {
            notes.push_str(&format!("- {}\n", change));
        }
        notes.push('\n');
    }

    if !plan.breaking_changes && !plan.major_changes.is_empty() {
        notes.push_str("### 🔧 Other Changes\n");
        for change in &plan.major_changes {
            notes.push_str(&format!("- {}\n", change));
        }
        notes.push('\n');
    }

    notes.push_str(&format!(
        "**Full Changelog**: https://github.com/{}/compare/{}...v{}\n",
        repo_slug, previous_tag, version
    ));

    notes
}
