//! Deterministic next-version computation.
//!
//! The classifier decides *what kind* of release this is; this module
//! turns that decision plus the latest tag into the next version. Bump
//! precedence is strictly major > minor > patch: a single breaking
//! change forces a major bump no matter what else is in the release.

use crate::classifier::{ReleasePlan, VersionType};
use crate::domain::{Version, VersionBump};
use crate::error::{AutoFlowError, Result};

/// Compute the next version.
///
/// A user-forced version wins over the classification entirely (its
/// change lists still feed the release notes), but must be a valid
/// `vMAJOR.MINOR.PATCH` string, leading `v` optional. Otherwise the
/// latest tag is parsed (the `v0.0.0` sentinel seeds first releases)
/// and exactly one bump applied.
pub fn compute(latest_tag: &str, plan: &ReleasePlan, forced: Option<&str>) -> Result<Version> {
    if let Some(forced) = forced {
        return parse_forced(forced);
    }

    let base = Version::parse(latest_tag)?;
    Ok(base.bump(bump_for(plan)))
}

/// Bump category for a classification, by precedence
pub fn bump_for(plan: &ReleasePlan) -> VersionBump {
    if plan.breaking_changes {
        VersionBump::Major
    } else if plan.version_type == VersionType::Minor {
        VersionBump::Minor
    } else {
        VersionBump::Patch
    }
}

fn parse_forced(forced: &str) -> Result<Version> {
    // Strict on purpose: the tag-normalization leniency applied to legacy
    // tags does not extend to user input
    let valid = regex::Regex::new(r"^v?\d+\.\d+\.\d+$")
        .map(|re| re.is_match(forced))
        .unwrap_or(false);
    if !valid {
        return Err(AutoFlowError::version(format!(
            "'{}' - expected vMAJOR.MINOR.PATCH",
            forced
        )));
    }
    Version::parse(forced)
}
