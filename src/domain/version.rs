use crate::error::{AutoFlowError, Result};
use std::fmt;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse version from a tag string (e.g., "v1.2.3" -> Version(1,2,3)).
    ///
    /// Tags with duplicated 'v' prefixes (e.g. "vvv1.8.0") are normalized
    /// before parsing. This mirrors historical tag-cleanup behavior and is
    /// deliberately not extended further.
    pub fn parse(tag: &str) -> Result<Self> {
        let normalized = normalize_tag(tag);
        let clean_tag = normalized
            .trim_start_matches('v')
            .trim_start_matches('V');

        let parts: Vec<&str> = clean_tag.split('.').collect();
        if parts.len() != 3 {
            return Err(AutoFlowError::version(format!(
                "'{}' - expected vMAJOR.MINOR.PATCH",
                tag
            )));
        }

        let major = parts[0]
            .parse::<u32>()
            .map_err(|_| AutoFlowError::version(format!("invalid major component: {}", parts[0])))?;
        let minor = parts[1]
            .parse::<u32>()
            .map_err(|_| AutoFlowError::version(format!("invalid minor component: {}", parts[1])))?;
        let patch = parts[2]
            .parse::<u32>()
            .map_err(|_| AutoFlowError::version(format!("invalid patch component: {}", parts[2])))?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// Bump version according to bump type.
    ///
    /// Exactly one component is incremented; lower components reset to 0.
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => Version {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor + 1,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch + 1,
            },
        }
    }

    /// Format as a tag name ("v1.2.3")
    pub fn tag_name(&self) -> String {
        format!("v{}", self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

/// Collapse duplicated leading 'v' characters ("vvv1.8.0" -> "v1.8.0").
pub fn normalize_tag(tag: &str) -> String {
    if let Ok(re) = regex::Regex::new(r"^v+") {
        re.replace(tag, "v").to_string()
    } else {
        tag.to_string()
    }
}
