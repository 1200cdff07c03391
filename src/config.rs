use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AutoFlowError, Result};

/// Represents the complete configuration for git-autoflow.
///
/// Covers the remote name, the external classifier command, and how much
/// commit history feeds the classification.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default = "default_commit_limit")]
    pub commit_limit: usize,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_limit() -> usize {
    10
}

/// Configuration for the external change classifier.
///
/// The command receives the classification request as its final argument
/// (a JSON document) and must print the analysis JSON on stdout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
            classifier: ClassifierConfig::default(),
            commit_limit: default_commit_limit(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitautoflow.toml` in current directory
/// 3. `~/.config/.gitautoflow.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitautoflow.toml").exists() {
        fs::read_to_string("./gitautoflow.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitautoflow.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| AutoFlowError::config(format!("invalid configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.remote, "origin");
        assert_eq!(config.commit_limit, 10);
        assert!(config.classifier.command.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            remote = "upstream"

            [classifier]
            command = ["autoflow-classify", "--model", "default"]
            "#,
        )
        .unwrap();

        assert_eq!(config.remote, "upstream");
        assert_eq!(config.commit_limit, 10);
        assert_eq!(
            config.classifier.command,
            vec!["autoflow-classify", "--model", "default"]
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_config_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitautoflow.toml");
        fs::write(&path, "commit_limit = \"lots\"").unwrap();

        let err = load_config(Some(path.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, AutoFlowError::Config(_)));
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "remote = \"fork\"").unwrap();

        let config = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.remote, "fork");
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        assert!(load_config(Some("/nonexistent/gitautoflow.toml")).is_err());
    }
}
