//! Planner runtime configuration.
//!
//! # Responsibility
//! - Load settings from an optional TOML file.
//! - Layer `PLANNER_*` environment overrides on top.
//!
//! # Invariants
//! - Missing keys fall back to defaults; unknown keys are rejected.
//! - Loading never touches the database or logging backends.

use crate::scoring::priority::ScoringPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "planner.sqlite3";

pub const ENV_DB_PATH: &str = "PLANNER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PLANNER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PLANNER_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Settings shared by every planner entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub database_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub scoring: ScoringPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl PlannerConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `PLANNER_*` overrides using the given variable lookup.
    ///
    /// Blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
    }

    /// Applies overrides from the process environment.
    pub fn with_process_env(mut self) -> Self {
        self.apply_env_overrides(|key| std::env::var(key).ok());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{PlannerConfig, ENV_DB_PATH, ENV_LOG_DIR};
    use crate::scoring::priority::RangePolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_use_strict_scoring() {
        let config = PlannerConfig::default();
        assert_eq!(config.scoring.range_policy, RangePolicy::Reject);
        assert!(!config.scoring.legacy_fallback);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn toml_fills_missing_keys_with_defaults() {
        let config = PlannerConfig::from_toml_str(
            r#"
            database_path = "/var/lib/planner/planner.sqlite3"

            [scoring]
            legacy_fallback = true
            "#,
        )
        .expect("config should parse");

        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/planner/planner.sqlite3")
        );
        assert!(config.scoring.legacy_fallback);
        assert_eq!(config.scoring.range_policy, RangePolicy::Reject);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(PlannerConfig::from_toml_str("databse_path = \"x\"").is_err());
    }

    #[test]
    fn env_overrides_replace_non_blank_values() {
        let env = HashMap::from([
            (ENV_DB_PATH, "/tmp/override.sqlite3".to_string()),
            (ENV_LOG_DIR, "   ".to_string()),
        ]);
        let mut config = PlannerConfig::default();
        config.apply_env_overrides(|key| env.get(key).cloned());

        assert_eq!(config.database_path, PathBuf::from("/tmp/override.sqlite3"));
        assert!(config.log_dir.is_none());
    }
}
