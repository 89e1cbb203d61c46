//! Runtime configuration
//!
//! Read from `<config dir>/flashdeck/config.toml` (or an explicit path):
//! ```toml
//! data_dir = "/home/me/flashcards"
//! uploads_dir = "flashcards"
//! conflict_policy = "merge"   # overwrite | reject | merge
//!
//! [fetch]
//! timeout_secs = 10
//! allow_remote = true
//! ```
//! `FLASHDECK_DATA_DIR` overrides `data_dir`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activity::{ActivityStore, ConflictPolicy};
use crate::deck::{DefaultFetcher, FetchError};
use crate::repository::DeckRepository;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FLASHDECK_DATA_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Could not determine the data directory")]
    DataDirNotFound,

    #[error("Fetch setup error: {0}")]
    Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root that relative deck ids are resolved against (default: working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Directory under `data_dir` receiving uploaded decks
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_allow_remote")]
    pub allow_remote: bool,
}

fn default_uploads_dir() -> String {
    "flashcards".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_allow_remote() -> bool {
    true
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            allow_remote: default_allow_remote(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            uploads_dir: default_uploads_dir(),
            conflict_policy: ConflictPolicy::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flashdeck").join("config.toml"))
    }

    /// Load from `path` (must exist) or the default location (may be absent),
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        log::debug!("Loaded configuration from {:?}", path);
        Ok(toml::from_str(&content)?)
    }

    /// Effective data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => env::current_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }

    pub fn fetcher(&self) -> Result<DefaultFetcher> {
        if self.fetch.allow_remote {
            Ok(DefaultFetcher::new(Duration::from_secs(self.fetch.timeout_secs))?)
        } else {
            Ok(DefaultFetcher::local_only())
        }
    }

    pub fn repository(&self) -> Result<DeckRepository> {
        Ok(DeckRepository::new(self.data_dir()?, Box::new(self.fetcher()?)))
    }

    /// A fresh, unbound activity store using this configuration
    pub fn activity_store(&self) -> Result<ActivityStore> {
        Ok(ActivityStore::new(self.data_dir()?).with_policy(self.conflict_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.data_dir.is_none());
        assert_eq!(config.uploads_dir, "flashcards");
        assert_eq!(config.conflict_policy, ConflictPolicy::Merge);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert!(config.fetch.allow_remote);
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
data_dir = "/srv/decks"
uploads_dir = "incoming"
conflict_policy = "reject"

[fetch]
allow_remote = false
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/decks")));
        assert_eq!(config.uploads_dir, "incoming");
        assert_eq!(config.conflict_policy, ConflictPolicy::Reject);
        assert!(!config.fetch.allow_remote);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/srv/decks"));
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(r#"conflict_policy = "yolo""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
