//! Repository configuration (aniyomi-index.toml)
//!
//! All fields are optional; the defaults reproduce the conventional repo
//! layout (`repo/` with `apk/` and `icon/` inside it). Precedence is
//! defaults → config file → CLI flags, the flags being applied by the caller.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default config file name, used when present in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "aniyomi-index.toml";

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository root holding the index files (default: "repo")
    pub repo_dir: Option<PathBuf>,

    /// Directory of input APKs (default: "<repo_dir>/apk")
    pub apk_dir: Option<PathBuf>,

    /// Directory receiving extracted icons (default: "<repo_dir>/icon")
    pub icon_dir: Option<PathBuf>,

    /// Android SDK root (default: $ANDROID_HOME)
    pub sdk_root: Option<PathBuf>,
}

impl RepoConfig {
    /// Load and parse config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: RepoConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("repo_dir", &self.repo_dir),
            ("apk_dir", &self.apk_dir),
            ("icon_dir", &self.icon_dir),
            ("sdk_root", &self.sdk_root),
        ] {
            if let Some(path) = value {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "'{}' must not be empty",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    /// The repository root
    pub fn repo_dir(&self) -> PathBuf {
        self.repo_dir.clone().unwrap_or_else(|| PathBuf::from("repo"))
    }

    /// The APK input directory
    pub fn apk_dir(&self) -> PathBuf {
        self.apk_dir
            .clone()
            .unwrap_or_else(|| self.repo_dir().join("apk"))
    }

    /// The icon output directory
    pub fn icon_dir(&self) -> PathBuf {
        self.icon_dir
            .clone()
            .unwrap_or_else(|| self.repo_dir().join("icon"))
    }
}
