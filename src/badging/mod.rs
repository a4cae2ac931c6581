//! Badging extraction for extension APKs
//!
//! An extension's identity, version, and bundled source list all live in its
//! Android manifest, read here through `aapt dump --include-meta-data badging`.
//! The invocation is kept behind the [`BadgingDumper`] trait so the parser can
//! be exercised (and the pipeline integration-tested) without an Android SDK,
//! and so a structured dump mode could replace the text scraping without
//! touching callers.

mod parser;

pub use parser::parse_badging;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Badging extraction errors
#[derive(Debug, thiserror::Error)]
pub enum BadgingError {
    #[error("failed to invoke {tool}: {source}")]
    Invoke { tool: String, source: io::Error },

    #[error("{tool} failed with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("no match for required field: {field}")]
    FieldNotFound { field: &'static str },

    #[error("field {field} is not an integer: '{value}'")]
    InvalidInteger { field: &'static str, value: String },
}

/// Metadata extracted from one APK's badging dump
///
/// Every field is required; a dump missing any of them fails extraction with
/// the field named in the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badging {
    /// Reverse-domain package identifier, the sort/dedup key downstream
    pub package_name: String,

    /// Human-readable display name (`application-label`)
    pub application_label: String,

    /// Monotonic build counter (`versionCode`)
    pub version_code: u32,

    /// Display version string (`versionName`)
    pub version_name: String,

    /// Archive-relative path of the 320 dpi launcher icon
    pub icon_path: String,

    /// Adult-content flag, 0 or 1
    pub nsfw: u8,

    /// Identifier-generation epoch, distinct from `version_code`
    pub version_id: u32,

    /// Bundled source names, in declaration order (index 0 is special-cased
    /// by the identifier derivation)
    pub source_names: Vec<String>,
}

/// Produces the badging text for an APK.
pub trait BadgingDumper {
    fn dump(&self, apk: &Path) -> Result<String, BadgingError>;
}

/// The real dumper: spawns `aapt dump --include-meta-data badging <apk>`
/// and captures its stdout. One blocking child process per call.
#[derive(Debug, Clone)]
pub struct Aapt {
    path: PathBuf,
}

impl Aapt {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BadgingDumper for Aapt {
    fn dump(&self, apk: &Path) -> Result<String, BadgingError> {
        let tool = self.path.display().to_string();

        let output = Command::new(&self.path)
            .arg("dump")
            .arg("--include-meta-data")
            .arg("badging")
            .arg(apk)
            .output()
            .map_err(|source| BadgingError::Invoke {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BadgingError::ToolFailed {
                tool,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extract the language tag from an APK file name.
///
/// The repo's naming convention embeds it as the segment after the literal
/// `aniyomi-` marker, up to the next dot: `aniyomi-en.animepahe-v14.3.1.apk`
/// carries `en`.
pub fn language_tag(file_name: &str) -> Result<String, BadgingError> {
    Regex::new(r"aniyomi-([^.]+)")
        .unwrap()
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(BadgingError::FieldNotFound { field: "language" })
}
