//! Index generation pipeline
//!
//! One linear pass over the APK directory: dump badging → parse → extract
//! icon → accumulate index entries, then sort and commit both index files.
//! The run is all-or-nothing: the first failing package aborts it before
//! either index document is written, so a published catalog is never missing
//! entries for packages that merely came later in the scan.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::badging::{self, parse_badging, Aapt, BadgingDumper, BadgingError};
use crate::config::{ConfigError, RepoConfig};
use crate::icon::{self, IconError};
use crate::index::{self, IndexBuilder, IndexError};
use crate::toolchain::{self, ToolchainError};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("toolchain error: {0}")]
    Toolchain(#[from] ToolchainError),

    #[error("failed to scan {}: {source}", .path.display())]
    ApkDirUnreadable {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("{apk}: {source}")]
    Package {
        apk: String,
        #[source]
        source: PackageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

/// Per-package failure, wrapped with the APK name by [`PipelineError::Package`]
#[derive(Debug, Error)]
pub enum PackageError {
    #[error(transparent)]
    Badging(#[from] BadgingError),

    #[error(transparent)]
    Icon(#[from] IconError),
}

impl PipelineError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Config(_) => 1,
            PipelineError::Toolchain(_) => 2,
            PipelineError::Package { .. } => 3,
            PipelineError::ApkDirUnreadable { .. }
            | PipelineError::Io(_)
            | PipelineError::Index(_) => 4,
        }
    }
}

/// What a successful run produced
#[derive(Debug)]
pub struct PipelineReport {
    pub packages: usize,
    pub sources: usize,
    pub index_path: PathBuf,
    pub index_min_path: PathBuf,
}

/// Resolve the real `aapt` dumper from the configured SDK root, falling
/// back to `$ANDROID_HOME`.
pub fn resolve_dumper(config: &RepoConfig) -> Result<Aapt, PipelineError> {
    let sdk_root = match &config.sdk_root {
        Some(root) => root.clone(),
        None => toolchain::sdk_root_from_env()?,
    };
    Ok(Aapt::new(toolchain::resolve_aapt(&sdk_root)?))
}

/// Run the full pipeline over every `*.apk` under the configured APK
/// directory, in file-name order.
///
/// Icons land in the icon directory as each package is processed; the two
/// index documents are committed together only after the last package
/// succeeds.
pub fn run(config: &RepoConfig, dumper: &dyn BadgingDumper) -> Result<PipelineReport, PipelineError> {
    let repo_dir = config.repo_dir();
    let apk_dir = config.apk_dir();
    let icon_dir = config.icon_dir();

    fs::create_dir_all(&icon_dir)?;

    let mut builder = IndexBuilder::new();

    for entry in WalkDir::new(&apk_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| PipelineError::ApkDirUnreadable {
            path: apk_dir.clone(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.ends_with(".apk") {
            continue;
        }

        process_package(entry.path(), &file_name, dumper, &icon_dir, &mut builder).map_err(
            |source| PipelineError::Package {
                apk: file_name.clone(),
                source,
            },
        )?;
        eprintln!("  indexed {}", file_name);
    }

    let index = builder.finish();
    let report = PipelineReport {
        packages: index.package_count(),
        sources: index.source_count(),
        index_path: repo_dir.join(index::INDEX_FILE),
        index_min_path: repo_dir.join(index::INDEX_MIN_FILE),
    };
    index.write_to_dir(&repo_dir)?;

    Ok(report)
}

fn process_package(
    apk: &Path,
    file_name: &str,
    dumper: &dyn BadgingDumper,
    icon_dir: &Path,
    builder: &mut IndexBuilder,
) -> Result<(), PackageError> {
    let text = dumper.dump(apk)?;
    let badging = parse_badging(&text)?;
    let lang = badging::language_tag(file_name)?;

    let icon_dest = icon_dir.join(format!("{}.png", badging.package_name));
    icon::extract_icon(apk, &badging.icon_path, &icon_dest)?;

    builder.push(&badging, file_name, &lang);
    Ok(())
}
