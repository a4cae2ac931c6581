//! Android build-tools resolution
//!
//! The badging dump comes from `aapt`, which ships inside the Android SDK as
//! `$ANDROID_HOME/build-tools/<version>/aapt`. Several versions are commonly
//! installed side by side; the highest one (last in the sorted directory
//! listing) wins.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming the Android SDK root
pub const SDK_ROOT_ENV: &str = "ANDROID_HOME";

/// Toolchain resolution errors
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    #[error("ANDROID_HOME is not set and no sdk_root was configured")]
    SdkRootUnset,

    #[error("failed to list {}: {source}", .path.display())]
    SdkUnreadable { path: PathBuf, source: io::Error },

    #[error("no build-tools installations under {}", .path.display())]
    NoBuildTools { path: PathBuf },
}

/// Read the SDK root from the environment.
pub fn sdk_root_from_env() -> Result<PathBuf, ToolchainError> {
    env::var_os(SDK_ROOT_ENV)
        .map(PathBuf::from)
        .ok_or(ToolchainError::SdkRootUnset)
}

/// Resolve the `aapt` binary under an SDK root.
///
/// Picks the highest-versioned `build-tools` installation by lexicographic
/// directory-name order.
pub fn resolve_aapt(sdk_root: &Path) -> Result<PathBuf, ToolchainError> {
    let build_tools = sdk_root.join("build-tools");

    let newest = fs::read_dir(&build_tools)
        .map_err(|source| ToolchainError::SdkUnreadable {
            path: build_tools.clone(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name())
        .max()
        .ok_or(ToolchainError::NoBuildTools {
            path: build_tools.clone(),
        })?;

    Ok(build_tools.join(newest).join("aapt"))
}
