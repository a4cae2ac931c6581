//! Aniyomi extension repository index generator
//!
//! This crate builds the machine-readable catalog for a directory of Aniyomi
//! extension APKs: it extracts each package's badging metadata, derives a
//! stable 63-bit identifier per bundled source, pulls out the launcher icons,
//! and writes the `index.json` / `index.min.json` pair clients use for
//! discovery and installation.

pub mod badging;
pub mod config;
pub mod icon;
pub mod index;
pub mod pipeline;
pub mod source_id;
pub mod toolchain;

pub use badging::{Aapt, Badging, BadgingDumper, BadgingError};
pub use config::RepoConfig;
pub use index::{Index, IndexBuilder, IndexEntry, IndexMinEntry, SourceEntry};
pub use pipeline::{PipelineError, PipelineReport};
