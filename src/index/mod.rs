//! Repository index documents (index.json, index.min.json)
//!
//! Both documents carry one entry per extension APK and are sorted by package
//! name. The full index is pretty-printed for human review and diffing; the
//! compact index drops the placeholder documentation flags and all extraneous
//! whitespace for transfer to clients. The two are built independently but
//! stay field-identical apart from that.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::badging::Badging;
use crate::source_id;

/// File name of the full, human-formatted index
pub const INDEX_FILE: &str = "index.json";

/// File name of the compact index
pub const INDEX_MIN_FILE: &str = "index.min.json";

/// Index serialization errors
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One source bundled inside an extension
///
/// `id` is the decimal rendering of the derived 63-bit identifier, which is
/// how the catalog format carries it. `base_url` is a reserved placeholder
/// and always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub name: String,

    pub lang: String,

    pub id: String,

    #[serde(rename = "baseUrl")]
    pub base_url: String,

    #[serde(rename = "versionId")]
    pub version_id: u32,
}

/// Full index entry
///
/// Serialized field order is the wire order. `has_readme` and `has_changelog`
/// are reserved markers populated by other tooling, always 0 here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub pkg: String,
    pub apk: String,
    pub lang: String,
    pub code: u32,
    pub version: String,
    pub nsfw: u8,

    #[serde(rename = "hasReadme")]
    pub has_readme: u8,

    #[serde(rename = "hasChangelog")]
    pub has_changelog: u8,

    pub sources: Vec<SourceEntry>,
}

/// Compact index entry: the full entry minus the placeholder flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMinEntry {
    pub name: String,
    pub pkg: String,
    pub apk: String,
    pub lang: String,
    pub code: u32,
    pub version: String,
    pub nsfw: u8,
    pub sources: Vec<SourceEntry>,
}

/// Build the per-source records for one extension.
///
/// One record per `;`-delimited name, each inheriting the extension's
/// language and versionId. The hashed name at index 0 may differ from the
/// stored name (see [`source_id::hashed_name`]).
pub fn source_entries(badging: &Badging, lang: &str) -> Vec<SourceEntry> {
    badging
        .source_names
        .iter()
        .enumerate()
        .map(|(i, name)| SourceEntry {
            name: name.clone(),
            lang: lang.to_string(),
            id: source_id::derive(source_id::hashed_name(i, name), badging.version_id).to_string(),
            base_url: String::new(),
            version_id: badging.version_id,
        })
        .collect()
}

impl IndexEntry {
    pub fn new(badging: &Badging, apk_name: &str, lang: &str) -> Self {
        Self {
            name: badging.application_label.clone(),
            pkg: badging.package_name.clone(),
            apk: apk_name.to_string(),
            lang: lang.to_string(),
            code: badging.version_code,
            version: badging.version_name.clone(),
            nsfw: badging.nsfw,
            has_readme: 0,
            has_changelog: 0,
            sources: source_entries(badging, lang),
        }
    }
}

impl IndexMinEntry {
    pub fn new(badging: &Badging, apk_name: &str, lang: &str) -> Self {
        Self {
            name: badging.application_label.clone(),
            pkg: badging.package_name.clone(),
            apk: apk_name.to_string(),
            lang: lang.to_string(),
            code: badging.version_code,
            version: badging.version_name.clone(),
            nsfw: badging.nsfw,
            sources: source_entries(badging, lang),
        }
    }
}

/// Accumulates both entry collections across a run.
///
/// Owned by the pipeline and passed into the per-package step; nothing global.
/// `finish` sorts and seals the collections, and only a sealed [`Index`] can
/// be written to disk, so a run that fails mid-way never commits.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    full: Vec<IndexEntry>,
    min: Vec<IndexMinEntry>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one extension to both collections.
    pub fn push(&mut self, badging: &Badging, apk_name: &str, lang: &str) {
        self.full.push(IndexEntry::new(badging, apk_name, lang));
        self.min.push(IndexMinEntry::new(badging, apk_name, lang));
    }

    /// Sort both collections by package name and seal them.
    pub fn finish(mut self) -> Index {
        self.full.sort_by(|a, b| a.pkg.cmp(&b.pkg));
        self.min.sort_by(|a, b| a.pkg.cmp(&b.pkg));
        Index {
            full: self.full,
            min: self.min,
        }
    }
}

/// The sealed, sorted index pair, ready for serialization.
#[derive(Debug)]
pub struct Index {
    pub full: Vec<IndexEntry>,
    pub min: Vec<IndexMinEntry>,
}

impl Index {
    /// Number of indexed extensions
    pub fn package_count(&self) -> usize {
        self.full.len()
    }

    /// Total number of source records across all extensions
    pub fn source_count(&self) -> usize {
        self.full.iter().map(|e| e.sources.len()).sum()
    }

    /// Serialize the full index: 2-space indent, stable field order,
    /// non-ASCII text verbatim.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.full)
    }

    /// Serialize the compact index: no extraneous whitespace.
    pub fn to_min_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.min)
    }

    /// Write both documents under `dir`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<(), IndexError> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(INDEX_FILE), self.to_json()?)?;
        fs::write(dir.join(INDEX_MIN_FILE), self.to_min_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_badging() -> Badging {
        Badging {
            package_name: "eu.kanade.tachiyomi.animeextension.en.foo".to_string(),
            application_label: "Aniyomi: Foo".to_string(),
            version_code: 14,
            version_name: "14.3.1".to_string(),
            icon_path: "res/mipmap-xhdpi-v4/ic_launcher.png".to_string(),
            nsfw: 0,
            version_id: 7,
            source_names: vec!["Foo".to_string(), "Bar".to_string()],
        }
    }

    #[test]
    fn test_source_entries_fan_out() {
        let entries = source_entries(&sample_badging(), "en");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Foo");
        assert_eq!(entries[0].lang, "en");
        assert_eq!(entries[0].id, source_id::derive("Foo", 7).to_string());
        assert_eq!(entries[0].base_url, "");
        assert_eq!(entries[0].version_id, 7);
        assert_eq!(entries[1].name, "Bar");
        assert_eq!(entries[1].lang, "en");
        assert_eq!(entries[1].id, source_id::derive("Bar", 7).to_string());
        assert_eq!(entries[1].version_id, 7);
    }

    #[test]
    fn test_source_entries_jellyfin_shim_keeps_display_name() {
        let mut badging = sample_badging();
        badging.version_id = 3;
        badging.source_names = vec!["Jellyfin Anime".to_string(), "Other".to_string()];

        let entries = source_entries(&badging, "all");

        assert_eq!(entries[0].name, "Jellyfin Anime");
        assert_eq!(entries[0].id, source_id::derive("Jellyfin", 3).to_string());
        assert_eq!(entries[1].id, source_id::derive("Other", 3).to_string());
    }

    #[test]
    fn test_full_and_min_entries_stay_field_identical() {
        let badging = sample_badging();
        let full = IndexEntry::new(&badging, "aniyomi-en.foo-v14.3.1.apk", "en");
        let min = IndexMinEntry::new(&badging, "aniyomi-en.foo-v14.3.1.apk", "en");

        assert_eq!(full.name, min.name);
        assert_eq!(full.pkg, min.pkg);
        assert_eq!(full.apk, min.apk);
        assert_eq!(full.lang, min.lang);
        assert_eq!(full.code, min.code);
        assert_eq!(full.version, min.version);
        assert_eq!(full.nsfw, min.nsfw);
        assert_eq!(full.sources, min.sources);
        assert_eq!(full.has_readme, 0);
        assert_eq!(full.has_changelog, 0);
    }

    #[test]
    fn test_finish_sorts_both_collections_by_pkg() {
        let mut builder = IndexBuilder::new();
        for pkg in ["zzz", "aaa", "mmm"] {
            let mut badging = sample_badging();
            badging.package_name = format!("eu.kanade.tachiyomi.animeextension.en.{}", pkg);
            builder.push(&badging, "aniyomi-en.x.apk", "en");
        }

        let index = builder.finish();

        let full_pkgs: Vec<_> = index.full.iter().map(|e| e.pkg.as_str()).collect();
        let min_pkgs: Vec<_> = index.min.iter().map(|e| e.pkg.as_str()).collect();
        assert_eq!(
            full_pkgs,
            vec![
                "eu.kanade.tachiyomi.animeextension.en.aaa",
                "eu.kanade.tachiyomi.animeextension.en.mmm",
                "eu.kanade.tachiyomi.animeextension.en.zzz",
            ]
        );
        assert_eq!(full_pkgs, min_pkgs);
    }

    #[test]
    fn test_full_json_shape() {
        let mut badging = sample_badging();
        badging.source_names = vec!["Foo".to_string()];
        let mut builder = IndexBuilder::new();
        builder.push(&badging, "aniyomi-en.foo-v14.3.1.apk", "en");

        let json = builder.finish().to_json().unwrap();

        let expected = format!(
            r#"[
  {{
    "name": "Aniyomi: Foo",
    "pkg": "eu.kanade.tachiyomi.animeextension.en.foo",
    "apk": "aniyomi-en.foo-v14.3.1.apk",
    "lang": "en",
    "code": 14,
    "version": "14.3.1",
    "nsfw": 0,
    "hasReadme": 0,
    "hasChangelog": 0,
    "sources": [
      {{
        "name": "Foo",
        "lang": "en",
        "id": "{}",
        "baseUrl": "",
        "versionId": 7
      }}
    ]
  }}
]"#,
            source_id::derive("Foo", 7)
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_min_json_is_compact_and_drops_placeholders() {
        let mut builder = IndexBuilder::new();
        builder.push(&sample_badging(), "aniyomi-en.foo-v14.3.1.apk", "en");
        let index = builder.finish();

        let json = index.to_min_json().unwrap();

        assert!(!json.contains('\n'));
        assert!(!json.contains("\": "));
        assert!(!json.contains("hasReadme"));
        assert!(!json.contains("hasChangelog"));
    }

    #[test]
    fn test_json_preserves_non_ascii_verbatim() {
        let mut badging = sample_badging();
        badging.application_label = "Аниме: アニメ".to_string();
        let mut builder = IndexBuilder::new();
        builder.push(&badging, "aniyomi-en.foo.apk", "en");
        let index = builder.finish();

        assert!(index.to_json().unwrap().contains("Аниме: アニメ"));
        assert!(index.to_min_json().unwrap().contains("Аниме: アニメ"));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut builder = IndexBuilder::new();
        builder.push(&sample_badging(), "aniyomi-en.foo.apk", "en");
        let index = builder.finish();

        index.write_to_dir(dir.path()).unwrap();

        let full = std::fs::read_to_string(dir.path().join(INDEX_FILE)).unwrap();
        let min = std::fs::read_to_string(dir.path().join(INDEX_MIN_FILE)).unwrap();
        assert_eq!(full, index.to_json().unwrap());
        assert_eq!(min, index.to_min_json().unwrap());
    }
}
