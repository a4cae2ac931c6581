//! Icon extraction from extension APKs
//!
//! An APK is a zip container; the badging dump names the launcher icon entry
//! inside it. The entry's bytes are copied verbatim to the repo's icon
//! directory.

use std::fs::File;
use std::io;
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

/// Icon extraction errors
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read archive: {0}")]
    Archive(#[from] ZipError),

    #[error("archive has no entry '{entry}'")]
    EntryMissing { entry: String },
}

/// Copy the archive entry at `entry` out of `apk` into `dest`.
///
/// All handles are scoped to this call, so nothing leaks across the many
/// packages a run processes even when it fails early.
pub fn extract_icon(apk: &Path, entry: &str, dest: &Path) -> Result<(), IconError> {
    let file = File::open(apk)?;
    let mut archive = ZipArchive::new(file)?;

    let mut icon = match archive.by_name(entry) {
        Ok(icon) => icon,
        Err(ZipError::FileNotFound) => {
            return Err(IconError::EntryMissing {
                entry: entry.to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let mut out = File::create(dest)?;
    io::copy(&mut icon, &mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-icon-bytes";

    fn write_apk(path: &Path, entry: &str, bytes: &[u8]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        writer
            .start_file(entry, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(bytes).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_copies_bytes_verbatim() {
        let dir = TempDir::new().unwrap();
        let apk = dir.path().join("ext.apk");
        let dest = dir.path().join("ext.png");
        write_apk(&apk, "res/mipmap-xhdpi-v4/ic_launcher.png", PNG_BYTES);

        extract_icon(&apk, "res/mipmap-xhdpi-v4/ic_launcher.png", &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), PNG_BYTES);
    }

    #[test]
    fn test_extract_missing_entry() {
        let dir = TempDir::new().unwrap();
        let apk = dir.path().join("ext.apk");
        let dest = dir.path().join("ext.png");
        write_apk(&apk, "res/other.png", PNG_BYTES);

        let err = extract_icon(&apk, "res/missing.png", &dest).unwrap_err();

        match err {
            IconError::EntryMissing { entry } => assert_eq!(entry, "res/missing.png"),
            other => panic!("expected EntryMissing, got {:?}", other),
        }
        assert!(!dest.exists());
    }

    #[test]
    fn test_extract_unreadable_archive() {
        let dir = TempDir::new().unwrap();
        let apk = dir.path().join("ext.apk");
        let dest = dir.path().join("ext.png");
        fs::write(&apk, b"not a zip archive").unwrap();

        let err = extract_icon(&apk, "res/icon.png", &dest).unwrap_err();
        assert!(matches!(err, IconError::Archive(_)));
    }
}
