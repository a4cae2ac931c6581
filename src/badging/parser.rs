//! Badging text parser
//!
//! Extracts the fields the index needs from an `aapt dump badging` text dump.
//! The patterns are deliberately exact reproductions of the labels aapt
//! prints; a missing label is a hard error naming the field.

use regex_lite::Regex;
use std::str::FromStr;

use super::{Badging, BadgingError};

/// Parse one APK's badging dump.
///
/// Package name, versionCode, and versionName come from the first line
/// starting with `package: ` and only that line. The label and icon patterns
/// anchor at line start; the `tachiyomi.animeextension.*` meta-data values
/// are matched anywhere.
pub fn parse_badging(text: &str) -> Result<Badging, BadgingError> {
    let package_line = text
        .lines()
        .find(|line| line.starts_with("package: "))
        .ok_or(BadgingError::FieldNotFound { field: "package" })?;

    let package_name = capture(r"package: name='([^']+)'", package_line, "package name")?;
    let version_code = capture(r"versionCode='([^']+)'", package_line, "versionCode")?;
    let version_name = capture(r"versionName='([^']+)'", package_line, "versionName")?;

    let application_label = capture(
        r"(?m)^application-label:'([^']+)'",
        text,
        "application-label",
    )?;
    let icon_path = capture(
        r"(?m)^application-icon-320:'([^']+)'",
        text,
        "application-icon-320",
    )?;

    let nsfw = capture(
        r"'tachiyomi\.animeextension\.nsfw' value='([^']+)'",
        text,
        "tachiyomi.animeextension.nsfw",
    )?;
    let version_id = capture(
        r"'tachiyomi\.animeextension\.versionId' value='([^']+)'",
        text,
        "tachiyomi.animeextension.versionId",
    )?;
    let names = capture(
        r"'tachiyomi\.animeextension\.names' value='([^']+)'",
        text,
        "tachiyomi.animeextension.names",
    )?;

    Ok(Badging {
        package_name,
        application_label,
        version_code: parse_int(&version_code, "versionCode")?,
        version_name,
        icon_path,
        nsfw: parse_int(&nsfw, "tachiyomi.animeextension.nsfw")?,
        version_id: parse_int(&version_id, "tachiyomi.animeextension.versionId")?,
        source_names: names.split(';').map(str::to_string).collect(),
    })
}

fn capture(pattern: &str, text: &str, field: &'static str) -> Result<String, BadgingError> {
    Regex::new(pattern)
        .unwrap()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(BadgingError::FieldNotFound { field })
}

fn parse_int<T: FromStr>(value: &str, field: &'static str) -> Result<T, BadgingError> {
    value.parse().map_err(|_| BadgingError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}
