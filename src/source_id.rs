//! Stable source identifier derivation
//!
//! Every source bundled in an extension APK gets a 63-bit identifier that
//! clients use to track "same logical source, new version" across releases.
//! The identifier is a function of the source name and the extension's
//! versionId only, so repeated runs over the same inputs produce the same
//! catalog bytes.

use md5::{Digest, Md5};

/// Mask clearing the sign bit, keeping the result representable as a
/// non-negative i64.
pub const ID_MASK: u64 = 0x7FFF_FFFF_FFFF_FFFF;

/// Derive the identifier for a (source name, versionId) pair.
///
/// The key is `lowercase(name) + "/all/" + versionId`; the identifier is the
/// first 8 bytes of its MD5 digest read big-endian, with the sign bit
/// cleared. Deterministic, no I/O.
pub fn derive(name: &str, version_id: u32) -> u64 {
    let key = format!("{}/all/{}", name.to_lowercase(), version_id);
    let digest = Md5::digest(key.as_bytes());

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) & ID_MASK
}

/// The name actually hashed for the source at position `index` in an
/// extension's name list.
///
/// The first source of the Jellyfin extension was renamed after its ids were
/// already published, so the legacy name is substituted when hashing to keep
/// those ids stable. Applies to index 0 only, on a substring match.
// TODO: drop the substitution once the Jellyfin extension ships a versionId bump
pub fn hashed_name(index: usize, name: &str) -> &str {
    if index == 0 && name.contains("Jellyfin") {
        "Jellyfin"
    } else {
        name
    }
}
