//! Vault path handling
//!
//! A KV v2 path looks like `<mount>/data/<key...>`. External-secrets only
//! wants the `<key...>` part; the mount is configured on the store.

use crate::error::{ConvertError, Result};

/// Segment separating the KV mount from the secret key
const DATA_SEGMENT: &str = "data";

/// Extract the remote key from a vault path.
///
/// Everything after the rightmost `data` segment is the key, so
/// `secret/data/bar/foo` yields `bar/foo`.
pub fn remote_key(path: &str) -> Result<String> {
    let parts: Vec<&str> = path.split('/').collect();

    match parts.iter().rposition(|part| *part == DATA_SEGMENT) {
        Some(index) if index + 1 < parts.len() => Ok(parts[index + 1..].join("/")),
        _ => Err(ConvertError::IllegalVaultPath(path.to_string())),
    }
}
