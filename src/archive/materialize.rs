//! Managed copies of tracked originals.
//!
//! Every tracked entry gets one durable copy inside the archive directory,
//! so the recent-items list keeps working when the original disappears
//! (ejected volume, deleted source, sandboxed origin).

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;

use super::ArchiveError;

/// Derive the managed file name for an original location.
///
/// Keyed on the location alone, never on mutable entry metadata, so a
/// refreshed re-add of the same source always lands on the existing copy.
pub fn derived_file_name(location: &Path, preferred_extension: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(location.to_string_lossy().as_bytes());
    let digest = hasher.finalize();

    let stem = hex::encode(&digest[..8]);
    if preferred_extension.is_empty() {
        stem
    } else {
        format!("{stem}.{preferred_extension}")
    }
}

/// Copy the bytes at `location` to their derived name under `directory`.
///
/// Idempotent per original location: an existing copy is reused untouched.
/// Fails when the source cannot be read or the directory cannot be written;
/// the caller commits nothing in that case.
pub async fn materialize(
    directory: &Path,
    location: &Path,
    preferred_extension: &str,
) -> Result<PathBuf, ArchiveError> {
    let copy = directory.join(derived_file_name(location, preferred_extension));

    if !copy.exists() {
        fs::copy(location, &copy).await?;
    }

    Ok(copy)
}

/// Best-effort removal of a materialized copy.
///
/// Failures are logged, never returned: the in-memory archive is the source
/// of truth, and an orphaned file on disk must not block forward progress.
pub async fn discard(copy: &Path) {
    if let Err(e) = fs::remove_file(copy).await {
        tracing::warn!("Failed to remove managed copy {}: {}", copy.display(), e);
    }
}
