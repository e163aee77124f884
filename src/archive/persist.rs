//! Durable storage of the archive document.
//!
//! One JSON state file with a fixed name inside the managed directory,
//! rewritten in full after every mutation. History is best-effort: a state
//! file that cannot be read is treated as "no history", never as a startup
//! failure.

use std::path::{Path, PathBuf};

use tokio::fs;

use super::store::{Archive, SCHEMA_VERSION};
use super::ArchiveError;

/// Fixed name of the state file inside the managed directory
pub const STATE_FILE: &str = "recents.json";

/// Path of the state file under `directory`
pub fn state_path(directory: &Path) -> PathBuf {
    directory.join(STATE_FILE)
}

/// Load the persisted archive.
///
/// Missing, unreadable, corrupt, or wrong-revision state all degrade to an
/// empty archive.
pub async fn load(directory: &Path) -> Archive {
    let path = state_path(directory);

    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(_) => return Archive::empty(),
    };

    match serde_json::from_str::<Archive>(&content) {
        Ok(archive) if archive.version == SCHEMA_VERSION => archive,
        Ok(archive) => {
            tracing::warn!(
                "Discarding archive state at {} with unsupported version {}",
                path.display(),
                archive.version
            );
            Archive::empty()
        }
        Err(e) => {
            tracing::warn!("Ignoring corrupt archive state at {}: {}", path.display(), e);
            Archive::empty()
        }
    }
}

/// Write the archive document.
///
/// Writes to a temporary sibling first and renames it into place, so a
/// reader never observes a half-written state file.
pub async fn save(directory: &Path, archive: &Archive) -> Result<(), ArchiveError> {
    let path = state_path(directory);
    let staging = directory.join(format!("{STATE_FILE}.tmp"));

    let content = serde_json::to_string_pretty(archive)?;
    fs::write(&staging, content).await?;
    fs::rename(&staging, &path).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecentEntry;
    use tempfile::TempDir;

    fn create_entry(dir: &TempDir, name: &str) -> RecentEntry {
        let path = dir.path().join(name);
        std::fs::write(&path, b"contents").unwrap();
        RecentEntry::new(path).unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_state_is_empty() {
        let dir = TempDir::new().unwrap();
        let archive = load(dir.path()).await;
        assert!(archive.is_empty());
        assert!(archive.copies.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();

        let mut archive = Archive::empty();
        let entry = create_entry(&dir, "song.mp3").with_display_name("Favorite song");
        archive.insert(entry.clone(), dir.path().join("abcd.mp3"));

        save(dir.path(), &archive).await.unwrap();
        let loaded = load(dir.path()).await;

        assert_eq!(loaded.entries, archive.entries);
        assert_eq!(loaded.copies, archive.copies);
        assert_eq!(loaded.version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_saved_document_is_byte_stable() {
        let dir = TempDir::new().unwrap();

        let mut archive = Archive::empty();
        archive.insert(create_entry(&dir, "b.txt"), dir.path().join("2.txt"));
        archive.insert(create_entry(&dir, "a.txt"), dir.path().join("1.txt"));

        save(dir.path(), &archive).await.unwrap();
        let first = std::fs::read(state_path(dir.path())).unwrap();

        let reloaded = load(dir.path()).await;
        save(dir.path(), &reloaded).await.unwrap();
        let second = std::fs::read(state_path(dir.path())).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_corrupt_state_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(state_path(dir.path()), b"{ not json").unwrap();

        let archive = load(dir.path()).await;
        assert!(archive.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_version_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            state_path(dir.path()),
            br#"{"version": 99, "entries": [], "copies": {}}"#,
        )
        .unwrap();

        let archive = load(dir.path()).await;
        assert!(archive.is_empty());
        assert_eq!(archive.version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_save_leaves_no_staging_file_behind() {
        let dir = TempDir::new().unwrap();
        save(dir.path(), &Archive::empty()).await.unwrap();

        assert!(state_path(dir.path()).exists());
        assert!(!dir.path().join(format!("{STATE_FILE}.tmp")).exists());
    }
}
