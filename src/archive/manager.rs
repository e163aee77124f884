//! Public facade over the recent-items archive.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::RecentEntry;

use super::store::{Archive, Resolution};
use super::{materialize, persist, ArchiveError};

/// Bounded, recency-ordered record of files the user has opened.
///
/// One instance exclusively owns its managed directory and the state file
/// inside it; pointing two instances at the same directory is unsupported
/// and can corrupt state. Mutations take `&mut self`, so the single-writer
/// discipline the archive requires is enforced by the borrow checker.
///
/// All operations run to completion on the calling task and block on file
/// I/O; a host with a latency-sensitive context should drive the archive
/// from a background task and render the snapshots it publishes.
pub struct RecentFiles {
    directory: PathBuf,
    limit: usize,
    archive: Archive,
    changes: watch::Sender<Vec<RecentEntry>>,
}

impl RecentFiles {
    /// Open the archive rooted at `directory`, creating the directory if it
    /// does not exist and loading any persisted history.
    ///
    /// `limit` is the capacity bound, fixed for the lifetime of the
    /// instance; a zero limit is treated as one. Hosts without an opinion
    /// pass [`config::DEFAULT_LIMIT`](crate::config::DEFAULT_LIMIT) and a
    /// directory from
    /// [`config::default_archive_dir`](crate::config::default_archive_dir).
    pub async fn open(directory: impl Into<PathBuf>, limit: usize) -> Result<Self, ArchiveError> {
        let directory = directory.into();

        if !directory.is_absolute() {
            return Err(ArchiveError::InvalidLocation(directory));
        }

        if directory.exists() {
            if !directory.is_dir() {
                return Err(ArchiveError::Conflict(directory));
            }
        } else {
            fs::create_dir_all(&directory).await?;
        }

        let archive = persist::load(&directory).await;
        let (changes, _) = watch::channel(archive.entries.clone());

        Ok(Self {
            directory,
            limit: limit.max(1),
            archive,
            changes,
        })
    }

    /// Record that `entry` was just opened.
    ///
    /// A location already tracked (as an original, or as one of our managed
    /// copies) is promoted to the front instead of duplicated. A genuinely
    /// new location is materialized into the managed directory first; if
    /// that copy fails, the archive is left exactly as it was. Committing a
    /// new entry evicts the least-recently-promoted entries (and their
    /// copies) until the list fits the limit.
    pub async fn add(&mut self, entry: RecentEntry) -> Result<(), ArchiveError> {
        match self.archive.resolve(&entry) {
            Resolution::ManagedCopy(index) => {
                // The user reopened our own copy. Keep the tracked entry's
                // identity; just move it up.
                self.archive.promote(index);
            }
            Resolution::SameOriginal(index) => {
                // Same source opened again, possibly with a newer timestamp
                // or name. The copy already on disk stays.
                self.archive.refresh(index, entry);
            }
            Resolution::New => {
                // Materialize before touching any state: the copy is the
                // only step that can fail, and a failed add must change
                // nothing.
                let copy = materialize::materialize(
                    &self.directory,
                    &entry.location,
                    entry.preferred_extension(),
                )
                .await?;

                for (evicted, stale_copy) in self.archive.evict_for_insert(self.limit) {
                    debug!(
                        "Evicting {} to stay within the limit of {}",
                        evicted.location.display(),
                        self.limit
                    );
                    if let Some(stale) = stale_copy {
                        materialize::discard(&stale).await;
                    }
                }

                self.archive.insert(entry, copy);
            }
        }

        self.commit().await;
        Ok(())
    }

    /// Drop `entry` from the archive.
    ///
    /// Matches on the full entry value; an entry that is not present is a
    /// no-op. The materialized copy is discarded too, best-effort, so a
    /// forgotten item releases its storage.
    pub async fn forget(&mut self, entry: &RecentEntry) {
        let Some(removed) = self.archive.remove(entry) else {
            return;
        };

        if let Some(copy) = self.archive.copies.remove(&removed.location) {
            materialize::discard(&copy).await;
        }

        self.commit().await;
    }

    /// Discard all entries, all materialized copies, and the persisted
    /// state.
    ///
    /// The managed directory is moved aside, deleted, and recreated empty.
    /// Destructive and unconfirmed at this layer; asking the user first is
    /// the host's job.
    pub async fn clear(&mut self) -> Result<(), ArchiveError> {
        self.archive = Archive::empty();

        let discarded = self.discarded_directory();
        // A leftover from an interrupted clear would block the rename.
        let _ = fs::remove_dir_all(&discarded).await;

        fs::rename(&self.directory, &discarded).await?;
        if let Err(e) = fs::remove_dir_all(&discarded).await {
            warn!(
                "Failed to delete discarded archive at {}: {}",
                discarded.display(),
                e
            );
        }
        fs::create_dir_all(&self.directory).await?;

        self.commit().await;
        Ok(())
    }

    /// Tracked entries, most recent first
    pub fn entries(&self) -> &[RecentEntry] {
        &self.archive.entries
    }

    /// Number of tracked entries
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether any entries are tracked
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// The capacity bound this archive was opened with
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The managed directory this archive owns
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Display name for whatever `location` points at.
    ///
    /// A managed-copy location resolves transitively to its owning entry's
    /// name via a linear scan of the copy map, so this is O(limit). An
    /// untracked location falls back to its own file name.
    pub fn display_name_for(&self, location: &Path) -> String {
        if let Some(name) = self.archive.display_name_for(location) {
            return name.to_string();
        }

        location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| location.display().to_string())
    }

    /// The managed copy backing `entry`, if one has been materialized
    pub fn resolved_location(&self, entry: &RecentEntry) -> Option<&Path> {
        self.archive.copies.get(&entry.location).map(PathBuf::as_path)
    }

    /// Watch the entry list. A fresh snapshot is published after every
    /// committed mutation; the receiver always holds the latest one.
    pub fn subscribe(&self) -> watch::Receiver<Vec<RecentEntry>> {
        self.changes.subscribe()
    }

    /// Persist the current state and publish it to subscribers.
    ///
    /// A failed write is logged and otherwise ignored: the in-memory
    /// archive stays authoritative, and recent-items durability is
    /// best-effort.
    async fn commit(&mut self) {
        debug_assert_eq!(self.archive.entries.len(), self.archive.copies.len());

        if let Err(e) = persist::save(&self.directory, &self.archive).await {
            warn!(
                "Failed to persist recent files to {}: {}",
                self.directory.display(),
                e
            );
        }

        self.changes.send_replace(self.archive.entries.clone());
    }

    fn discarded_directory(&self) -> PathBuf {
        let name = self
            .directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "archive".to_string());
        self.directory.with_file_name(format!("{name}.discarded"))
    }
}
