//! In-memory archive aggregate: the ordered entry list plus the
//! original-to-copy map.
//!
//! The store decides what an incoming entry *means* (a brand-new item, a
//! re-open of a managed copy, or a refresh of a tracked original) and keeps
//! the two halves of the aggregate consistent. It never touches the file
//! system; the manager drives copying and persistence around it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::RecentEntry;

/// Current revision of the persisted archive document
pub const SCHEMA_VERSION: u32 = 1;

/// The persisted aggregate: entries ordered most-recent-first, and the map
/// from each original location to its materialized copy.
///
/// Invariant: `copies` has exactly one key per entry, keyed by the entry's
/// original location, and every value is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archive {
    /// Archive document format version
    pub version: u32,

    /// Tracked entries, most recent first. Order is the only ranking signal.
    pub entries: Vec<RecentEntry>,

    /// Original location → materialized copy location. A BTreeMap keeps the
    /// serialized document byte-stable across save/load cycles.
    pub copies: BTreeMap<PathBuf, PathBuf>,
}

/// What an incoming entry turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The candidate's location is one of our own managed copies; the
    /// owning entry sits at this index and should move up unchanged.
    ManagedCopy(usize),

    /// An entry with the same original location sits at this index; the
    /// candidate refreshes its metadata, the copy on disk stays.
    SameOriginal(usize),

    /// Untracked location: a genuinely new item.
    New,
}

impl Default for Archive {
    fn default() -> Self {
        Self::empty()
    }
}

impl Archive {
    /// An archive with no history
    pub fn empty() -> Self {
        Self {
            version: SCHEMA_VERSION,
            entries: Vec::new(),
            copies: BTreeMap::new(),
        }
    }

    /// Number of tracked entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any entries are tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classify a candidate against the current contents.
    ///
    /// The copy-location check runs before the original-location check, so
    /// the two cases can never tie.
    pub fn resolve(&self, candidate: &RecentEntry) -> Resolution {
        if let Some(owner) = self.owner_of_copy(&candidate.location) {
            if let Some(index) = self.entries.iter().position(|e| e.location == owner) {
                return Resolution::ManagedCopy(index);
            }
        }

        if let Some(index) = self
            .entries
            .iter()
            .position(|e| e.location == candidate.location)
        {
            return Resolution::SameOriginal(index);
        }

        Resolution::New
    }

    /// Move the entry at `index` to the front, unchanged
    pub(crate) fn promote(&mut self, index: usize) {
        let entry = self.entries.remove(index);
        self.entries.insert(0, entry);
    }

    /// Replace the entry at `index` with `candidate` at the front. The copy
    /// map is untouched: both share the same original location.
    pub(crate) fn refresh(&mut self, index: usize, candidate: RecentEntry) {
        self.entries.remove(index);
        self.entries.insert(0, candidate);
    }

    /// Commit a genuinely new entry at the front, recording its copy
    pub(crate) fn insert(&mut self, entry: RecentEntry, copy: PathBuf) {
        self.copies.insert(entry.location.clone(), copy);
        self.entries.insert(0, entry);
    }

    /// Make room for one new entry: pop least-recently-promoted entries
    /// until a subsequent insert cannot exceed `limit`. Returns the removed
    /// entries with their copies so the caller can clean up on disk.
    pub(crate) fn evict_for_insert(&mut self, limit: usize) -> Vec<(RecentEntry, Option<PathBuf>)> {
        let mut evicted = Vec::new();
        while self.entries.len() > limit.saturating_sub(1) {
            match self.entries.pop() {
                Some(removed) => {
                    let copy = self.copies.remove(&removed.location);
                    evicted.push((removed, copy));
                }
                None => break,
            }
        }
        evicted
    }

    /// Remove the entry that matches `entry` exactly (full value equality).
    /// Returns it if it was present.
    pub(crate) fn remove(&mut self, entry: &RecentEntry) -> Option<RecentEntry> {
        let index = self.entries.iter().position(|e| e == entry)?;
        Some(self.entries.remove(index))
    }

    /// The original location that owns `copy`, found by scanning the map's
    /// values. O(len), which is bounded by the archive limit.
    pub fn owner_of_copy(&self, copy: &Path) -> Option<PathBuf> {
        self.copies
            .iter()
            .find(|(_, value)| value.as_path() == copy)
            .map(|(key, _)| key.clone())
    }

    /// Display name for `location`, whether it is a tracked original or one
    /// of our managed copies (resolved transitively through the copy map).
    pub fn display_name_for(&self, location: &Path) -> Option<&str> {
        if let Some(entry) = self.entries.iter().find(|e| e.location == location) {
            return Some(&entry.display_name);
        }

        let owner = self.owner_of_copy(location)?;
        self.entries
            .iter()
            .find(|e| e.location == owner)
            .map(|e| e.display_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_entry(dir: &TempDir, name: &str) -> RecentEntry {
        let path = dir.path().join(name);
        std::fs::write(&path, b"contents").unwrap();
        RecentEntry::new(path).unwrap()
    }

    fn copy_path(dir: &TempDir, name: &str) -> PathBuf {
        dir.path().join("managed").join(name)
    }

    #[test]
    fn test_resolve_prefers_copy_match_over_original_match() {
        let dir = TempDir::new().unwrap();
        let mut archive = Archive::empty();

        let tracked = create_entry(&dir, "a.txt");
        let copy = copy_path(&dir, "abc123.txt");
        archive.insert(tracked.clone(), copy.clone());

        // A candidate pointing at the managed copy resolves to the owner,
        // even though the copy location is not any entry's original.
        std::fs::create_dir_all(copy.parent().unwrap()).unwrap();
        std::fs::write(&copy, b"contents").unwrap();
        let reopened = RecentEntry::new(&copy).unwrap();
        assert_eq!(archive.resolve(&reopened), Resolution::ManagedCopy(0));

        // Same original, any timestamp: a refresh.
        let again = tracked
            .clone()
            .with_opened_at(tracked.opened_at + chrono::Duration::seconds(5));
        assert_eq!(archive.resolve(&again), Resolution::SameOriginal(0));

        // Untracked: new.
        let fresh = create_entry(&dir, "b.txt");
        assert_eq!(archive.resolve(&fresh), Resolution::New);
    }

    #[test]
    fn test_promote_moves_entry_to_front_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut archive = Archive::empty();

        let first = create_entry(&dir, "one.txt");
        let second = create_entry(&dir, "two.txt");
        archive.insert(first.clone(), copy_path(&dir, "1.txt"));
        archive.insert(second.clone(), copy_path(&dir, "2.txt"));
        assert_eq!(archive.entries, vec![second.clone(), first.clone()]);

        archive.promote(1);

        assert_eq!(archive.entries, vec![first, second]);
        assert_eq!(archive.copies.len(), 2);
    }

    #[test]
    fn test_refresh_replaces_in_place_at_front() {
        let dir = TempDir::new().unwrap();
        let mut archive = Archive::empty();

        let stale = create_entry(&dir, "doc.pdf");
        archive.insert(stale.clone(), copy_path(&dir, "d.pdf"));
        archive.insert(create_entry(&dir, "other.pdf"), copy_path(&dir, "o.pdf"));

        let refreshed = stale
            .clone()
            .with_opened_at(stale.opened_at + chrono::Duration::seconds(30));
        archive.refresh(1, refreshed.clone());

        assert_eq!(archive.entries[0], refreshed);
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.copies.len(), 2);
    }

    #[test]
    fn test_eviction_pops_least_recently_promoted_first() {
        let dir = TempDir::new().unwrap();
        let mut archive = Archive::empty();

        let oldest = create_entry(&dir, "oldest.txt");
        let older = create_entry(&dir, "older.txt");
        let newest = create_entry(&dir, "newest.txt");
        archive.insert(oldest.clone(), copy_path(&dir, "1.txt"));
        archive.insert(older.clone(), copy_path(&dir, "2.txt"));
        archive.insert(newest.clone(), copy_path(&dir, "3.txt"));

        let evicted = archive.evict_for_insert(3);

        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].0, oldest);
        assert_eq!(evicted[0].1, Some(copy_path(&dir, "1.txt")));
        assert_eq!(archive.entries, vec![newest, older]);
        assert_eq!(archive.copies.len(), 2);
    }

    #[test]
    fn test_eviction_is_a_noop_below_the_limit() {
        let dir = TempDir::new().unwrap();
        let mut archive = Archive::empty();
        archive.insert(create_entry(&dir, "a.txt"), copy_path(&dir, "a.txt"));

        assert!(archive.evict_for_insert(5).is_empty());
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_remove_requires_full_value_match() {
        let dir = TempDir::new().unwrap();
        let mut archive = Archive::empty();

        let entry = create_entry(&dir, "a.txt");
        archive.insert(entry.clone(), copy_path(&dir, "a.txt"));

        // Same location, different timestamp: not the same entry.
        let lookalike = entry
            .clone()
            .with_opened_at(entry.opened_at + chrono::Duration::seconds(1));
        assert!(archive.remove(&lookalike).is_none());
        assert_eq!(archive.len(), 1);

        assert_eq!(archive.remove(&entry), Some(entry));
        assert!(archive.is_empty());
    }

    #[test]
    fn test_display_name_resolves_through_copy_map() {
        let dir = TempDir::new().unwrap();
        let mut archive = Archive::empty();

        let entry = create_entry(&dir, "report.pdf").with_display_name("Quarterly report");
        let copy = copy_path(&dir, "beef.pdf");
        archive.insert(entry.clone(), copy.clone());

        assert_eq!(
            archive.display_name_for(&entry.location),
            Some("Quarterly report")
        );
        assert_eq!(archive.display_name_for(&copy), Some("Quarterly report"));
        assert_eq!(archive.display_name_for(Path::new("/elsewhere/x.txt")), None);
    }
}
