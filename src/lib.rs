//! recently - bounded, recency-ordered archive of recently opened files
//!
//! Tracks the files a user has opened so a host application can offer an
//! "Open Recent" list. Each tracked entry gets a durable managed copy, so
//! the list keeps working after the original file disappears (ejected
//! volume, deleted source, sandboxed origin).
//!
//! # Behavior
//!
//! - Entries are ordered most-recent-first; order is the only ranking.
//! - Re-adding a tracked file (by its original location or by its managed
//!   copy's location) promotes it instead of duplicating it.
//! - The archive is bounded: committing a new entry evicts the
//!   least-recently-promoted ones, copies included.
//! - State is rewritten to disk after every mutation and reloaded on open;
//!   a corrupt state file means "no history", never a startup failure.
//!
//! # Modules
//!
//! - `archive`: the store, materializer, persistence layer, and the
//!   [`RecentFiles`] facade
//! - `domain`: [`RecentEntry`] and [`FileKind`]
//! - `config`: conventional directory and default capacity
//!
//! # Usage
//!
//! ```rust,ignore
//! use recently::{config, RecentEntry, RecentFiles};
//!
//! let dir = config::default_archive_dir("ImageReader").unwrap();
//! let mut recents = RecentFiles::open(dir, config::DEFAULT_LIMIT).await?;
//!
//! recents.add(RecentEntry::new("/home/me/pictures/cat.jpg")?).await?;
//! for entry in recents.entries() {
//!     println!("{}", entry.display_name);
//! }
//! ```

pub mod archive;
pub mod config;
pub mod domain;

// Re-export main types at crate root for convenience
pub use archive::{Archive, ArchiveError, RecentFiles};
pub use domain::{FileKind, RecentEntry};
