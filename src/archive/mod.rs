//! The recent-items archive: store, materializer, persistence, and the
//! public facade.
//!
//! # Storage Layout
//!
//! One managed directory, owned exclusively by one [`RecentFiles`] instance:
//!
//! ```text
//! <archive directory>/
//! ├── recents.json          # serialized Archive (entry list + copy map)
//! └── <hash>.<ext>          # one materialized copy per tracked original
//! ```
//!
//! Copy file names are derived from the original location only, so the same
//! source always maps to the same managed file no matter how often it is
//! re-added.

pub mod manager;
pub mod materialize;
pub mod persist;
pub mod store;

pub use manager::RecentFiles;
pub use store::{Archive, Resolution};

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by archive construction and mutation.
///
/// Only `open`, `add`, and `clear` return these; everything else is either
/// infallible or best-effort with failures logged.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("not a usable local path: {0}")]
    InvalidLocation(PathBuf),

    #[error("a non-directory already exists at {0}")]
    Conflict(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
