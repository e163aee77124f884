//! Conventional locations and defaults for hosting applications.
//!
//! The archive takes its directory and capacity as explicit construction
//! arguments; nothing here is read implicitly. These helpers resolve the
//! conventional values once at startup for hosts without an opinion of
//! their own:
//!
//! ```rust,ignore
//! use recently::{config, RecentFiles};
//!
//! let dir = config::default_archive_dir("ImageReader").unwrap();
//! let recents = RecentFiles::open(dir, config::DEFAULT_LIMIT).await?;
//! ```

use std::path::PathBuf;

/// Default capacity bound when the host has no stored preference
pub const DEFAULT_LIMIT: usize = 50;

/// Conventional archive directory for an application:
/// `<platform data directory>/<app>/RecentFiles`.
///
/// `None` when the platform reports no data directory.
pub fn default_archive_dir(app: &str) -> Option<PathBuf> {
    Some(dirs::data_dir()?.join(app).join("RecentFiles"))
}
