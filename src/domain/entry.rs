//! Recent items and their content-type classification.
//!
//! An entry is a value: two entries are the same item only when every field
//! matches. Re-opening a file therefore produces a *different* entry value
//! (newer timestamp), and the archive decides what that means.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archive::ArchiveError;

/// One tracked recent item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    /// Absolute path the entry was created from
    pub location: PathBuf,

    /// Human-readable label shown to the user
    pub display_name: String,

    /// Kind of file, judged from the extension
    pub kind: FileKind,

    /// When the user opened the file. Used to tell a fresh open apart from
    /// a re-open, never to order the list.
    pub opened_at: DateTime<Utc>,
}

impl RecentEntry {
    /// Create an entry for a file the user just opened.
    ///
    /// The display name defaults to the file stem; override it with
    /// [`with_display_name`](Self::with_display_name). The location must be
    /// an absolute path to an existing file with a non-empty name.
    pub fn new(location: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let location = location.into();

        if !location.is_absolute() || !location.is_file() {
            return Err(ArchiveError::InvalidLocation(location));
        }

        let stem = location
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem.is_empty() {
            return Err(ArchiveError::InvalidLocation(location));
        }

        // The kind is judged from the extension alone. A mislabeled file
        // gets reported as whatever its name claims it is, which is what
        // the user would expect from looking at it in a file browser.
        let kind = FileKind::from_location(&location);

        Ok(Self {
            display_name: stem,
            kind,
            opened_at: Utc::now(),
            location,
        })
    }

    /// Replace the stem-derived display name with a suggested one
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the opened-at timestamp explicitly
    pub fn with_opened_at(mut self, opened_at: DateTime<Utc>) -> Self {
        self.opened_at = opened_at;
        self
    }

    /// Extension used when naming this entry's managed copy
    pub fn preferred_extension(&self) -> &str {
        self.location
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }

    /// Whether the location points at a durable file of the user's own.
    ///
    /// Content imported from transient sources (downloads, pasteboard
    /// drops) lands under the system temporary directory; offering to
    /// reveal such an original makes no sense.
    pub fn represents_local_file(&self) -> bool {
        !self.location.starts_with(std::env::temp_dir())
    }
}

/// Kind of file, as the user would read it off the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Raster or vector image
    Image,

    /// Audio recording
    Audio,

    /// Video
    Video,

    /// Plain or lightly marked-up text
    Text,

    /// Formatted document (PDF, office formats)
    Document,

    /// Compressed archive
    Archive,

    /// Anything else
    Other,
}

impl FileKind {
    /// Classify a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "webp" | "heic" | "svg" => {
                Self::Image
            }
            "mp3" | "m4a" | "wav" | "flac" | "aac" | "ogg" => Self::Audio,
            "mp4" | "mov" | "mkv" | "avi" | "webm" => Self::Video,
            "txt" | "md" | "rtf" | "csv" | "json" | "yaml" | "toml" => Self::Text,
            "pdf" | "doc" | "docx" | "pages" | "ppt" | "pptx" | "xls" | "xlsx" => Self::Document,
            "zip" | "tar" | "gz" | "xz" | "7z" => Self::Archive,
            _ => Self::Other,
        }
    }

    fn from_location(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Other)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Image => write!(f, "image"),
            FileKind::Audio => write!(f, "audio"),
            FileKind::Video => write!(f, "video"),
            FileKind::Text => write!(f, "text"),
            FileKind::Document => write!(f, "document"),
            FileKind::Archive => write!(f, "archive"),
            FileKind::Other => write!(f, "other"),
        }
    }
}
