//! Slash-separated paths for folders and entries
//!
//! Provides [`SegmentPath`] for segment-level edits (replace the last
//! segment of a folder path) and [`EntryLocation`] for splitting an entry's
//! stored path into collection folder, relative folder and filename.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Path separator used by stored folder and entry paths
pub const SEPARATOR: char = '/';

/// Path made of raw `/`-separated segments
///
/// Segments are kept exactly as split, so a leading separator produces an
/// empty first segment and the path renders back unchanged.
///
/// # Examples
/// - `/blog` → `["", "blog"]`
/// - `blog/2024/my-post.md` → `["blog", "2024", "my-post.md"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentPath(Vec<String>);

impl SegmentPath {
    /// Split a stored path on `/`
    #[inline]
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self(path.split(SEPARATOR).map(str::to_string).collect())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get parent path (if any segment remains)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Get last segment
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Replace the last segment, keeping the depth
    ///
    /// A path with no segments gains the segment instead.
    #[must_use]
    pub fn with_last(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        match new.0.last_mut() {
            Some(last) => *last = segment.into(),
            None => new.0.push(segment.into()),
        }
        new
    }

    /// Check if this path is a segment-wise prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Get the path relative to `prefix`
    ///
    /// # Errors
    /// Returns error if `prefix` is not a prefix of `self`
    pub fn strip_prefix(&self, prefix: &Self) -> Result<Self, PathError> {
        if !prefix.is_prefix_of(self) {
            return Err(PathError::NotUnderPrefix {
                path: self.to_string(),
                prefix: prefix.to_string(),
            });
        }
        Ok(Self(self.0[prefix.0.len()..].to_vec()))
    }
}

impl Display for SegmentPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Replace the last segment of `folder_path` with `new_name`
///
/// `/blog` renamed to `new-blog` becomes `/new-blog`.
#[inline]
#[must_use]
pub fn rename_last_segment(folder_path: &str, new_name: &str) -> String {
    SegmentPath::parse(folder_path).with_last(new_name).to_string()
}

/// Join two path parts, skipping the separator when either side is empty
#[must_use]
pub fn join(base: &str, leaf: &str) -> String {
    match (base.is_empty(), leaf.is_empty()) {
        (true, _) => leaf.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}{SEPARATOR}{leaf}"),
    }
}

/// Where an entry lives, split for filename editing
///
/// The folder is stored relative to the collection folder so that a new
/// filename can be rejoined without touching either prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryLocation {
    /// Collection folder (may be empty)
    pub collection_folder: String,
    /// Folder relative to the collection folder (may be empty)
    pub folder: String,
    /// Filename including extension
    pub filename: String,
}

impl EntryLocation {
    /// Split an entry's stored path
    ///
    /// When the entry's folder sits under `collection_folder`, that prefix is
    /// removed from the relative folder; otherwise the full folder is kept.
    #[must_use]
    pub fn from_entry_path(entry_path: &str, collection_folder: &str) -> Self {
        let path = SegmentPath::parse(entry_path);
        let filename = path.last().unwrap_or_default().to_string();
        let folder_path = path.parent().unwrap_or_default();

        let folder = if collection_folder.is_empty() {
            folder_path
        } else {
            folder_path
                .strip_prefix(&SegmentPath::parse(collection_folder))
                .unwrap_or(folder_path)
        };

        Self {
            collection_folder: collection_folder.to_string(),
            folder: folder.to_string(),
            filename,
        }
    }

    /// Path of `filename` relative to the collection folder
    #[inline]
    #[must_use]
    pub fn relative_path_for(&self, filename: &str) -> String {
        join(&self.folder, filename)
    }

    /// Full stored path of `filename` in this location
    #[inline]
    #[must_use]
    pub fn full_path_for(&self, filename: &str) -> String {
        join(&self.collection_folder, &self.relative_path_for(filename))
    }

    /// Full stored path of the current filename
    #[inline]
    #[must_use]
    pub fn full_path(&self) -> String {
        self.full_path_for(&self.filename)
    }

    /// Same location with a different relative folder
    #[inline]
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }
}

/// Errors related to segment paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path does not start with the given prefix
    #[error("path '{path}' is not under '{prefix}'")]
    NotUnderPrefix {
        /// The path that was stripped
        path: String,
        /// The prefix it does not start with
        prefix: String,
    },
}
