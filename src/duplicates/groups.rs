//! Duplicate group type.

use std::path::PathBuf;

use crate::scanner::Phash;

/// Files sharing one perceptual hash, in directory-walk discovery order.
///
/// Only groups with two or more members are surfaced by the finder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The shared perceptual hash.
    pub hash: Phash,
    /// Member paths in discovery order.
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new group.
    #[must_use]
    pub fn new(hash: Phash, files: Vec<PathBuf>) -> Self {
        Self { hash, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of duplicate copies (total minus the one keeper).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}
