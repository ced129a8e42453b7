//! Persistent perceptual-hash cache.
//!
//! The cache is a single JSON blob mapping file paths to perceptual
//! hashes. It is loaded once at the start of a run and saved once at the
//! end; a save atomically replaces the whole mapping (write to a
//! temporary file in the same directory, then rename over the old blob).
//!
//! Entries are keyed by path only. There is no modification-time or size
//! check and no expiry: a file that changes content but keeps its path
//! retains its stale hash until the cache file is removed.
//!
//! Cache I/O failure is fatal to the run; the grouping pass depends on
//! the mapping being loadable and writable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scanner::Phash;

/// In-memory form of the cache: one hash per path.
pub type HashMapping = HashMap<PathBuf, Phash>;

/// Errors from loading or saving the cache blob.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache file exists but could not be read.
    #[error("failed to read hash cache {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file could not be written or renamed into place.
    #[error("failed to write hash cache {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file content does not round-trip as a path-to-hash map.
    #[error("hash cache {path} is not a valid hash mapping: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialized on-disk form of the cache.
#[derive(Debug, Serialize, Deserialize)]
struct CacheBlob {
    entries: HashMapping,
}

/// Handle to the persistent cache at a fixed location.
#[derive(Debug, Clone)]
pub struct HashCache {
    path: PathBuf,
}

impl HashCache {
    /// Create a handle for the cache blob at `path`. No I/O happens until
    /// [`load`](Self::load) or [`save`](Self::save).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the cache blob.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full mapping, or an empty one when no blob exists yet.
    ///
    /// # Errors
    ///
    /// Fails when the blob exists but cannot be read or parsed.
    pub fn load(&self) -> Result<HashMapping, CacheError> {
        if !self.path.exists() {
            log::debug!("no hash cache at {}, starting empty", self.path.display());
            return Ok(HashMapping::new());
        }

        let data = fs::read_to_string(&self.path).map_err(|source| CacheError::Read {
            path: self.path.clone(),
            source,
        })?;
        let blob: CacheBlob =
            serde_json::from_str(&data).map_err(|source| CacheError::Format {
                path: self.path.clone(),
                source,
            })?;
        log::debug!(
            "loaded {} cached hashes from {}",
            blob.entries.len(),
            self.path.display()
        );
        Ok(blob.entries)
    }

    /// Atomically persist the full mapping, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Fails when the blob cannot be serialized, written, or renamed into
    /// place.
    pub fn save(&self, mapping: &HashMapping) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let blob = CacheBlob {
            entries: mapping.clone(),
        };
        let data = serde_json::to_string(&blob).map_err(|source| CacheError::Format {
            path: self.path.clone(),
            source,
        })?;

        // Write-then-rename keeps the old blob intact if the write fails
        // partway.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|source| CacheError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;

        log::debug!(
            "saved {} hashes to {}",
            mapping.len(),
            self.path.display()
        );
        Ok(())
    }
}
