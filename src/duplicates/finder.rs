//! Cache-aware duplicate grouping.
//!
//! # Overview
//!
//! The finder walks every file under the scan root in a single
//! sequential pass and partitions them into groups of identical
//! perceptual hashes:
//!
//! 1. Look the path up in the cache mapping.
//! 2. On a miss, compute the hash and write it back into the mapping
//!    (the same object the caller later persists).
//! 3. On a decode failure, record the file as corrupt and skip it; it
//!    takes no hash and joins no group.
//!
//! Groups keep discovery order, and groups with a single member are
//! discarded after the walk. There is no extension filter: every file
//! encountered is attempted.
//!
//! # Example
//!
//! ```no_run
//! use pixdupe::cache::HashMapping;
//! use pixdupe::duplicates::DuplicateFinder;
//! use pixdupe::stats::RunStats;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new();
//! let mut mapping = HashMapping::new();
//! let mut stats = RunStats::default();
//! let groups = finder.find_duplicates(Path::new("photos"), &mut mapping, &mut stats);
//! for group in &groups {
//!     println!("{}: {} copies", group.hash, group.len());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use indexmap::IndexMap;
use walkdir::WalkDir;

use crate::cache::HashMapping;
use crate::progress::ScanProgress;
use crate::scanner::{PerceptualHasher, Phash};
use crate::stats::RunStats;

use super::groups::DuplicateGroup;

/// Walks a directory tree and groups files by exact perceptual hash.
pub struct DuplicateFinder<'a> {
    hasher: PerceptualHasher,
    progress: Option<&'a dyn ScanProgress>,
}

impl<'a> DuplicateFinder<'a> {
    /// Create a finder with the default pHash configuration and no
    /// progress reporting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: PerceptualHasher::new(),
            progress: None,
        }
    }

    /// Attach a progress callback, invoked per directory and on
    /// completion.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ScanProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Walk `root` and return the duplicate groups found.
    ///
    /// `mapping` is consulted before hashing and mutated in place with
    /// every newly computed hash; the caller persists it afterwards.
    /// `stats.scanned` counts only hashes computed this run; cache hits
    /// do not touch it. Unreadable directory entries are logged and
    /// skipped; per-file decode failures land in `stats.corrupt`.
    pub fn find_duplicates(
        &self,
        root: &Path,
        mapping: &mut HashMapping,
        stats: &mut RunStats,
    ) -> Vec<DuplicateGroup> {
        let mut groups: IndexMap<Phash, Vec<PathBuf>> = IndexMap::new();
        let start = Instant::now();

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                // Everything before this directory has been processed;
                // report throughput so far.
                if entry.depth() > 0 {
                    if let Some(progress) = self.progress {
                        let elapsed = start.elapsed().as_secs_f64();
                        progress.on_directory_done(stats.scanned, scan_rate(stats.scanned, elapsed));
                    }
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            let phash = match mapping.get(&path) {
                Some(cached) => cached.clone(),
                None => match self.hasher.hash_path(&path) {
                    Ok(phash) => {
                        stats.record_scanned();
                        mapping.insert(path.clone(), phash.clone());
                        phash
                    }
                    Err(e) => {
                        log::error!("Error calculating pHash for {}: {e}", path.display());
                        stats.record_corrupt(path);
                        continue;
                    }
                },
            };

            groups.entry(phash).or_default().push(path);
        }

        let elapsed = start.elapsed().as_secs_f64();
        let rate = scan_rate(stats.scanned, elapsed);
        if let Some(progress) = self.progress {
            progress.on_scan_complete(stats.scanned, elapsed, rate);
        }

        groups
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(hash, files)| DuplicateGroup::new(hash, files))
            .collect()
    }
}

impl Default for DuplicateFinder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Images per second, guarded against a zero elapsed time.
fn scan_rate(scanned: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        scanned as f64 / elapsed_secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_gradient_h(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, _| {
            let v = (x * 255 / width.max(1)) as u8;
            Rgb([v, v, v])
        });
        img.save(path).unwrap();
    }

    fn write_gradient_v(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |_, y| {
            let v = (y * 255 / height.max(1)) as u8;
            Rgb([v, v, v])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let finder = DuplicateFinder::new();
        let mut mapping = HashMapping::new();
        let mut stats = RunStats::default();

        let groups = finder.find_duplicates(dir.path(), &mut mapping, &mut stats);

        assert!(groups.is_empty());
        assert_eq!(stats.scanned, 0);
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_unique_images_form_no_groups() {
        let dir = tempdir().unwrap();
        write_gradient_h(&dir.path().join("h.png"), 64, 48);
        write_gradient_v(&dir.path().join("v.png"), 64, 48);

        let finder = DuplicateFinder::new();
        let mut mapping = HashMapping::new();
        let mut stats = RunStats::default();

        let groups = finder.find_duplicates(dir.path(), &mut mapping, &mut stats);

        assert!(groups.is_empty());
        assert_eq!(stats.scanned, 2);
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_identical_images_form_one_group() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_gradient_h(&a, 64, 48);
        fs::copy(&a, &b).unwrap();
        write_gradient_v(&dir.path().join("other.png"), 64, 48);

        let finder = DuplicateFinder::new();
        let mut mapping = HashMapping::new();
        let mut stats = RunStats::default();

        let groups = finder.find_duplicates(dir.path(), &mut mapping, &mut stats);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        assert!(groups[0].files.contains(&a));
        assert!(groups[0].files.contains(&b));
        assert_eq!(stats.scanned, 3);
    }

    #[test]
    fn test_nested_directories_are_walked() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let a = dir.path().join("a.png");
        let b = sub.join("b.png");
        write_gradient_h(&a, 64, 48);
        fs::copy(&a, &b).unwrap();

        let finder = DuplicateFinder::new();
        let mut mapping = HashMapping::new();
        let mut stats = RunStats::default();

        let groups = finder.find_duplicates(dir.path(), &mut mapping, &mut stats);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_recorded_and_skipped() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("broken.png");
        fs::write(&bad, b"not an image").unwrap();
        write_gradient_h(&dir.path().join("good.png"), 64, 48);

        let finder = DuplicateFinder::new();
        let mut mapping = HashMapping::new();
        let mut stats = RunStats::default();

        let groups = finder.find_duplicates(dir.path(), &mut mapping, &mut stats);

        assert!(groups.is_empty());
        assert_eq!(stats.corrupt, vec![bad.clone()]);
        // Corrupt files take no hash and never enter the mapping.
        assert!(!mapping.contains_key(&bad));
        assert_eq!(stats.scanned, 1);
    }

    #[test]
    fn test_cached_hashes_are_not_recomputed() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_gradient_h(&a, 64, 48);
        fs::copy(&a, &b).unwrap();

        let finder = DuplicateFinder::new();
        let mut mapping = HashMapping::new();
        let mut stats = RunStats::default();
        finder.find_duplicates(dir.path(), &mut mapping, &mut stats);
        assert_eq!(stats.scanned, 2);

        // Second run over the same tree with the warmed mapping: every
        // lookup is a cache hit, so nothing is scanned.
        let mut stats2 = RunStats::default();
        let groups = finder.find_duplicates(dir.path(), &mut mapping, &mut stats2);
        assert_eq!(stats2.scanned, 0);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_cached_hash_wins_over_content() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_gradient_h(&a, 64, 48);
        write_gradient_v(&b, 64, 48);

        // Fabricated cache entries group visually distinct files:
        // cached hashes always win over file content.
        let shared = Phash::from_base64_unchecked("SHARED");
        let mut mapping = HashMapping::new();
        mapping.insert(a.clone(), shared.clone());
        mapping.insert(b.clone(), shared);

        let finder = DuplicateFinder::new();
        let mut stats = RunStats::default();
        let groups = finder.find_duplicates(dir.path(), &mut mapping, &mut stats);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(stats.scanned, 0);
    }

    #[test]
    fn test_scan_rate_guards_zero_elapsed() {
        assert_eq!(scan_rate(100, 0.0), 0.0);
        assert!((scan_rate(100, 2.0) - 50.0).abs() < f64::EPSILON);
    }
}
