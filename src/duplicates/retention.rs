//! Resolution-based retention selection.
//!
//! For each duplicate group, exactly one file is kept: the first file to
//! reach the maximum resolution encountered, scanning the group in
//! discovery order. The comparison is strict, so an equal-resolution file
//! later in the group never displaces an earlier keeper.

use std::path::PathBuf;

use crate::scanner::probe_resolution;
use crate::stats::RunStats;

/// Outcome of retention selection for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionDecision {
    /// The file to keep. `None` only when every member failed the
    /// resolution probe.
    pub keep: Option<PathBuf>,
    /// The files to list, delete, or move.
    pub remove: Vec<PathBuf>,
}

/// Pick the keeper for a group of hash-equal files.
///
/// Iterates in group order keeping a running maximum of width × height;
/// a file becomes the keeper only when its resolution is strictly greater
/// than the maximum so far, demoting the previous keeper to the remove
/// list. Files whose resolution cannot be read are placed in the remove
/// list and recorded as corrupt, without aborting the group.
pub fn select_keeper(files: &[PathBuf], stats: &mut RunStats) -> RetentionDecision {
    let mut highest_res: Option<u64> = None;
    let mut keep: Option<PathBuf> = None;
    let mut remove = Vec::new();

    for file in files {
        match probe_resolution(file) {
            Ok(res) => {
                if highest_res.is_none_or(|best| res > best) {
                    highest_res = Some(res);
                    if let Some(previous) = keep.replace(file.clone()) {
                        remove.push(previous);
                    }
                } else {
                    remove.push(file.clone());
                }
            }
            Err(e) => {
                log::error!(
                    "Error opening {} for resolution comparison: {e}",
                    file.display()
                );
                stats.record_corrupt(file.clone());
                remove.push(file.clone());
            }
        }
    }

    RetentionDecision { keep, remove }
}
