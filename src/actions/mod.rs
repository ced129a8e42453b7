//! File actions applied to non-kept duplicates.
//!
//! # Overview
//!
//! The action is a closed enum ([`Action::List`], [`Action::Delete`],
//! [`Action::Move`]), so a move without a destination cannot be
//! represented. Execution is strictly per file: one file's failure is
//! logged and never blocks the rest of the batch.
//!
//! Moves recreate the source directory structure underneath the
//! destination: `/in/sub/dup.jpg` scanned from `/in` lands at
//! `/out/sub/dup.jpg`, with intermediate directories created on demand.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// What to do with the non-kept members of a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Report suggested removals; no filesystem mutation.
    List,
    /// Delete each file.
    Delete,
    /// Move each file under `destination`, preserving its path relative
    /// to the scanned directory.
    Move {
        /// Root under which the source structure is recreated.
        destination: PathBuf,
    },
}

/// Per-file failures from applying an action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Deletion failed.
    #[error("Error deleting {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not under the scanned base directory, so no relative
    /// path can be computed for the move.
    #[error("{path} is outside the scanned directory {base}")]
    OutsideBase { path: PathBuf, base: PathBuf },

    /// Creating intermediate destination directories failed.
    #[error("Error creating directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The move itself failed.
    #[error("Error moving {path} to {target}: {source}")]
    Move {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of applying an action to a remove list.
#[derive(Debug, Default)]
pub struct ActionReport {
    /// Files handled without error.
    pub succeeded: u64,
    /// Per-file failures with their rendered cause.
    pub failures: Vec<(PathBuf, String)>,
}

impl ActionReport {
    /// Check if every file was handled without error.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ActionReport) {
        self.succeeded += other.succeeded;
        self.failures.extend(other.failures);
    }
}

impl Action {
    /// Apply this action to every file in `remove`.
    ///
    /// `base_dir` is the scanned root, used to compute relative paths for
    /// moves. Failures are logged per file and collected in the report;
    /// the batch always runs to completion.
    pub fn apply(&self, remove: &[PathBuf], base_dir: &Path) -> ActionReport {
        let mut report = ActionReport::default();
        for file in remove {
            match self.apply_one(file, base_dir) {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    log::error!("  * {e}");
                    report.failures.push((file.clone(), e.to_string()));
                }
            }
        }
        report
    }

    fn apply_one(&self, file: &Path, base_dir: &Path) -> Result<(), ActionError> {
        match self {
            Action::List => {
                log::info!("  * Suggested to remove: {}", file.display());
                Ok(())
            }
            Action::Delete => {
                fs::remove_file(file).map_err(|source| ActionError::Delete {
                    path: file.to_path_buf(),
                    source,
                })?;
                log::info!("  * Deleted: {}", file.display());
                Ok(())
            }
            Action::Move { destination } => {
                let relative =
                    file.strip_prefix(base_dir)
                        .map_err(|_| ActionError::OutsideBase {
                            path: file.to_path_buf(),
                            base: base_dir.to_path_buf(),
                        })?;
                let target = destination.join(relative);

                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|source| ActionError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
                move_file(file, &target)?;
                log::info!("  * Moved {} to {}", file.display(), target.display());
                Ok(())
            }
        }
    }
}

/// Rename, with a copy-and-remove fallback for cross-device targets.
fn move_file(from: &Path, to: &Path) -> Result<(), ActionError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    let map = |source| ActionError::Move {
        path: from.to_path_buf(),
        target: to.to_path_buf(),
        source,
    };
    fs::copy(from, to).map_err(map)?;
    fs::remove_file(from).map_err(map)?;
    Ok(())
}
