//! Command-line interface definitions for pixdupe.
//!
//! This module defines all CLI arguments using the clap derive API. The
//! surface is a single command: a directory to scan, an action selector,
//! an optional move destination, and a corrupt-file reporting flag.
//!
//! # Example
//!
//! ```bash
//! # List suggested removals (default action)
//! pixdupe ~/Pictures
//!
//! # Delete lower-resolution duplicates
//! pixdupe ~/Pictures --action delete
//!
//! # Move duplicates aside, preserving directory structure
//! pixdupe ~/Pictures --action move --destination ~/Pictures-dupes
//! ```

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::actions::Action;

/// Perceptual-hash duplicate image finder.
///
/// pixdupe scans a directory tree for images with identical perceptual
/// hashes, keeps the highest-resolution copy of each duplicate set, and
/// lists, deletes, or moves the rest.
#[derive(Debug, Parser)]
#[command(name = "pixdupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Directory to scan for duplicate images
    #[arg(value_name = "DIRECTORY", value_parser = parse_existing_dir)]
    pub directory: PathBuf,

    /// Action to take with duplicates
    #[arg(long, value_enum, default_value_t = ActionArg::List)]
    pub action: ActionArg,

    /// Destination directory when moving duplicates
    ///
    /// Required with `--action move`. The source directory structure is
    /// recreated underneath it.
    #[arg(long, value_name = "DIR", required_if_eq("action", "move"))]
    pub destination: Option<PathBuf>,

    /// Print the corrupt-file list at the end of the run
    #[arg(long)]
    pub report_corrupt: bool,
}

/// Action selector exposed on the command line.
///
/// This is the flat CLI form; [`Cli::resolve_action`] converts it into the
/// [`Action`] variant carrying its destination, so a move without a
/// destination can never reach the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Report suggested removals without touching the filesystem
    List,
    /// Delete lower-resolution duplicates
    Delete,
    /// Move lower-resolution duplicates under the destination directory
    Move,
}

impl std::fmt::Display for ActionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionArg::List => write!(f, "list"),
            ActionArg::Delete => write!(f, "delete"),
            ActionArg::Move => write!(f, "move"),
        }
    }
}

impl Cli {
    /// Convert the flat CLI arguments into a validated [`Action`].
    ///
    /// # Errors
    ///
    /// Fails when `--action move` was given without `--destination`. This is
    /// checked before any scanning or cache work begins, in addition to the
    /// clap-level `required_if_eq` constraint.
    pub fn resolve_action(&self) -> anyhow::Result<Action> {
        match self.action {
            ActionArg::List => Ok(Action::List),
            ActionArg::Delete => Ok(Action::Delete),
            ActionArg::Move => {
                let destination = self.destination.clone().context(
                    "Destination directory must be specified when using the 'move' action.",
                )?;
                Ok(Action::Move { destination })
            }
        }
    }
}

/// Validate that the scan root exists and is a directory.
fn parse_existing_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if !path.exists() {
        return Err(format!("directory '{s}' does not exist"));
    }
    if !path.is_dir() {
        return Err(format!("'{s}' is not a directory"));
    }
    Ok(path)
}
