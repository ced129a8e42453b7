//! pixdupe - Perceptual-Hash Duplicate Image Finder
//!
//! Scans a directory tree for images with identical perceptual hashes
//! (pHash), keeps the highest-resolution copy of each duplicate set, and
//! lists, deletes, or moves the rest. Hashes are cached on disk so
//! repeated scans over the same tree skip recomputation.

pub mod actions;
pub mod cache;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod scanner;
pub mod stats;

use actions::ActionReport;
use cache::HashCache;
use cli::Cli;
use duplicates::{select_keeper, DuplicateFinder};
use error::ExitCode;
use progress::Progress;
use stats::RunStats;

/// Run the full pipeline: load cache, walk and group, persist cache,
/// select keepers, apply the action, report the summary.
///
/// # Errors
///
/// Fails fast, before any scanning or cache work, when the action is
/// misconfigured, and fatally when the cache cannot be loaded or saved.
/// Per-file failures never surface here; they are logged and counted.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let action = cli.resolve_action()?;

    let cache = HashCache::new(config::default_cache_path()?);
    let mut mapping = cache.load()?;

    let progress = Progress::new(cli.quiet);
    let finder = DuplicateFinder::new().with_progress(&progress);
    let mut stats = RunStats::default();
    let groups = finder.find_duplicates(&cli.directory, &mut mapping, &mut stats);

    // Persist every hash computed this run before any files are touched.
    cache.save(&mapping)?;

    let mut report = ActionReport::default();
    if groups.is_empty() {
        log::info!("No duplicates found.");
    } else {
        for group in &groups {
            stats.record_duplicates(group.duplicate_count() as u64);
            log::info!("Found duplicates for pHash {}:", group.hash);
            for file in &group.files {
                log::info!("  - {}", file.display());
            }

            let decision = select_keeper(&group.files, &mut stats);
            report.merge(action.apply(&decision.remove, &cli.directory));
        }
    }

    if !report.all_succeeded() {
        log::warn!("{} file action(s) failed; see errors above", report.failures.len());
    }
    stats.log_summary(cli.report_corrupt);

    Ok(if !stats.corrupt.is_empty() {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    })
}
