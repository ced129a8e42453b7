//! Incremental scan progress reporting using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Callback for scan progress.
///
/// The grouper reports after each directory's files have been processed,
/// and once more when the walk completes.
pub trait ScanProgress {
    /// Called after each directory is processed.
    ///
    /// `scanned` is the number of hashes computed so far and `rate` the
    /// derived images-per-second figure.
    fn on_directory_done(&self, scanned: u64, rate: f64);

    /// Called once when the whole walk has finished.
    fn on_scan_complete(&self, scanned: u64, elapsed_secs: f64, rate: f64);
}

/// Terminal spinner showing scan throughput. Silent in quiet mode.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a progress reporter. With `quiet`, nothing is displayed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        if quiet {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        bar.set_message("Scanning images");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }
}

impl ScanProgress for Progress {
    fn on_directory_done(&self, scanned: u64, rate: f64) {
        if let Some(ref bar) = self.bar {
            bar.set_position(scanned);
            bar.set_message(format!(
                "Scanned {scanned} images so far ({rate:.2} images/second)"
            ));
        }
    }

    fn on_scan_complete(&self, scanned: u64, elapsed_secs: f64, rate: f64) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        log::info!(
            "Completed scanning {scanned} images in {elapsed_secs:.2} seconds \
             ({rate:.2} images/second)."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_progress_has_no_bar() {
        let progress = Progress::new(true);
        assert!(progress.bar.is_none());
        // Callbacks are no-ops without a bar.
        progress.on_directory_done(10, 5.0);
        progress.on_scan_complete(10, 2.0, 5.0);
    }
}
