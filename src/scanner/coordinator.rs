/// Coordinator — orchestrates a full scan end to end.
///
/// Owns both ends of the producer/consumer pipeline and the cancellation
/// token. Moves through `Created -> Estimating -> Scanning -> Building ->
/// Analyzing -> Done | Faulted | Cancelled`.
use std::path::Path;
use std::time::Instant;

use crate::analysis;
use crate::error::ScanError;
use crate::model::ScanResult;
use crate::platform::{normalize_volume_path, sample_drive_stats};
use crate::scanner::{select_scan_source, CancelToken, ProgressCallback, ScanProgress, TreeBuilder};

/// Every 10 000 ingested entries, yield cooperatively (a no-op check point
/// in a synchronous implementation; the hook a host's async runtime would
/// attach a real yield to).
const YIELD_EVERY_N_ENTRIES: u64 = 10_000;

/// How often, in wall-clock time, a progress snapshot is emitted while
/// entries are still streaming in.
const PROGRESS_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

pub struct Coordinator;

impl Coordinator {
    pub fn new() -> Self {
        Self
    }

    /// Run a complete scan of `volume_root`, reporting progress through
    /// `on_progress` and checking `cancel` at every entry and every
    /// periodic progress point.
    pub fn scan(
        &self,
        volume_root: &Path,
        on_progress: &mut ProgressCallback<'_>,
        cancel: CancelToken,
    ) -> Result<ScanResult, ScanError> {
        let start_time = Instant::now();
        let normalized_root = normalize_volume_path(volume_root);

        // Step 2: capture capacity before the scan perturbs any metadata.
        let drive_stats = sample_drive_stats(&normalized_root);

        // Step 3: pick the optimal source (falls back to Directory
        // internally if MFT selection criteria aren't met).
        let source = select_scan_source(&normalized_root);
        let description = source.description();
        tracing::info!(source = description, "starting scan");

        let estimate = source.estimate_entry_count();

        let entries = source.scan(cancel.clone())?;

        let mut builder = TreeBuilder::new(normalized_root.clone());
        let mut processed: u64 = 0;
        let mut last_report = Instant::now();
        let debug_logging = std::env::var("SCANNER_DEBUG")
            .map(|v| v == "1")
            .unwrap_or(false);

        for entry in entries.iter() {
            if cancel.is_cancelled() {
                return Err(ScanError::ScanAborted);
            }

            builder.on_entry(entry);
            processed += 1;

            if processed % YIELD_EVERY_N_ENTRIES == 0 {
                std::thread::yield_now();
            }

            if last_report.elapsed() >= PROGRESS_INTERVAL {
                if cancel.is_cancelled() {
                    return Err(ScanError::ScanAborted);
                }
                let percent = Self::estimate_percent(processed, estimate, start_time.elapsed());
                on_progress(&ScanProgress::new(percent, processed, start_time.elapsed()));
                last_report = Instant::now();

                if debug_logging {
                    tracing::debug!(processed, percent, "scan progress");
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(ScanError::ScanAborted);
        }

        // Step 8: finalize the tree.
        let total_files = builder.total_files();
        let total_directories = builder.total_directories();
        let error_count = builder.error_count();
        on_progress(&ScanProgress::new(95, processed, start_time.elapsed()).with_message("building tree"));
        let (root, incomplete) = builder.build_tree();

        // Step 9: run the post-scan analyzers.
        on_progress(&ScanProgress::new(98, processed, start_time.elapsed()).with_message("analyzing"));
        let top_files = analysis::top_files::top_n_files(&root, 20);
        let by_extension = analysis::extensions::group_by_extension(&root, 15);

        let result = ScanResult {
            drive: drive_stats,
            root,
            top_files,
            by_extension,
            total_files,
            total_directories,
            error_count,
            incomplete,
        };

        // Step 10: final report.
        on_progress(&ScanProgress::new(100, processed, start_time.elapsed()));

        Ok(result)
    }

    fn estimate_percent(
        processed: u64,
        estimate: u64,
        elapsed: std::time::Duration,
    ) -> u8 {
        let percent = if estimate > 0 {
            ((processed as f64 / estimate as f64) * 100.0).min(95.0)
        } else {
            (elapsed.as_secs_f64() * 2.0).min(95.0)
        };
        percent.max(0.0) as u8
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_uses_estimate_when_known() {
        let percent = Coordinator::estimate_percent(50, 100, std::time::Duration::ZERO);
        assert_eq!(percent, 50);
    }

    #[test]
    fn percent_never_exceeds_95_before_finalization() {
        let percent = Coordinator::estimate_percent(200, 100, std::time::Duration::ZERO);
        assert_eq!(percent, 95);
    }

    #[test]
    fn percent_falls_back_to_elapsed_time_when_estimate_unknown() {
        let percent = Coordinator::estimate_percent(1, 0, std::time::Duration::from_secs(10));
        assert_eq!(percent, 20);
    }
}
