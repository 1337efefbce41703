/// Scanner module — the producer/consumer pipeline that turns a volume root
/// into a stream of [`crate::model::Entry`] values and a finished tree.
///
/// Two [`ScanSource`] strategies share one contract:
/// - **MFT** (`mft`, Windows/NTFS only): reads the Master File Table via the
///   USN enumeration control, bypassing directory traversal entirely.
/// - **Directory** (`directory`, portable): single-pass recursive
///   enumeration, usable on any host and any filesystem.
///
/// [`builder::TreeBuilder`] consumes the Entry stream and reconstructs the
/// hierarchy; [`coordinator::Coordinator`] owns both ends plus the
/// cancellation token and progress reporting.
pub mod builder;
pub mod coordinator;
pub mod directory;
pub mod mft;
pub mod progress;

use std::path::Path;

use crossbeam_channel::Receiver;

use crate::error::ScanError;
use crate::model::Entry;

pub use builder::TreeBuilder;
pub use coordinator::Coordinator;
pub use progress::{CancelToken, ProgressCallback, ScanProgress};

/// An Entry stream: a finite, non-restartable, order-unspecified sequence.
pub type EntryReceiver = Receiver<Entry>;

/// Polymorphic producer of an Entry stream for one volume root.
///
/// A source moves through `Idle -> Opened -> Streaming -> (Exhausted |
/// Faulted | Cancelled)`; terminal states are final, there is no
/// resumption. Implementations model this by consuming `self` in `scan`.
pub trait ScanSource {
    /// Begin streaming. Returns the receiving end of the Entry channel; the
    /// producer itself runs on a background thread owned by the source.
    fn scan(self: Box<Self>, cancel: CancelToken) -> Result<EntryReceiver, ScanError>;

    /// Best-effort upper bound on the number of entries this source will
    /// yield; `0` means unknown.
    fn estimate_entry_count(&self) -> u64;

    /// Human-readable strategy name, used in logs and diagnostics.
    fn description(&self) -> &'static str;
}

/// Select the optimal [`ScanSource`] for `volume_root`.
///
/// - If the host is Windows *and* the volume's filesystem is NTFS *and* the
///   process holds administrator rights *and* a test volume-open succeeds,
///   the MFT source is selected.
/// - Otherwise the Directory source is selected.
/// - Setting `FORCE_DIRECTORY_SCAN=1` skips the MFT attempt unconditionally.
pub fn select_scan_source(volume_root: &Path) -> Box<dyn ScanSource> {
    let forced_directory = std::env::var("FORCE_DIRECTORY_SCAN")
        .map(|v| v == "1")
        .unwrap_or(false);

    if forced_directory {
        tracing::info!("FORCE_DIRECTORY_SCAN=1 set, skipping MFT source");
        return Box::new(directory::DirectoryScanSource::new(volume_root.to_path_buf()));
    }

    if mft::is_mft_available(volume_root) {
        tracing::info!("selected MFT scan source for {}", volume_root.display());
        Box::new(mft::MftScanSource::new(volume_root.to_path_buf()))
    } else {
        tracing::info!(
            "selected directory scan source for {}",
            volume_root.display()
        );
        Box::new(directory::DirectoryScanSource::new(volume_root.to_path_buf()))
    }
}
