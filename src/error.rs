/// Error taxonomy for the volume scanning core.
///
/// Every failure produced anywhere in this crate maps onto exactly one of
/// these kinds. Local faults (`AccessDenied`, `CorruptRecord`) never reach
/// a [`crate::scanner::Coordinator`] caller — they are consumed by the
/// source or builder's own error sink and only ever surface through the
/// `error_count` on [`crate::model::ScanResult`] or a `tracing` log line.
/// `SourceUnavailable` is consumed by the scan-source factory during
/// selection. Only `HostIoError`, `InternalInvariant`, and `ScanAborted`
/// are constructible values of the error this crate's public entry point
/// returns.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The preferred scan source could not be opened or queried — wrong OS,
    /// non-NTFS filesystem, insufficient privilege, or a failed control
    /// call. Recoverable: the factory falls back to the Directory source.
    #[error("scan source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    /// The volume itself could not be reached — not mounted, path does not
    /// exist, or the host ran out of file handles. Fatal; propagates to
    /// the caller of `Coordinator::scan`.
    #[error("I/O error scanning {path}: {message}")]
    HostIoError { path: PathBuf, message: String },

    /// A single directory or file could not be opened. Recoverable: logged
    /// and the subtree is skipped, never reaches the coordinator.
    #[error("access denied: {path}")]
    AccessDenied { path: PathBuf },

    /// A malformed USN record or an unreadable directory entry. Recoverable:
    /// the record is skipped and the scan continues.
    #[error("corrupt record while reading {path}: {detail}")]
    CorruptRecord { path: PathBuf, detail: String },

    /// Cancellation was signalled. Terminal: no `ScanResult` is constructed
    /// and no further progress reports are emitted.
    #[error("scan aborted by cancellation")]
    ScanAborted,

    /// A structural invariant was violated beyond what the builder's
    /// defenses (visited-set, bounded parent-chain depth) can absorb
    /// cleanly — e.g. the bounded depth cap was hit while resolving paths.
    /// Recoverable: the partial tree is still returned, flagged incomplete.
    #[error("internal invariant violated: {detail}")]
    InternalInvariant { detail: String },
}
