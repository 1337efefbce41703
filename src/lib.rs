/// Volscan Core — volume scanning, tree aggregation, and post-scan analysis.
///
/// This crate contains all business logic with zero UI dependencies. It is
/// designed to be embedded by a host shell (GUI, CLI, or TUI) that supplies
/// a volume root, a progress callback, and a cancellation token, and
/// receives back a single [`model::ScanResult`].
///
/// # Modules
///
/// - [`model`] — the data model: `Entry`, the tree-builder's intermediate
///   `NodeBuilder`, the immutable output `TreeNode`, and `ScanResult`.
/// - [`scanner`] — `ScanSource` (MFT and Directory variants), `TreeBuilder`,
///   and the `Coordinator` that drives both.
/// - [`analysis`] — post-scan analyzers: top files, extension groups, file
///   categories, and stale-file detection.
/// - [`platform`] — drive enumeration, permission/elevation checks, and
///   volume path normalization.
/// - [`error`] — the crate-wide error taxonomy.
pub mod analysis;
pub mod error;
pub mod model;
pub mod platform;
pub mod scanner;

pub use error::ScanError;
