/// Data model for the volume scanner.
///
/// Re-exports the producer-side [`Entry`] record, the streaming builder's
/// intermediate [`NodeBuilder`] state, the immutable output [`TreeNode`]
/// tree, and the result types returned from a completed scan.
pub mod drive_stats;
pub mod entry;
pub mod node_builder;
pub mod scan_result;
pub mod size;
pub mod tree_node;

pub use drive_stats::DriveStats;
pub use entry::{Attributes, Entry, FileId, NTFS_ROOT_FILE_ID};
pub use node_builder::NodeBuilder;
pub use scan_result::{ExtensionGroup, ScanResult, TopItem};
pub use tree_node::TreeNode;
