/// Result types produced at the end of a completed scan.
use serde::{Deserialize, Serialize};

use super::{DriveStats, TreeNode};

/// One entry in the top-N largest files list. Directories are never
/// included by convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopItem {
    pub name: String,
    pub full_path: String,
    pub size_bytes: u64,
    pub is_directory: bool,
}

/// Aggregate size and count for one literal file extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionGroup {
    pub extension: String,
    pub total_size: u64,
    pub file_count: u64,
}

/// Everything a completed scan produces: the capacity snapshot, the
/// aggregated tree, and the post-scan analyzer outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub drive: DriveStats,
    pub root: TreeNode,
    pub top_files: Vec<TopItem>,
    pub by_extension: Vec<ExtensionGroup>,
    /// Total non-directory entries ingested. Carried through so a host can
    /// report a final count without walking `root` again.
    pub total_files: u64,
    pub total_directories: u64,
    /// Count of `AccessDenied`/`CorruptRecord` faults absorbed during the
    /// scan. Zero on a clean run.
    pub error_count: u64,
    /// Set when the builder had to synthesize a root, truncate a parent
    /// chain past the depth cap, or re-home an orphaned node — i.e. when
    /// `ScanError::InternalInvariant` would apply but the tree is still
    /// usable. The scan still returns `Ok`; this flag is how a host learns
    /// the tree is a best-effort reconstruction rather than exact.
    pub incomplete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ScanResult {
        let child = TreeNode {
            name: "a.txt".to_string(),
            full_path: "/root/a.txt".to_string(),
            is_directory: false,
            size_bytes: 1024,
            modified: None,
            children: Vec::new(),
        };
        let root = TreeNode {
            name: String::new(),
            full_path: "/root".to_string(),
            is_directory: true,
            size_bytes: 1024,
            modified: None,
            children: vec![child.clone()],
        };

        ScanResult {
            drive: DriveStats {
                letter_or_label: "C:".to_string(),
                total_bytes: 1_000_000,
                used_bytes: 400_000,
                free_bytes: 600_000,
            },
            root,
            top_files: vec![TopItem {
                name: child.name.clone(),
                full_path: child.full_path.clone(),
                size_bytes: child.size_bytes,
                is_directory: false,
            }],
            by_extension: vec![ExtensionGroup {
                extension: "txt".to_string(),
                total_size: 1024,
                file_count: 1,
            }],
            total_files: 1,
            total_directories: 1,
            error_count: 0,
            incomplete: false,
        }
    }

    /// A `ScanResult` must round-trip through JSON byte-for-byte equal,
    /// covering both the builder idempotence property (invariant #7) and
    /// the Directory source's run-to-run determinism (invariant #8) at the
    /// serialization boundary a host actually uses to persist or transmit a
    /// finished scan.
    #[test]
    fn scan_result_round_trips_through_json() {
        let original = sample_result();
        let json = serde_json::to_string(&original).expect("ScanResult must serialize");
        let restored: ScanResult =
            serde_json::from_str(&json).expect("ScanResult must deserialize");

        assert_eq!(restored.root.size_bytes, original.root.size_bytes);
        assert_eq!(restored.root.children.len(), original.root.children.len());
        assert_eq!(restored.drive.total_bytes, original.drive.total_bytes);
        assert_eq!(restored.top_files, original.top_files);
        assert_eq!(restored.by_extension, original.by_extension);
        assert_eq!(restored.total_files, original.total_files);
        assert_eq!(restored.total_directories, original.total_directories);
        assert_eq!(restored.incomplete, original.incomplete);
    }
}
