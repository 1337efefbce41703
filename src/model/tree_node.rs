/// The immutable output of [`crate::scanner::TreeBuilder::build_tree`].
///
/// A `TreeNode` never changes after construction: `size_bytes` for a
/// directory is the recursive aggregate of everything beneath it, computed
/// once during the post-order finalization pass, and `children` is sorted
/// by `size_bytes` descending (stable on ties, by name).
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub full_path: String,
    pub is_directory: bool,
    /// Own size for a file; recursive aggregate of own size plus every
    /// descendant's `size_bytes` for a directory.
    pub size_bytes: u64,
    /// Last-write time, when the source reported one. Supplemental field
    /// used by the age/staleness analyzer.
    #[serde(with = "system_time_opt")]
    pub modified: Option<SystemTime>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Depth-first count of every node in this subtree, root included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Depth-first count of non-directory nodes in this subtree.
    pub fn file_count(&self) -> usize {
        let own = if self.is_directory { 0 } else { 1 };
        own + self
            .children
            .iter()
            .map(TreeNode::file_count)
            .sum::<usize>()
    }
}

/// `serde` has no built-in `SystemTime` support that survives round-tripping
/// through JSON cleanly across platforms, so this stores Unix seconds.
mod system_time_opt {
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<SystemTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let secs = value.map(|t| {
            t.duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
        secs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SystemTime>, D::Error> {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(|s| UNIX_EPOCH + std::time::Duration::from_secs(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, size: u64) -> TreeNode {
        TreeNode {
            name: name.to_string(),
            full_path: format!("/root/{name}"),
            is_directory: false,
            size_bytes: size,
            modified: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn node_count_includes_self() {
        let leaf = leaf("a.txt", 10);
        assert_eq!(leaf.node_count(), 1);
        assert_eq!(leaf.file_count(), 1);
    }

    #[test]
    fn file_count_excludes_directories() {
        let dir = TreeNode {
            name: "dir".to_string(),
            full_path: "/root/dir".to_string(),
            is_directory: true,
            size_bytes: 10,
            modified: None,
            children: vec![leaf("a.txt", 10)],
        };
        assert_eq!(dir.node_count(), 2);
        assert_eq!(dir.file_count(), 1);
    }
}
