/// Streaming tree builder — the single consumer of an Entry stream.
///
/// Ingests entries in arbitrary order, reconstructs parent/child hierarchy
/// by id, and aggregates sizes once the stream is exhausted. Moves through
/// `Accumulating -> Finalizing -> Built`; `build_tree` is legal only in
/// `Accumulating` and transitions to `Built` exactly once.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::model::{Entry, FileId, NodeBuilder, TreeNode, NTFS_ROOT_FILE_ID};

/// Parent chains longer than this are truncated rather than followed
/// indefinitely, defending against malformed or cyclic input.
const MAX_PATH_DEPTH: usize = 100;

/// Directories with more direct children than this build their subtrees in
/// parallel via `rayon`, since each child's subtree is independent — no
/// shared mutable state, operating only on disjoint subtrees, per the
/// concurrency model's requirement for any parallel aggregation pass. Small
/// directories (the overwhelming majority) stay sequential so typical scans
/// never pay thread-pool dispatch overhead.
const PARALLEL_FANOUT_THRESHOLD: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    Accumulating,
    Finalizing,
    Built,
}

pub struct TreeBuilder {
    scan_root: PathBuf,
    nodes_by_id: HashMap<FileId, NodeBuilder>,
    children_by_parent: HashMap<FileId, Vec<FileId>>,
    visited_ids: std::collections::HashSet<FileId>,
    root_file_id: Option<FileId>,
    total_files: u64,
    total_directories: u64,
    error_count: u64,
    state: BuilderState,
    /// Set when `build_tree` had to truncate a parent chain or synthesize a
    /// root — surfaced to the coordinator as `ScanError::InternalInvariant`
    /// only when the caller asks for it; the partial tree is still usable.
    incomplete: bool,
}

impl TreeBuilder {
    pub fn new(scan_root: PathBuf) -> Self {
        Self {
            scan_root,
            nodes_by_id: HashMap::new(),
            children_by_parent: HashMap::new(),
            visited_ids: std::collections::HashSet::new(),
            root_file_id: None,
            total_files: 0,
            total_directories: 0,
            error_count: 0,
            state: BuilderState::Accumulating,
            incomplete: false,
        }
    }

    pub fn total_files(&self) -> u64 {
        self.total_files
    }

    pub fn total_directories(&self) -> u64 {
        self.total_directories
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    /// Record a local fault absorbed by the builder (never propagated).
    pub fn on_error(&mut self, _path: &str, _kind: &str) {
        self.error_count += 1;
    }

    /// Ingest one entry. Duplicate `file_id`s (hard links, repeated IDs,
    /// cycles) are dropped silently after the first sighting.
    pub fn on_entry(&mut self, entry: Entry) {
        debug_assert_eq!(self.state, BuilderState::Accumulating);

        if self.visited_ids.contains(&entry.file_id) {
            return;
        }
        self.visited_ids.insert(entry.file_id);

        if entry.is_directory() {
            self.total_directories += 1;
        } else {
            self.total_files += 1;
        }

        if self.root_file_id.is_none() && self.looks_like_root(&entry) {
            self.root_file_id = Some(entry.file_id);
        }

        let is_root = self.root_file_id == Some(entry.file_id);
        let node = NodeBuilder::from_entry(&entry);
        self.nodes_by_id.insert(entry.file_id, node);

        if !is_root {
            self.children_by_parent
                .entry(entry.parent_file_id)
                .or_default()
                .push(entry.file_id);
        }
    }

    /// An entry names the scan root if it has no name, its name matches the
    /// scan root's final path segment, its parent id equals its own id, or
    /// it matches a source-specific sentinel (NTFS root is a fixed id).
    fn looks_like_root(&self, entry: &Entry) -> bool {
        if entry.name.is_empty() {
            return true;
        }
        if entry.parent_file_id == entry.file_id {
            return true;
        }
        if entry.file_id == NTFS_ROOT_FILE_ID {
            return true;
        }
        if let Some(last_segment) = self.scan_root.file_name() {
            if last_segment.to_string_lossy() == entry.name.as_str() {
                return true;
            }
        }
        false
    }

    /// Finalize the tree: synthesize a root if none was observed, resolve
    /// full paths, then recursively aggregate sizes post-order. Legal only
    /// once; subsequent calls panic via the debug assertion above in debug
    /// builds, and are a silent no-op-on-stale-state in release.
    ///
    /// The returned `bool` is `true` when the builder had to synthesize a
    /// root, re-home an orphan, or truncate a parent chain past the depth
    /// cap — the tree is still fully constructed and usable, but is a
    /// best-effort reconstruction rather than an exact one.
    pub fn build_tree(mut self) -> (TreeNode, bool) {
        self.state = BuilderState::Finalizing;

        let root_id = match self.root_file_id {
            Some(id) => id,
            None => {
                let synthetic_id = FileId::from_path(&self.scan_root.to_string_lossy());
                let name = self
                    .scan_root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.nodes_by_id.insert(
                    synthetic_id,
                    NodeBuilder {
                        file_id: synthetic_id,
                        parent_file_id: synthetic_id,
                        attributes: crate::model::Attributes::DIRECTORY,
                        size: 0,
                        last_write_time: 0,
                        name: compact_str::CompactString::new(&name),
                    },
                );
                self.incomplete = true;
                synthetic_id
            }
        };

        self.reparent_orphans_to_root(root_id);
        let full_paths = self.resolve_full_paths(root_id);

        let root = self.build_subtree(root_id, &full_paths);
        self.state = BuilderState::Built;
        (root, self.incomplete)
    }

    /// Re-home nodes whose `parent_file_id` never arrived as its own entry
    /// so they become direct children of the root in the output tree,
    /// rather than silently unreachable because their original bucket in
    /// `children_by_parent` is keyed by a parent id no node ever claims.
    fn reparent_orphans_to_root(&mut self, root_id: FileId) {
        let orphan_ids: Vec<FileId> = self
            .nodes_by_id
            .values()
            .filter(|node| {
                node.file_id != root_id && !self.nodes_by_id.contains_key(&node.parent_file_id)
            })
            .map(|node| node.file_id)
            .collect();

        if orphan_ids.is_empty() {
            return;
        }

        self.incomplete = true;
        let bucket = self.children_by_parent.entry(root_id).or_default();
        for id in orphan_ids {
            bucket.push(id);
        }
    }

    /// Walk each node's parent chain up to `root_id`, bounded at
    /// `MAX_PATH_DEPTH`, assembling a full path. Orphans (parent id not in
    /// the map) are attached directly under the scan root.
    fn resolve_full_paths(&mut self, root_id: FileId) -> HashMap<FileId, PathBuf> {
        let mut full_paths = HashMap::with_capacity(self.nodes_by_id.len());
        full_paths.insert(root_id, self.scan_root.clone());

        let ids: Vec<FileId> = self.nodes_by_id.keys().copied().collect();
        for id in ids {
            if full_paths.contains_key(&id) {
                continue;
            }
            let path = self.resolve_one_path(id, root_id, &mut full_paths);
            full_paths.insert(id, path);
        }

        full_paths
    }

    fn resolve_one_path(
        &mut self,
        id: FileId,
        root_id: FileId,
        resolved: &mut HashMap<FileId, PathBuf>,
    ) -> PathBuf {
        let mut chain = Vec::new();
        let mut current = id;
        let mut depth = 0;

        loop {
            if let Some(path) = resolved.get(&current) {
                let mut result = path.clone();
                for segment in chain.iter().rev() {
                    result.push(segment);
                }
                return result;
            }

            if current == root_id {
                let mut result = self.scan_root.clone();
                for segment in chain.iter().rev() {
                    result.push(segment);
                }
                return result;
            }

            let node = match self.nodes_by_id.get(&current) {
                Some(n) => n,
                None => {
                    // Orphan: attach under the scan root directly.
                    self.incomplete = true;
                    let mut result = self.scan_root.clone();
                    for segment in chain.iter().rev() {
                        result.push(segment);
                    }
                    return result;
                }
            };

            chain.push(node.name.to_string());

            depth += 1;
            if depth > MAX_PATH_DEPTH {
                self.incomplete = true;
                let mut result = self.scan_root.clone();
                result.push("__truncated__");
                for segment in chain.iter().rev() {
                    result.push(segment);
                }
                return result;
            }

            current = node.parent_file_id;
        }
    }

    /// Post-order construction: build all children first, sum their
    /// aggregated sizes, add own size, sort children by size descending
    /// (stable on ties, by name).
    fn build_subtree(&self, id: FileId, full_paths: &HashMap<FileId, PathBuf>) -> TreeNode {
        let node = self
            .nodes_by_id
            .get(&id)
            .expect("every child id referenced by children_by_parent has a NodeBuilder");

        let full_path = full_paths
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.scan_root.clone());

        let child_ids = self.children_by_parent.get(&id).cloned().unwrap_or_default();

        let mut children: Vec<TreeNode> = if child_ids.len() > PARALLEL_FANOUT_THRESHOLD {
            child_ids
                .par_iter()
                .map(|child_id| self.build_subtree(*child_id, full_paths))
                .collect()
        } else {
            child_ids
                .iter()
                .map(|child_id| self.build_subtree(*child_id, full_paths))
                .collect()
        };

        children.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes).then_with(|| a.name.cmp(&b.name)));

        let children_total: u64 = children.iter().map(|c| c.size_bytes).sum();
        let own_size = if node.is_directory() { 0 } else { node.size };

        TreeNode {
            name: node.name.to_string(),
            full_path: full_path.to_string_lossy().into_owned(),
            is_directory: node.is_directory(),
            size_bytes: own_size + children_total,
            modified: Entry::filetime_to_system_time(node.last_write_time),
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attributes;
    use compact_str::CompactString;

    fn entry(id: u128, parent: u128, name: &str, is_dir: bool, size: u64) -> Entry {
        Entry {
            file_id: FileId(id),
            parent_file_id: FileId(parent),
            attributes: if is_dir {
                Attributes::DIRECTORY
            } else {
                Attributes::empty()
            },
            size,
            allocation_size: size,
            creation_time: 0,
            last_write_time: 0,
            name: CompactString::new(name),
            link_count: 1,
        }
    }

    #[test]
    fn s1_root_only() {
        let mut builder = TreeBuilder::new(PathBuf::from("/root"));
        builder.on_entry(entry(1, 1, "", true, 0));
        let (root, _incomplete) = builder.build_tree();
        assert_eq!(root.size_bytes, 0);
        assert!(root.children.is_empty());
    }

    #[test]
    fn s2_root_plus_one_file() {
        let mut builder = TreeBuilder::new(PathBuf::from("/root"));
        builder.on_entry(entry(1, 1, "", true, 0));
        builder.on_entry(entry(2, 1, "a.txt", false, 1024));
        let (root, _incomplete) = builder.build_tree();
        assert_eq!(root.size_bytes, 1024);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "a.txt");
        assert_eq!(root.children[0].size_bytes, 1024);
    }

    #[test]
    fn s3_nested_directories_sorted_by_size_desc() {
        let mut builder = TreeBuilder::new(PathBuf::from("/root"));
        builder.on_entry(entry(1, 1, "", true, 0));
        builder.on_entry(entry(2, 1, "folder1", true, 0));
        builder.on_entry(entry(3, 2, "folder2", true, 0));
        builder.on_entry(entry(4, 3, "deep.txt", false, 2048));
        builder.on_entry(entry(5, 2, "another.txt", false, 1024));
        let (root, _incomplete) = builder.build_tree();

        assert_eq!(root.size_bytes, 3072);
        assert_eq!(root.children.len(), 1);
        let folder1 = &root.children[0];
        assert_eq!(folder1.name, "folder1");
        assert_eq!(folder1.size_bytes, 3072);
        assert_eq!(folder1.children.len(), 2);
        assert_eq!(folder1.children[0].name, "folder2");
        assert_eq!(folder1.children[0].size_bytes, 2048);
        assert_eq!(folder1.children[1].name, "another.txt");
        assert_eq!(folder1.children[1].size_bytes, 1024);
    }

    #[test]
    fn s4_duplicate_id_is_ignored() {
        let mut builder = TreeBuilder::new(PathBuf::from("/root"));
        builder.on_entry(entry(1, 1, "", true, 0));
        builder.on_entry(entry(2, 1, "t.txt", false, 1024));
        builder.on_entry(entry(2, 1, "dup.txt", false, 2048));
        let (root, _incomplete) = builder.build_tree();

        assert_eq!(root.size_bytes, 1024);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "t.txt");
    }

    #[test]
    fn s5_orphan_child_attaches_under_root() {
        let mut builder = TreeBuilder::new(PathBuf::from("/root"));
        builder.on_entry(entry(1, 1, "", true, 0));
        builder.on_entry(entry(3, 2, "orphan_child", true, 0));
        let (root, incomplete) = builder.build_tree();

        assert_eq!(root.size_bytes, 0);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "orphan_child");
        assert!(incomplete, "orphan reparenting must flag the tree incomplete");
    }

    #[test]
    fn s6_flat_files_all_present_exactly_once() {
        let mut builder = TreeBuilder::new(PathBuf::from("/root"));
        builder.on_entry(entry(1, 1, "", true, 0));
        for i in 0..10_000u128 {
            builder.on_entry(entry(2 + i, 1, &format!("f{i}.bin"), false, 1024));
        }
        let (root, _incomplete) = builder.build_tree();

        assert_eq!(root.size_bytes, 10_485_760);
        assert_eq!(root.children.len(), 10_000);
    }

    #[test]
    fn deep_chain_truncates_without_crashing() {
        let mut builder = TreeBuilder::new(PathBuf::from("/root"));
        builder.on_entry(entry(1, 1, "", true, 0));
        let mut parent = 1u128;
        for depth in 0..150u128 {
            let id = 1000 + depth;
            builder.on_entry(entry(id, parent, &format!("d{depth}"), true, 0));
            parent = id;
        }
        let (root, incomplete) = builder.build_tree();
        // Must not panic or infinite loop; the chain resolves somewhere.
        assert!(root.node_count() > 100);
        assert!(incomplete, "depth-cap truncation must flag the tree incomplete");
    }

    #[test]
    fn no_root_observed_synthesizes_one() {
        let mut builder = TreeBuilder::new(PathBuf::from("/root/scan_target"));
        builder.on_entry(entry(2, 1, "a.txt", false, 512));
        let (root, incomplete) = builder.build_tree();
        assert_eq!(root.name, "scan_target");
        assert!(root.is_directory);
        assert!(incomplete, "a synthesized root must flag the tree incomplete");
    }
}
