/// Per-id bookkeeping that [`crate::scanner::TreeBuilder`] keeps while an
/// Entry stream is still arriving.
///
/// A `NodeBuilder` lives from the first sighting of its `file_id` until
/// [`crate::scanner::TreeBuilder::build_tree`] consumes it and produces the
/// matching immutable [`crate::model::TreeNode`]. Unlike `TreeNode`, it
/// carries no computed aggregate and no full path — those are resolved once,
/// in finalization, so that out-of-order arrival never requires revisiting
/// already-ingested entries. Parent-to-children adjacency is tracked
/// separately by the builder, keyed by id, rather than on this struct.
use compact_str::CompactString;

use super::entry::{Attributes, FileId};

#[derive(Debug, Clone)]
pub struct NodeBuilder {
    pub file_id: FileId,
    pub parent_file_id: FileId,
    pub attributes: Attributes,
    pub size: u64,
    pub last_write_time: u64,
    pub name: CompactString,
}

impl NodeBuilder {
    pub fn from_entry(entry: &crate::model::Entry) -> Self {
        Self {
            file_id: entry.file_id,
            parent_file_id: entry.parent_file_id,
            attributes: entry.attributes,
            size: entry.size,
            last_write_time: entry.last_write_time,
            name: entry.name.clone(),
        }
    }

    #[inline]
    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }
}
