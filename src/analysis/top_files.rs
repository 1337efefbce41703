/// Top-N largest files analysis.
///
/// Depth-first traversal of the tree, visiting each directory's children in
/// descending size order (already the tree's own sort order); collects up
/// to `3N` candidates, filters to non-directories, sorts descending by
/// size, and takes the first `N`. Ties are broken by lexicographic name.
use crate::model::{ScanResult, TopItem, TreeNode};

pub fn top_n_files(root: &TreeNode, n: usize) -> Vec<TopItem> {
    if n == 0 {
        return Vec::new();
    }

    let mut candidates = Vec::with_capacity(n * 3);
    collect_candidates(root, n * 3, &mut candidates);

    candidates.retain(|item| !item.is_directory);
    candidates.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes).then_with(|| a.name.cmp(&b.name)));
    candidates.truncate(n);
    candidates
}

fn collect_candidates(node: &TreeNode, limit: usize, out: &mut Vec<TopItem>) {
    if out.len() >= limit {
        return;
    }
    for child in &node.children {
        if out.len() >= limit {
            return;
        }
        out.push(TopItem {
            name: child.name.clone(),
            full_path: child.full_path.clone(),
            size_bytes: child.size_bytes,
            is_directory: child.is_directory,
        });
        if child.is_directory {
            collect_candidates(child, limit, out);
        }
    }
}

/// Convenience wrapper over a completed [`ScanResult`].
pub fn top_n_files_from_result(result: &ScanResult, n: usize) -> Vec<TopItem> {
    top_n_files(&result.root, n)
}
