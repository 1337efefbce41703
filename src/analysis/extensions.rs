/// Extension-group analysis.
///
/// Depth-first traversal over files; key is the lower-cased substring after
/// the final `.` in the name, provided `.` is neither the first nor the
/// last character (names without a qualifying extension are bucketed as
/// `<none>` and excluded from the final summary); sums sizes and counts per
/// key; sorts descending by total size; keeps the top 15.
use std::collections::HashMap;

use crate::model::{ExtensionGroup, TreeNode};

const TOP_N: usize = 15;
const NONE_BUCKET: &str = "<none>";

pub fn group_by_extension(root: &TreeNode, top_n: usize) -> Vec<ExtensionGroup> {
    let mut totals: HashMap<String, (u64, u64)> = HashMap::new();
    walk(root, &mut totals);
    totals.remove(NONE_BUCKET);

    let mut groups: Vec<ExtensionGroup> = totals
        .into_iter()
        .map(|(extension, (total_size, file_count))| ExtensionGroup {
            extension,
            total_size,
            file_count,
        })
        .collect();

    groups.sort_by(|a, b| b.total_size.cmp(&a.total_size));
    groups.truncate(top_n);
    groups
}

/// Convenience wrapper using the default top-15 cutoff.
pub fn group_by_extension_default(root: &TreeNode) -> Vec<ExtensionGroup> {
    group_by_extension(root, TOP_N)
}

fn walk(node: &TreeNode, totals: &mut HashMap<String, (u64, u64)>) {
    for child in &node.children {
        if child.is_directory {
            walk(child, totals);
            continue;
        }

        let key = extension_key(&child.name);
        let entry = totals.entry(key).or_insert((0, 0));
        entry.0 += child.size_bytes;
        entry.1 += 1;
    }
}

fn extension_key(name: &str) -> String {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos < name.len() - 1 => name[pos + 1..].to_lowercase(),
        _ => NONE_BUCKET.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> TreeNode {
        TreeNode {
            name: name.to_string(),
            full_path: format!("/root/{name}"),
            is_directory: false,
            size_bytes: size,
            modified: None,
            children: Vec::new(),
        }
    }

    fn dir(name: &str, children: Vec<TreeNode>) -> TreeNode {
        let size = children.iter().map(|c| c.size_bytes).sum();
        TreeNode {
            name: name.to_string(),
            full_path: format!("/root/{name}"),
            is_directory: true,
            size_bytes: size,
            modified: None,
            children,
        }
    }

    #[test]
    fn groups_and_sums_by_lowercased_extension() {
        let root = dir(
            "",
            vec![file("a.TXT", 10), file("b.txt", 20), file("c.rs", 5)],
        );
        let groups = group_by_extension(&root, 15);
        let txt = groups.iter().find(|g| g.extension == "txt").unwrap();
        assert_eq!(txt.total_size, 30);
        assert_eq!(txt.file_count, 2);
    }

    #[test]
    fn excludes_names_without_qualifying_extension() {
        let root = dir(
            "",
            vec![file("README", 10), file(".gitignore", 5), file("trailing.", 5)],
        );
        let groups = group_by_extension(&root, 15);
        assert!(groups.is_empty());
    }

    #[test]
    fn keeps_only_top_15() {
        let children: Vec<TreeNode> = (0..20)
            .map(|i| file(&format!("f{i}.ext{i}"), i))
            .collect();
        let root = dir("", children);
        let groups = group_by_extension(&root, 15);
        assert_eq!(groups.len(), 15);
    }

    #[test]
    fn descends_into_subdirectories() {
        let root = dir("", vec![dir("sub", vec![file("nested.log", 42)])]);
        let groups = group_by_extension(&root, 15);
        assert_eq!(groups[0].extension, "log");
        assert_eq!(groups[0].total_size, 42);
    }
}
