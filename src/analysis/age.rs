/// File age analysis — find old/stale files that haven't been modified
/// recently.
use std::time::{Duration, SystemTime};

use crate::model::TreeNode;

/// A file identified as old/stale.
pub struct StaleFile {
    pub path: String,
    pub size: u64,
    pub last_modified: SystemTime,
    pub age_days: u64,
}

/// Find files not modified in the last `min_age_days` days, sorted by size
/// descending.
///
/// Returns an empty vec immediately when `max_results == 0`, which also
/// avoids an integer underflow (`max_results - 1` wrapping to `usize::MAX`)
/// that would panic inside `select_nth_unstable_by`.
pub fn find_stale_files(root: &TreeNode, min_age_days: u64, max_results: usize) -> Vec<StaleFile> {
    // Guard: requesting zero results is always satisfiable trivially, and
    // prevents the `max_results - 1` subtraction below from underflowing.
    if max_results == 0 {
        return Vec::new();
    }

    let now = SystemTime::now();
    let threshold = Duration::from_secs(min_age_days * 24 * 3600);

    let mut stale = Vec::new();
    collect_stale(root, now, threshold, &mut stale);

    // Partial sort: O(n) select + O(k log k) sort of top-k, vs O(n log n) full sort.
    if stale.len() > max_results {
        stale.select_nth_unstable_by(max_results - 1, |a, b| b.size.cmp(&a.size));
        stale.truncate(max_results);
    }
    stale.sort_unstable_by(|a, b| b.size.cmp(&a.size));
    stale
}

fn collect_stale(node: &TreeNode, now: SystemTime, threshold: Duration, out: &mut Vec<StaleFile>) {
    for child in &node.children {
        if child.is_directory {
            collect_stale(child, now, threshold, out);
            continue;
        }

        let Some(modified) = child.modified else {
            continue;
        };
        let Ok(age) = now.duration_since(modified) else {
            continue;
        };
        if age >= threshold {
            out.push(StaleFile {
                path: child.full_path.clone(),
                size: child.size_bytes,
                last_modified: modified,
                age_days: age.as_secs() / 86_400,
            });
        }
    }
}
