/// File type categorisation based on file extensions.
///
/// Groups files into broad categories (Documents, Images, Video, Audio,
/// Archives, Code, Executables, System, Other) and computes size/count
/// totals per category — a coarser view than the literal per-extension
/// [`crate::model::ExtensionGroup`] list, useful for a category-level chart
/// without forcing the host to bucket raw extensions itself.
use std::collections::HashMap;

use crate::model::TreeNode;

/// Broad file type categories for visual grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Documents,
    Images,
    Video,
    Audio,
    Archives,
    Code,
    Executables,
    System,
    Other,
}

impl FileCategory {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Code => "Code",
            Self::Executables => "Executables",
            Self::System => "System",
            Self::Other => "Other",
        }
    }
}

/// Size and count totals for a single file category.
#[derive(Debug, Default, Clone)]
pub struct CategoryStats {
    pub category: Option<FileCategory>,
    pub total_size: u64,
    pub file_count: u64,
}

/// Categorise a file extension into a broad category.
///
/// Zero-heap-allocation hot path: extensions are lowercased into a fixed-size
/// stack buffer (`[u8; 16]`) rather than allocating a `String`. File
/// extensions longer than 16 bytes are treated as `Other`.
pub fn categorise_extension(ext: &str) -> FileCategory {
    // Fast rejection: any extension longer than 16 bytes is definitely `Other`.
    let bytes = ext.as_bytes();
    if bytes.len() > 16 {
        return FileCategory::Other;
    }

    // Lowercase into a stack buffer — zero heap allocation.
    let mut lower = [0u8; 16];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let lower_str = match std::str::from_utf8(&lower[..bytes.len()]) {
        Ok(s) => s,
        Err(_) => return FileCategory::Other,
    };

    match lower_str {
        // Documents
        "doc" | "docx" | "pdf" | "txt" | "rtf" | "odt" | "xls" | "xlsx" | "ppt" | "pptx"
        | "csv" | "md" | "epub" => FileCategory::Documents,
        // Images
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tiff" | "tif"
        | "psd" | "raw" | "cr2" | "nef" | "heic" | "heif" => FileCategory::Images,
        // Video
        "mp4" | "mkv" | "avi" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpg" | "mpeg" | "3gp" => {
            FileCategory::Video
        }
        // Audio
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "opus" => FileCategory::Audio,
        // Archives
        "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "xz" | "zst" | "cab" | "iso" | "dmg" => {
            FileCategory::Archives
        }
        // Code
        "rs" | "py" | "js" | "ts" | "jsx" | "tsx" | "c" | "cpp" | "h" | "hpp" | "cs" | "java"
        | "go" | "rb" | "php" | "swift" | "kt" | "scala" | "html" | "css" | "scss" | "json"
        | "xml" | "yaml" | "yml" | "toml" | "sql" | "sh" | "bat" | "ps1" => FileCategory::Code,
        // Executables
        "exe" | "msi" | "dll" | "so" | "dylib" | "app" | "com" | "scr" => FileCategory::Executables,
        // System
        "sys" | "drv" | "inf" | "cat" | "log" | "etl" | "dat" | "reg" | "tmp" | "bak" => {
            FileCategory::System
        }
        _ => FileCategory::Other,
    }
}

/// Compute per-category size and count stats for the whole tree.
pub fn analyse_file_types(root: &TreeNode) -> Vec<CategoryStats> {
    // There are exactly 9 categories — pre-size to avoid rehashing.
    let mut map: HashMap<FileCategory, CategoryStats> = HashMap::with_capacity(9);
    walk(root, &mut map);

    let mut results: Vec<CategoryStats> = map.into_values().collect();
    results.sort_by(|a, b| b.total_size.cmp(&a.total_size));
    results
}

fn walk(node: &TreeNode, map: &mut HashMap<FileCategory, CategoryStats>) {
    for child in &node.children {
        if child.is_directory {
            walk(child, map);
            continue;
        }

        let ext = child.name.rsplit('.').next().unwrap_or("");
        let cat = categorise_extension(ext);

        let entry = map.entry(cat).or_insert_with(|| CategoryStats {
            category: Some(cat),
            total_size: 0,
            file_count: 0,
        });
        entry.total_size += child.size_bytes;
        entry.file_count += 1;
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

    // ── categorise_extension ─────────────────────────────────────────────

    #[test]
    fn categorise_known_image_extensions() {
        for ext in &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "heic"] {
            assert_eq!(
                categorise_extension(ext),
                FileCategory::Images,
                "expected Images for .{ext}"
            );
        }
    }

    #[test]
    fn categorise_known_code_extensions() {
        for ext in &["rs", "py", "js", "ts", "c", "cpp", "go", "toml"] {
            assert_eq!(
                categorise_extension(ext),
                FileCategory::Code,
                "expected Code for .{ext}"
            );
        }
    }

    #[test]
    fn categorise_known_archive_extensions() {
        for ext in &["zip", "rar", "7z", "tar", "gz", "iso"] {
            assert_eq!(
                categorise_extension(ext),
                FileCategory::Archives,
                "expected Archives for .{ext}"
            );
        }
    }

    #[test]
    fn categorise_unknown_extension_returns_other() {
        assert_eq!(categorise_extension("xyz"), FileCategory::Other);
        assert_eq!(categorise_extension(""), FileCategory::Other);
    }

    /// Extension matching must be case-insensitive so "JPG" == "jpg".
    #[test]
    fn categorise_case_insensitive() {
        assert_eq!(categorise_extension("JPG"), FileCategory::Images);
        assert_eq!(categorise_extension("RS"), FileCategory::Code);
        assert_eq!(categorise_extension("ZIP"), FileCategory::Archives);
    }

    // ── analyse_file_types ───────────────────────────────────────────────

    /// A tree with two .rs files and one .png file should produce two
    /// non-zero categories: Code (total 200 B) and Images (100 B).
    #[test]
    fn analyse_aggregates_by_category() {
        let root = dir(
            "",
            vec![
                file("main.rs", 100),
                file("lib.rs", 100),
                file("logo.png", 100),
            ],
        );

        let stats = analyse_file_types(&root);

        let code = stats
            .iter()
            .find(|s| s.category == Some(FileCategory::Code))
            .expect("Code category missing");
        let images = stats
            .iter()
            .find(|s| s.category == Some(FileCategory::Images))
            .expect("Images category missing");

        assert_eq!(code.file_count, 2, "two .rs files");
        assert_eq!(code.total_size, 200);
        assert_eq!(images.file_count, 1);
        assert_eq!(images.total_size, 100);
    }

    /// Directories must not contribute to category stats.
    #[test]
    fn analyse_skips_directories() {
        let root = dir("", vec![dir("src", vec![])]);
        let stats = analyse_file_types(&root);
        assert!(
            stats.is_empty(),
            "expected no category stats when there are no files"
        );
    }

    /// An empty tree must return an empty result without panicking.
    #[test]
    fn analyse_empty_tree() {
        let root = dir("", vec![]);
        let stats = analyse_file_types(&root);
        assert!(stats.is_empty());
    }

    /// Results must be sorted by total_size descending so the largest
    /// category appears first.
    #[test]
    fn analyse_sorted_by_size_descending() {
        let root = dir(
            "",
            vec![file("big.zip", 1_000), file("small.rs", 10)],
        );

        let stats = analyse_file_types(&root);
        assert!(stats.len() >= 2);
        assert!(
            stats[0].total_size >= stats[1].total_size,
            "must be descending"
        );
        assert_eq!(stats[0].category, Some(FileCategory::Archives));
    }

    /// Extensions nested several directories deep must still be counted.
    #[test]
    fn analyse_descends_into_subdirectories() {
        let root = dir("", vec![dir("sub", vec![file("nested.mp3", 42)])]);
        let stats = analyse_file_types(&root);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].category, Some(FileCategory::Audio));
        assert_eq!(stats[0].total_size, 42);
    }
}
