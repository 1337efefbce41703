/// Post-scan analyzers — derive drive totals, largest files, extension
/// groups, file-type categories, and stale-file candidates from a finished
/// [`crate::model::TreeNode`].
pub mod age;
pub mod duplicates;
pub mod extensions;
pub mod file_types;
pub mod top_files;

pub use age::{find_stale_files, StaleFile};
pub use duplicates::{find_duplicates, DuplicateGroup};
pub use extensions::group_by_extension;
pub use file_types::{analyse_file_types, categorise_extension, CategoryStats, FileCategory};
pub use top_files::top_n_files;
