/// Platform-specific functionality — drive enumeration, capacity sampling,
/// elevation checks, and volume path normalization.
///
/// `drives` and `permissions` carry Windows implementations gated behind
/// `cfg(windows)`, each with a portable fallback so the crate always
/// compiles; `volume_path` is platform-independent.
pub mod drives;
pub mod permissions;
pub mod volume_path;

pub use drives::{enumerate_drives, sample_drive_stats, DriveInfo, DriveType};
pub use permissions::is_elevated;
pub use volume_path::{is_drive_root, normalize_volume_path};
