/// One record per filesystem object observed by a [`crate::scanner::ScanSource`].
///
/// `Entry` is a transient, zero-allocation-where-possible value: it is
/// produced once by a source, consumed once by the
/// [`crate::scanner::TreeBuilder`], and then discarded. It never outlives
/// the scan that created it.
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

bitflags::bitflags! {
    /// Bit-set over the NTFS-style file attributes a scan source may report.
    ///
    /// `Directory` and `ReparsePoint` are load-bearing: the tree builder and
    /// both scan sources branch on them. The remainder are carried through
    /// for downstream consumers (e.g. a host UI badge) but do not affect
    /// aggregation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Attributes: u32 {
        const READ_ONLY            = 1 << 0;
        const HIDDEN                = 1 << 1;
        const SYSTEM                = 1 << 2;
        const DIRECTORY             = 1 << 3;
        const ARCHIVE                = 1 << 4;
        const DEVICE                 = 1 << 5;
        const NORMAL                 = 1 << 6;
        const TEMPORARY              = 1 << 7;
        const SPARSE_FILE            = 1 << 8;
        const REPARSE_POINT          = 1 << 9;
        const COMPRESSED             = 1 << 10;
        const OFFLINE                = 1 << 11;
        const NOT_CONTENT_INDEXED    = 1 << 12;
        const ENCRYPTED              = 1 << 13;
    }
}

impl Attributes {
    #[inline]
    pub fn is_directory(self) -> bool {
        self.contains(Attributes::DIRECTORY)
    }

    #[inline]
    pub fn is_reparse_point(self) -> bool {
        self.contains(Attributes::REPARSE_POINT)
    }
}

/// Opaque 128-bit identifier, unique within a single scan.
///
/// On the MFT source this is the NTFS file-reference number (a 64-bit value
/// for USN v2 records, widened; a genuine 128-bit value for USN v3). On the
/// Directory source it is a SHA-256-based digest of the normalized absolute
/// path — see [`FileId::from_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub u128);

/// The NTFS root directory's fixed MFT reference number.
pub const NTFS_ROOT_FILE_ID: FileId = FileId(5);

impl FileId {
    /// Widen a 64-bit USN v2 file reference number into a `FileId`.
    #[inline]
    pub fn from_ntfs_ref_v2(file_reference: u64) -> Self {
        Self(file_reference as u128)
    }

    /// A USN v3 record already carries a 128-bit file reference.
    #[inline]
    pub fn from_ntfs_ref_v3(file_reference: u128) -> Self {
        Self(file_reference)
    }

    /// Synthesize a deterministic id for the Directory source: a SHA-256
    /// digest of the normalized, case-folded absolute path, truncated to
    /// 128 bits. Two scans of the same static tree therefore produce
    /// identical ids run to run, and two different paths collide only with
    /// cryptographic-hash probability.
    pub fn from_path(normalized_absolute_path: &str) -> Self {
        let folded = normalized_absolute_path.to_lowercase();
        let digest = Sha256::digest(folded.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(u128::from_be_bytes(bytes))
    }
}

/// A single filesystem record as produced by a [`crate::scanner::ScanSource`].
#[derive(Debug, Clone)]
pub struct Entry {
    pub file_id: FileId,
    pub parent_file_id: FileId,
    pub attributes: Attributes,
    /// Logical byte length. Always `0` for directories.
    pub size: u64,
    /// On-disk footprint including cluster slack.
    pub allocation_size: u64,
    /// 64-bit Windows FILETIME-compatible integer (100ns ticks since 1601).
    pub creation_time: u64,
    /// 64-bit Windows FILETIME-compatible integer (100ns ticks since 1601).
    pub last_write_time: u64,
    /// Final path component only — never contains a separator. Empty only
    /// for the scan root.
    pub name: CompactString,
    /// Hard-link count; always >= 1.
    pub link_count: u32,
}

impl Entry {
    #[inline]
    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    #[inline]
    pub fn is_reparse_point(&self) -> bool {
        self.attributes.is_reparse_point()
    }

    /// Convert a `SystemTime` into a FILETIME-style 100ns-tick count, the
    /// representation every source is expected to report timestamps in.
    pub fn system_time_to_filetime(time: std::time::SystemTime) -> u64 {
        const EPOCH_DIFF_100NS: u64 = 11_644_473_600 * 10_000_000;
        match time.duration_since(std::time::UNIX_EPOCH) {
            Ok(since_epoch) => {
                let ticks_since_unix_epoch = since_epoch.as_nanos() as u64 / 100;
                ticks_since_unix_epoch.saturating_add(EPOCH_DIFF_100NS)
            }
            Err(_) => 0,
        }
    }

    pub fn filetime_to_system_time(ticks: u64) -> Option<std::time::SystemTime> {
        if ticks == 0 {
            return None;
        }
        // FILETIME epoch (1601-01-01) to Unix epoch (1970-01-01) is
        // 11_644_473_600 seconds.
        const EPOCH_DIFF_100NS: u64 = 11_644_473_600 * 10_000_000;
        let unix_100ns = ticks.checked_sub(EPOCH_DIFF_100NS)?;
        let secs = unix_100ns / 10_000_000;
        let nanos = (unix_100ns % 10_000_000) * 100;
        Some(std::time::UNIX_EPOCH + std::time::Duration::new(secs, nanos as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_attribute_is_load_bearing() {
        let attrs = Attributes::DIRECTORY | Attributes::HIDDEN;
        assert!(attrs.is_directory());
        assert!(!attrs.is_reparse_point());
    }

    #[test]
    fn file_id_from_path_is_deterministic() {
        let a = FileId::from_path("C:\\Users\\test.txt");
        let b = FileId::from_path("c:\\users\\test.txt");
        assert_eq!(a, b, "case folding must make these equal");

        let c = FileId::from_path("C:\\Users\\other.txt");
        assert_ne!(a, c);
    }

    #[test]
    fn filetime_zero_is_unknown() {
        assert_eq!(Entry::filetime_to_system_time(0), None);
    }

    #[test]
    fn filetime_roundtrips_to_a_sane_unix_time() {
        // 2020-01-01T00:00:00Z in FILETIME 100ns ticks.
        let ticks: u64 = 132_223_104_000_000_000;
        let st = Entry::filetime_to_system_time(ticks).expect("non-zero ticks must convert");
        let unix = st
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert_eq!(unix, 1_577_836_800);
    }
}
