/// Drive enumeration and capacity sampling.
///
/// `sample_drive_stats` is what the coordinator calls before a scan begins,
/// to capture capacity before the scan itself perturbs atimes.
/// `enumerate_drives` lists every local drive; kept for a host that wants a
/// drive picker, though this crate does not provide one itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveType {
    Fixed,
    Removable,
    Network,
    CdRom,
    Unknown,
}

impl DriveType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Removable => "Removable",
            Self::Network => "Network",
            Self::CdRom => "CD-ROM",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriveInfo {
    pub path: std::path::PathBuf,
    pub letter: String,
    pub drive_type: DriveType,
    pub label: String,
    pub filesystem: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub used_bytes: u64,
    pub usage_percent: f32,
    pub total_display: String,
    pub free_display: String,
    pub used_display: String,
}

#[cfg(windows)]
mod imp {
    use super::{DriveInfo, DriveType};
    use crate::model::{size, DriveStats};
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use std::path::{Path, PathBuf};
    use windows::Win32::Storage::FileSystem::{
        GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDriveStringsW, GetVolumeInformationW,
    };

    const DRIVE_REMOVABLE_VAL: u32 = 2;
    const DRIVE_FIXED_VAL: u32 = 3;
    const DRIVE_REMOTE_VAL: u32 = 4;
    const DRIVE_CDROM_VAL: u32 = 5;

    pub fn enumerate_drives() -> Vec<DriveInfo> {
        let mut drives = Vec::new();

        let mut buffer = [0u16; 256];
        let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) };
        if len == 0 {
            tracing::warn!("GetLogicalDriveStringsW returned 0");
            return drives;
        }

        let full = OsString::from_wide(&buffer[..len as usize]);
        let full_str = full.to_string_lossy();

        for root in full_str.split('\0').filter(|s| !s.is_empty()) {
            let root_wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
            let root_pcwstr = windows::core::PCWSTR(root_wide.as_ptr());

            let raw_type = unsafe { GetDriveTypeW(root_pcwstr) };
            let drive_type = match raw_type {
                DRIVE_FIXED_VAL => DriveType::Fixed,
                DRIVE_REMOVABLE_VAL => DriveType::Removable,
                DRIVE_REMOTE_VAL => DriveType::Network,
                DRIVE_CDROM_VAL => DriveType::CdRom,
                _ => DriveType::Unknown,
            };

            if drive_type == DriveType::Network {
                continue;
            }

            let mut label_buf = [0u16; 256];
            let mut fs_buf = [0u16; 256];
            let has_volume_info = unsafe {
                GetVolumeInformationW(
                    root_pcwstr,
                    Some(&mut label_buf),
                    None,
                    None,
                    None,
                    Some(&mut fs_buf),
                )
                .is_ok()
            };

            let label = if has_volume_info {
                String::from_utf16_lossy(
                    &label_buf[..label_buf.iter().position(|&c| c == 0).unwrap_or(0)],
                )
            } else {
                String::new()
            };

            let filesystem = if has_volume_info {
                String::from_utf16_lossy(
                    &fs_buf[..fs_buf.iter().position(|&c| c == 0).unwrap_or(0)],
                )
            } else {
                String::new()
            };

            let (total_bytes, free_bytes) = query_space(root_pcwstr).unwrap_or((0, 0));
            let used_bytes = total_bytes.saturating_sub(free_bytes);
            let usage_percent = if total_bytes > 0 {
                (used_bytes as f64 / total_bytes as f64 * 100.0) as f32
            } else {
                0.0
            };

            let letter = root.trim_end_matches('\\').to_string();

            drives.push(DriveInfo {
                path: PathBuf::from(root),
                letter,
                drive_type,
                label,
                filesystem,
                total_bytes,
                free_bytes,
                used_bytes,
                usage_percent,
                total_display: size::format_size(total_bytes),
                free_display: size::format_size(free_bytes),
                used_display: size::format_size(used_bytes),
            });
        }

        drives
    }

    fn query_space(root_pcwstr: windows::core::PCWSTR) -> Option<(u64, u64)> {
        let mut free_caller: u64 = 0;
        let mut total: u64 = 0;
        let mut free_total: u64 = 0;
        let ok = unsafe {
            GetDiskFreeSpaceExW(
                root_pcwstr,
                Some(&mut free_caller as *mut u64),
                Some(&mut total as *mut u64),
                Some(&mut free_total as *mut u64),
            )
            .is_ok()
        };
        ok.then_some((total, free_caller))
    }

    /// Sample capacity for the volume containing `path`, before a scan
    /// begins — scanning itself perturbs access times, so this is captured
    /// first.
    pub fn sample_drive_stats(path: &Path) -> DriveStats {
        let path_str = path.to_string_lossy();
        let root = if path_str.len() >= 2 && path_str.as_bytes()[1] == b':' {
            format!("{}\\", &path_str[..2])
        } else {
            path_str.to_string()
        };
        let root_wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
        let root_pcwstr = windows::core::PCWSTR(root_wide.as_ptr());

        let (total_bytes, free_bytes) = query_space(root_pcwstr).unwrap_or((0, 0));
        let used_bytes = total_bytes.saturating_sub(free_bytes);

        DriveStats {
            letter_or_label: root.trim_end_matches('\\').to_string(),
            total_bytes,
            used_bytes,
            free_bytes,
        }
    }
}

#[cfg(not(windows))]
mod imp {
    use super::DriveInfo;
    use crate::model::DriveStats;
    use std::path::Path;

    pub fn enumerate_drives() -> Vec<DriveInfo> {
        Vec::new()
    }

    /// No portable, dependency-free capacity query is wired up for
    /// non-Windows hosts; this returns a zeroed snapshot rather than
    /// failing the whole scan over a non-essential figure.
    pub fn sample_drive_stats(path: &Path) -> DriveStats {
        tracing::debug!(
            "drive capacity sampling not implemented on this platform for {}",
            path.display()
        );
        DriveStats {
            letter_or_label: path.to_string_lossy().into_owned(),
            total_bytes: 0,
            used_bytes: 0,
            free_bytes: 0,
        }
    }
}

pub use imp::{enumerate_drives, sample_drive_stats};
