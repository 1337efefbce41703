/// Volume capacity figures, sampled once before the scan touches any
/// filesystem metadata — scanning itself can perturb access times, so
/// capturing this first keeps it honest.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveStats {
    pub letter_or_label: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

impl DriveStats {
    pub fn percent_used(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.used_bytes as f64 / self.total_bytes as f64) * 100.0
        }
    }
}
