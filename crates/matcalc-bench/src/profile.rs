//! Calibration profile (serializable).

use serde::{Deserialize, Serialize};

use matcalc_core::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_STRASSEN_THRESHOLD};
use matcalc_core::options::Options;

/// Current profile format version.
pub const PROFILE_VERSION: u32 = 1;

/// Largest Strassen threshold a profile may carry.
pub const MAX_PROFILE_THRESHOLD: usize = 4096;

/// Calibration profile containing tuned thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Profile format version for compatibility checking.
    pub version: u32,
    /// Fastest Strassen base-case threshold found.
    pub strassen_threshold: usize,
    /// Tile size used by the blocked strategy.
    pub block_size: usize,
    /// CPU model used for calibration.
    pub cpu_model: String,
    /// Number of CPU cores.
    pub num_cores: usize,
    /// Calibration timestamp.
    pub timestamp: String,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION,
            strassen_threshold: DEFAULT_STRASSEN_THRESHOLD,
            block_size: DEFAULT_BLOCK_SIZE,
            cpu_model: String::new(),
            num_cores: num_cpus(),
            timestamp: String::new(),
        }
    }
}

impl CalibrationProfile {
    /// Check if this profile is compatible with the current version.
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version == PROFILE_VERSION
    }

    /// Validate that thresholds are within reasonable bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (1..=MAX_PROFILE_THRESHOLD).contains(&self.strassen_threshold) && self.block_size > 0
    }

    /// Copy the tuned values into `opts`.
    pub fn apply(&self, opts: &mut Options) {
        opts.strassen_threshold = self.strassen_threshold;
        opts.block_size = self.block_size;
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(4)
}

/// Get the current CPU model string.
#[must_use]
pub fn cpu_model() -> String {
    use sysinfo::System;
    let sys = System::new_all();
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().to_string())
        .unwrap_or_default()
}

/// Number of logical cores available to this process.
#[must_use]
pub fn num_cores() -> usize {
    num_cpus()
}

/// Get the current timestamp as seconds since the Unix epoch.
#[must_use]
pub fn current_timestamp() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("unix:{}", dur.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serialization() {
        let profile = CalibrationProfile {
            strassen_threshold: 128,
            ..CalibrationProfile::default()
        };
        let json = serde_json::to_string_pretty(&profile).unwrap();
        let deserialized: CalibrationProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, profile);
    }

    #[test]
    fn profile_compatibility() {
        assert!(CalibrationProfile::default().is_compatible());

        let old = CalibrationProfile {
            version: 0,
            ..CalibrationProfile::default()
        };
        assert!(!old.is_compatible());
    }

    #[test]
    fn profile_validation() {
        assert!(CalibrationProfile::default().is_valid());

        let zero = CalibrationProfile {
            strassen_threshold: 0,
            ..CalibrationProfile::default()
        };
        assert!(!zero.is_valid());

        let huge = CalibrationProfile {
            strassen_threshold: MAX_PROFILE_THRESHOLD + 1,
            ..CalibrationProfile::default()
        };
        assert!(!huge.is_valid());
    }

    #[test]
    fn apply_overrides_options() {
        let profile = CalibrationProfile {
            strassen_threshold: 32,
            block_size: 48,
            ..CalibrationProfile::default()
        };
        let mut opts = Options::default();
        profile.apply(&mut opts);
        assert_eq!(opts.strassen_threshold, 32);
        assert_eq!(opts.block_size, 48);
    }

    #[test]
    fn current_timestamp_nonempty() {
        assert!(current_timestamp().starts_with("unix:"));
    }
}
