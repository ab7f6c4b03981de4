//! Profile persistence (load/save) in a directory, by default the working directory.

use std::path::{Path, PathBuf};

use crate::profile::CalibrationProfile;

/// File name of the persisted profile.
pub const PROFILE_FILENAME: &str = ".matcalc_calibration.json";

/// Profile path inside `dir`.
#[must_use]
pub fn profile_path(dir: &Path) -> PathBuf {
    dir.join(PROFILE_FILENAME)
}

/// Working directory profile path.
#[must_use]
pub fn cwd_profile_path() -> PathBuf {
    let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    profile_path(&dir)
}

/// Load a profile, returning `None` when missing or unreadable.
#[must_use]
pub fn load_from_path(path: &Path) -> Option<CalibrationProfile> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Load a profile and drop it if its version or thresholds are unusable.
#[must_use]
pub fn load_validated(path: &Path) -> Option<CalibrationProfile> {
    let p = load_from_path(path)?;

    if !p.is_compatible() {
        tracing::info!(version = p.version, "profile version mismatch, ignoring cached profile");
        return None;
    }
    if !p.is_valid() {
        tracing::info!(
            threshold = p.strassen_threshold,
            "profile has invalid thresholds, ignoring cached profile"
        );
        return None;
    }

    Some(p)
}

/// Load and validate the working directory profile.
#[must_use]
pub fn load_validated_profile() -> Option<CalibrationProfile> {
    load_validated(&cwd_profile_path())
}

/// Save profile to a specific path.
pub fn save_to_path(p: &CalibrationProfile, path: &Path) -> std::io::Result<()> {
    let content = serde_json::to_string_pretty(p).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}

/// Save profile to the working directory, returning where it was written.
pub fn save_profile(p: &CalibrationProfile) -> std::io::Result<PathBuf> {
    let path = cwd_profile_path();
    save_to_path(p, &path)?;
    Ok(path)
}
