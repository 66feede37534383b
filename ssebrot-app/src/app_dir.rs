//! Directory where the executable lives. Preferences are stored next to the
//! binary so a copied build carries its settings with it.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Location of `preferences.json`.
pub fn preferences_path() -> PathBuf {
    exe_directory().join("preferences.json")
}
