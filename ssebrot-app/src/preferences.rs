use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use ssebrot_core::{ComplexRect, EngineConfig, EngineMode, History};

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

/// Settings persisted in `preferences.json`.
///
/// Missing fields fall back to their defaults, so older files keep loading
/// as new settings are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Escape threshold on `|z|²`.
    #[serde(default = "default_r2_max")]
    pub r2_max: f32,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Fraction of the real extent moved per horizontal pan.
    #[serde(default = "default_step")]
    pub pan_dx: f32,
    /// Fraction of the imaginary extent moved per vertical pan.
    #[serde(default = "default_step")]
    pub pan_dy: f32,
    /// Fraction of each extent removed per zoom-in step.
    #[serde(default = "default_step")]
    pub zoom_fraction: f32,
    #[serde(default)]
    pub mode: EngineMode,
    #[serde(default = "default_true")]
    pub restore_last_view: bool,
    #[serde(default)]
    pub last_view: Option<ComplexRect>,
}

fn default_image_height() -> u32 {
    600
}
fn default_image_width() -> u32 {
    // 3:2, matching the aspect of the default view.
    default_image_height() * 3 / 2
}
fn default_iterations() -> u32 {
    EngineConfig::DEFAULT_ITERATIONS
}
fn default_r2_max() -> f32 {
    EngineConfig::DEFAULT_R2_MAX
}
fn default_history_capacity() -> usize {
    History::DEFAULT_CAPACITY
}
fn default_step() -> f32 {
    0.1
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            image_width: default_image_width(),
            image_height: default_image_height(),
            iterations: default_iterations(),
            r2_max: default_r2_max(),
            history_capacity: default_history_capacity(),
            pan_dx: default_step(),
            pan_dy: default_step(),
            zoom_fraction: default_step(),
            mode: EngineMode::default(),
            restore_last_view: true,
            last_view: None,
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&crate::app_dir::preferences_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// The engine parameters these preferences describe.
    pub fn engine_config(&self) -> ssebrot_core::Result<EngineConfig> {
        EngineConfig::new(self.iterations, self.r2_max)
    }

    /// The view to open with: the saved one if restoring is enabled.
    pub fn initial_view(&self) -> ComplexRect {
        match (self.restore_last_view, self.last_view) {
            (true, Some(rect)) => rect,
            _ => ComplexRect::DEFAULT,
        }
    }
}
