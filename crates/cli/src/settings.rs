use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use facecam_core::camera::domain::facing_mode::FacingMode;
use facecam_core::shared::constants::{
    DEFAULT_DISPLAY_HEIGHT, DEFAULT_DISPLAY_WIDTH, DEFAULT_JPEG_QUALITY, DEFAULT_SERVER_URL,
};
use facecam_core::shared::geometry::DisplaySize;

pub const DEFAULT_FRONT_SOURCE: &str = "/dev/video0";
pub const DEFAULT_BACK_SOURCE: &str = "/dev/video1";

/// Persisted client preferences. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub facing: FacingMode,
    pub front_source: String,
    pub back_source: String,
    /// Forces an ffmpeg input format (e.g. `v4l2`, `avfoundation`).
    pub input_format: Option<String>,
    pub display_width: f64,
    pub display_height: f64,
    pub jpeg_quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            facing: FacingMode::default(),
            front_source: DEFAULT_FRONT_SOURCE.to_string(),
            back_source: DEFAULT_BACK_SOURCE.to_string(),
            input_format: None,
            display_width: DEFAULT_DISPLAY_WIDTH,
            display_height: DEFAULT_DISPLAY_HEIGHT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceCam").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Reads `path`, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("No configuration directory on this platform")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn display_size(&self) -> DisplaySize {
        DisplaySize::new(self.display_width, self.display_height)
    }
}
