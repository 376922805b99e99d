//! Viewer tuning constants
//!
//! Every number the interaction and rendering code depends on lives here so a
//! host can override them from a `viewer.ron` file. Missing fields fall back
//! to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::geometry::Vec3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid viewer config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    // Camera
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub wheel_zoom_factor: f32,
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    // Gestures
    /// Explode progress gained per pixel of upward drag
    pub explode_sensitivity: f32,
    /// Release at or above this progress snaps to the far endpoint
    pub snap_threshold: f32,
    /// Pointer travel (px) before a press stops counting as a click
    pub click_slop: f32,

    // Animation durations (seconds)
    pub assemble_duration: f32,
    pub appear_duration: f32,
    pub explode_snap_duration: f32,
    pub appear_start_scale: f32,

    // Single-part framing
    pub frame_margin: f32,

    // Visual effects
    pub ghost_opacity: f32,
    pub highlight_color: u32,

    // Scene
    pub background_color: u32,
    pub ambient_intensity: f32,
    pub light_intensity: f32,
    pub light_position: Vec3,
    pub grid_size: f32,
    pub grid_divisions: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_deg: 40.0,
            near: 0.1,
            far: 100.0,
            camera_position: Vec3::new(2.0, 1.5, 2.2),
            camera_target: Vec3::new(0.0, 0.6, 0.0),
            damping_factor: 0.08,
            rotate_speed: 0.005,
            pan_speed: 0.0015,
            wheel_zoom_factor: 0.95,
            zoom_step: 0.25,
            min_distance: 0.05,
            max_distance: 50.0,

            explode_sensitivity: 0.005,
            snap_threshold: 0.5,
            click_slop: 4.0,

            assemble_duration: 0.6,
            appear_duration: 0.35,
            explode_snap_duration: 0.15,
            appear_start_scale: 0.85,

            frame_margin: 1.5,

            ghost_opacity: 0.15,
            highlight_color: 0x38bdf8,

            background_color: 0x0f172a,
            ambient_intensity: 0.8,
            light_intensity: 1.0,
            light_position: Vec3::new(5.0, 10.0, 7.5),
            grid_size: 10.0,
            grid_divisions: 10,
        }
    }
}

impl ViewerConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load from disk. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_ron(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn fov_rad(&self) -> f32 {
        self.fov_deg.to_radians()
    }
}

/// Split a 0xRRGGBB value into linear 0..1 components
pub fn rgb_components(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let cfg = ViewerConfig::from_ron("(ghost_opacity: 0.3, fov_deg: 55.0)").unwrap();
        assert!((cfg.ghost_opacity - 0.3).abs() < 1e-6);
        assert!((cfg.fov_deg - 55.0).abs() < 1e-6);
        assert!((cfg.explode_sensitivity - 0.005).abs() < 1e-6);
        assert_eq!(cfg.highlight_color, 0x38bdf8);
    }

    #[test]
    fn test_malformed_ron_is_error() {
        assert!(ViewerConfig::from_ron("(ghost_opacity: )").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ViewerConfig::load(&dir.path().join("viewer.ron")).unwrap();
        assert!((cfg.snap_threshold - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_components() {
        let [r, g, b] = rgb_components(0xff8000);
        assert!((r - 1.0).abs() < 1e-6);
        assert!((g - 128.0 / 255.0).abs() < 1e-6);
        assert!(b.abs() < 1e-6);
    }
}
