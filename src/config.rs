//! Viewer configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "max_points": 2000, "params": { "b": 30.0 } }
//! ```

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::error::ConfigError;
use crate::guard::DEFAULT_SEED;
use crate::params::AttractorParameters;

/// Complete viewer configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// History length kept per trajectory.
    pub max_points: usize,
    pub target_fps: u32,
    pub params: AttractorParameters,
    pub camera: CameraConfig,
    /// Where the first trajectory (and the one after a clear) is spawned.
    pub initial_seed: Vec3,
    /// Amount `a` and `b` change per key press.
    pub param_step: f32,
    /// Fixed seed for spawn jitter. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "3D Chaos Visualization".into(),
            width: 1200,
            height: 800,
            max_points: 5000,
            target_fps: 60,
            params: AttractorParameters::default(),
            camera: CameraConfig::default(),
            initial_seed: DEFAULT_SEED,
            param_step: 1.0,
            rng_seed: None,
        }
    }
}

impl ViewerConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.params.is_well_formed() {
            return Err(ConfigError::Invalid(format!(
                "attractor parameters must be finite with positive dt, max_radius and color_scale: {:?}",
                self.params
            )));
        }
        if self.max_points == 0 {
            return Err(ConfigError::Invalid("max_points must be at least 1".into()));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".into()));
        }
        let cam = &self.camera;
        for (name, value) in [
            ("default_distance", cam.default_distance),
            ("zoom_step", cam.zoom_step),
            ("rotate_sensitivity", cam.rotate_sensitivity),
            ("pan_sensitivity", cam.pan_sensitivity),
            ("far", cam.far),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("camera.{name} must be finite, got {value}")));
            }
        }
        if !(cam.fov_y_degrees > 0.0 && cam.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_y_degrees must be in (0, 180), got {}",
                cam.fov_y_degrees
            )));
        }
        if !(cam.min_zoom > 0.0 && cam.min_zoom <= cam.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom range must satisfy 0 < min_zoom <= max_zoom, got {}..{}",
                cam.min_zoom, cam.max_zoom
            )));
        }
        if !(cam.follow_smoothing > 0.0 && cam.follow_smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "follow_smoothing must be in (0, 1], got {}",
                cam.follow_smoothing
            )));
        }
        if !(cam.near > 0.0 && cam.near < cam.far) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got {}..{}",
                cam.near, cam.far
            )));
        }
        if !self.param_step.is_finite() {
            return Err(ConfigError::Invalid("param_step must be finite".into()));
        }
        Ok(())
    }
}
