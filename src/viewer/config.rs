use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cycle::CycleConfig;
use crate::error::ConfigError;
use crate::flow::FlowConfig;
use crate::math::Point3;
use crate::scene::{Camera, Color, Lighting};

/// Viewer settings. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Where the loader fetches the heart model from.
    pub model_source: String,
    pub camera_distance: f64,
    pub camera_fov_degrees: f64,
    pub camera_near: f64,
    pub camera_far: f64,
    pub ambient_light_intensity: f64,
    pub directional_light_intensity: f64,
    pub background: Color,
    /// Auto-rotation step in radians per frame.
    pub auto_rotate_speed: f64,
    pub cycle: CycleConfig,
    pub flow: FlowConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_source: "/models/heart.glb".to_owned(),
            camera_distance: 5.0,
            camera_fov_degrees: 45.0,
            camera_near: 0.1,
            camera_far: 1000.0,
            ambient_light_intensity: 0.5,
            directional_light_intensity: 0.8,
            background: Color(0x0b_0b_0b),
            auto_rotate_speed: 0.005,
            cycle: CycleConfig::default(),
            flow: FlowConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a JSON config and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a setting is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds an
    /// invalid setting.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Loads a JSON config file, falling back to defaults when the file is
    /// missing, unreadable or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!(?path, "loaded viewer config");
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(?path, "viewer config not found, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(?path, error = %e, "unusable viewer config, using defaults");
                Self::default()
            }
        }
    }

    /// Checks camera, cycle and flow settings.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.camera_distance.is_finite() && self.camera_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "camera distance must be positive, got {}",
                self.camera_distance
            )));
        }
        if !(0.0 < self.camera_near && self.camera_near < self.camera_far) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got {} and {}",
                self.camera_near, self.camera_far
            )));
        }
        if !self.auto_rotate_speed.is_finite() {
            return Err(ConfigError::Invalid("auto-rotate speed must be finite".to_owned()));
        }
        self.cycle.validate()?;
        self.flow.validate()
    }

    /// Camera implied by the settings.
    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera::looking_at_origin(
            self.camera_distance,
            self.camera_fov_degrees,
            self.camera_near,
            self.camera_far,
        )
    }

    /// Lights implied by the settings.
    #[must_use]
    pub fn lighting(&self) -> Lighting {
        Lighting {
            ambient_intensity: self.ambient_light_intensity,
            directional_intensity: self.directional_light_intensity,
            directional_position: Point3::new(5.0, 5.0, 5.0),
        }
    }
}
