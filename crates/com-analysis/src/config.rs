//! Visualization settings for result packaging.

use renderer::{Colormap, CubehelixWheel};
use serde::{Deserialize, Serialize};

/// How result maps are turned into images.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Colormap for scalar maps.
    pub colormap: Colormap,

    /// Log-scale scalar maps before coloring.
    pub logarithmic: bool,

    /// Colour wheel for the vector field.
    pub wheel: CubehelixWheel,
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("COM_COLORMAP") {
            config.colormap = Colormap::from_str(&val);
        }

        if let Ok(val) = std::env::var("COM_LOG_SCALE") {
            config.logarithmic = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("COM_WHEEL_START") {
            if let Ok(start) = val.parse() {
                config.wheel.start = start;
            }
        }

        if let Ok(val) = std::env::var("COM_WHEEL_ROTATION") {
            if let Ok(rotation) = val.parse() {
                config.wheel.rotation = rotation;
            }
        }

        if let Ok(val) = std::env::var("COM_WHEEL_HUE") {
            if let Ok(hue) = val.parse() {
                config.wheel.hue = hue;
            }
        }

        if let Ok(val) = std::env::var("COM_WHEEL_LIGHT") {
            if let Ok(light) = val.parse() {
                config.wheel.light = light;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let wheel = &self.wheel;
        if !wheel.start.is_finite() || !wheel.rotation.is_finite() || !wheel.hue.is_finite() {
            return Err("wheel start, rotation and hue must be finite".to_string());
        }

        if wheel.hue < 0.0 {
            return Err("wheel hue must be >= 0".to_string());
        }

        if !(0.0..=1.0).contains(&wheel.light) {
            return Err("wheel light must be within 0-1".to_string());
        }

        Ok(())
    }
}
