// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Name of the optional override file looked up in a wafer folder
pub const CONFIG_FILE_NAME: &str = "viewer.json";

/// Display constants for the defect map.
///
/// Every field has a default, so an override file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Grid cell edge length in scene units (mm)
    pub cell_size: f64,
    /// Divisor converting defect sizes in µm to scene units
    pub size_divisor: f64,
    /// Marker size used when a defect has no usable width or height
    pub min_marker_size: f64,
    pub min_zoom: f32,
    /// Minimum zoom difference before a gesture-driven value is applied
    pub zoom_epsilon: f32,
    pub reset_duration_ms: u64,
    /// Keyboard pan distance in screen pixels
    pub key_pan_step: f32,
    /// Multiplier applied per wheel notch
    pub wheel_zoom_factor: f32,
    pub show_cell_labels: bool,
    pub label_stride: i32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            cell_size: 5.0,
            size_divisor: 300.0,
            min_marker_size: 0.5,
            min_zoom: 4.0,
            zoom_epsilon: 0.01,
            reset_duration_ms: 500,
            key_pan_step: 20.0,
            wheel_zoom_factor: 1.1,
            show_cell_labels: false,
            label_stride: 2,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: ViewerConfig = serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse viewer config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load overrides from `<dir>/viewer.json`, or defaults when absent.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        log::info!("[LOAD] Loading viewer config: {}", path.display());
        let content = fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let positive = [
            ("cell_size", self.cell_size),
            ("size_divisor", self.size_divisor),
            ("min_marker_size", self.min_marker_size),
            ("min_zoom", self.min_zoom as f64),
            ("wheel_zoom_factor", self.wheel_zoom_factor as f64),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("Config value '{name}' must be positive, got {value}").into());
            }
        }
        if self.zoom_epsilon < 0.0 {
            return Err("Config value 'zoom_epsilon' must not be negative".into());
        }
        if self.label_stride < 1 {
            return Err("Config value 'label_stride' must be at least 1".into());
        }
        Ok(())
    }

    pub fn reset_duration(&self) -> Duration {
        Duration::from_millis(self.reset_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
        assert_eq!(
            ViewerConfig::default().reset_duration(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_partial_override() {
        let config = ViewerConfig::from_json_str(r#"{ "cell_size": 10.0, "show_cell_labels": true }"#)
            .unwrap();
        assert_eq!(config.cell_size, 10.0);
        assert!(config.show_cell_labels);
        assert_eq!(config.size_divisor, 300.0);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        assert!(ViewerConfig::from_json_str(r#"{ "cell_size": 0.0 }"#).is_err());
        assert!(ViewerConfig::from_json_str(r#"{ "label_stride": 0 }"#).is_err());
        assert!(ViewerConfig::from_json_str("not json").is_err());
    }
}
