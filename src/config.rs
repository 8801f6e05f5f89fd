//! Serializable configuration surface of a [`DataImage`](crate::image::DataImage).

use serde::{Deserialize, Serialize};

use crate::binning::BinMode;
use crate::datasource::{DataFormat, MAX_ACCUMULATION};
use crate::scale::ScaleConfig;
use crate::transform::{Orientation, Slice, TransformConfig};

/// Rejected configuration values.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("width must be at least 1, got {0}")]
    InvalidWidth(usize),
    #[error("accumulation capacity must be within 1..=1024, got {0}")]
    InvalidCapacity(usize),
    #[error("bin factor must be at least 1, got {0}")]
    InvalidBin(usize),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot of every configurable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub data_format: DataFormat,
    pub width: usize,
    pub capacity: usize,
    pub slice: Slice,
    pub row_bin: usize,
    pub col_bin: usize,
    pub bin_mode: BinMode,
    pub orientation: Orientation,
    pub scale: ScaleConfig,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            data_format: DataFormat::default(),
            width: 1,
            capacity: 1,
            slice: Slice::default(),
            row_bin: 1,
            col_bin: 1,
            bin_mode: BinMode::default(),
            orientation: Orientation::default(),
            scale: ScaleConfig::default(),
        }
    }
}

impl ImageConfig {
    /// Check the bounded parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 {
            return Err(ConfigError::InvalidWidth(self.width));
        }
        if !(1..=MAX_ACCUMULATION).contains(&self.capacity) {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        for bin in [self.row_bin, self.col_bin] {
            if bin < 1 {
                return Err(ConfigError::InvalidBin(bin));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The part of the configuration consumed by the pipeline.
    pub fn transform(&self) -> TransformConfig {
        TransformConfig {
            slice: self.slice,
            row_bin: self.row_bin,
            col_bin: self.col_bin,
            bin_mode: self.bin_mode,
            orientation: self.orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleMode;
    use crate::transform::Rotation;

    #[test]
    fn default_is_valid() {
        assert!(ImageConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let config = ImageConfig {
            width: 0,
            ..ImageConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWidth(0))));

        let config = ImageConfig {
            capacity: 2000,
            ..ImageConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCapacity(2000))
        ));

        let config = ImageConfig {
            col_bin: 0,
            ..ImageConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBin(0))));
    }

    #[test]
    fn json_round_trip_keeps_settings() {
        let config = ImageConfig {
            data_format: DataFormat::Array1D,
            capacity: 64,
            row_bin: 2,
            bin_mode: BinMode::Median,
            orientation: Orientation {
                rotation: Rotation::Left90,
                flip_vertical: true,
                flip_horizontal: false,
            },
            scale: ScaleConfig {
                mode: ScaleMode::Dynamic,
                log_scale: true,
                ..ScaleConfig::default()
            },
            ..ImageConfig::default()
        };
        let text = config.to_json().unwrap();
        assert!(text.contains("\"left90\""));
        assert_eq!(ImageConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = ImageConfig::from_json(r#"{ "width": 8, "bin_mode": "mean" }"#).unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.bin_mode, BinMode::Mean);
        assert_eq!(config.capacity, 1);
    }

    #[test]
    fn json_with_invalid_values_is_rejected() {
        assert!(matches!(
            ImageConfig::from_json(r#"{ "width": 0 }"#),
            Err(ConfigError::InvalidWidth(0))
        ));
        assert!(matches!(
            ImageConfig::from_json(r#"{ "bin_mode": "mode" }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
