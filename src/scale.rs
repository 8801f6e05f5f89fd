//! Display range selection and value scaling.

use serde::{Deserialize, Serialize};

use crate::datasource::{RawData, SourceInfo};
use crate::view::Range;

/// Where the display range comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Fixed user bounds.
    #[default]
    Manual,
    /// Display limits reported by the data source.
    OperationalRange,
    /// Recomputed from the raw data on every update.
    Dynamic,
    /// Keep whatever range is currently in use.
    Displayed,
}

impl ScaleMode {
    /// Map an integer property index onto a mode.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Manual),
            1 => Some(Self::OperationalRange),
            2 => Some(Self::Dynamic),
            3 => Some(Self::Displayed),
            _ => None,
        }
    }
}

/// Scale settings of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Range source.
    pub mode: ScaleMode,
    /// Manual lower bound.
    pub minimum: f64,
    /// Manual upper bound.
    pub maximum: f64,
    /// Map values through `log10` before coloring.
    pub log_scale: bool,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            mode: ScaleMode::Manual,
            minimum: 0.0,
            maximum: 255.0,
            log_scale: false,
        }
    }
}

impl ScaleConfig {
    /// The manual bounds as a range.
    pub fn manual_range(&self) -> Range {
        Range::new(self.minimum, self.maximum)
    }

    /// Pick the display range for the current mode.
    ///
    /// `current` is returned untouched in [`ScaleMode::Displayed`].
    pub fn resolve(&self, raw: &RawData, source: &SourceInfo, current: Range) -> Range {
        match self.mode {
            ScaleMode::Manual => self.manual_range(),
            ScaleMode::OperationalRange => match source.display_limits {
                Some((low, high)) if !(low == 0.0 && high == 0.0) => Range::new(low, high),
                _ => self.manual_range(),
            },
            ScaleMode::Dynamic => {
                let (min, max) = raw.min_max(self.minimum, self.maximum);
                Range::new(min, max)
            }
            ScaleMode::Displayed => current,
        }
    }

    /// Map a value into color space.
    pub fn map_value(&self, value: f64) -> Option<f64> {
        map_value(value, self.log_scale)
    }

    /// Map a display range into color space.
    ///
    /// Log ranges with a non-positive upper bound cannot be mapped. A
    /// non-positive lower bound is raised to six decades below the upper one.
    pub fn map_range(&self, range: Range) -> Option<Range> {
        if !self.log_scale {
            return range.is_finite().then_some(range);
        }
        if !(range.max > 0.0) {
            return None;
        }
        let min = if range.min > 0.0 {
            range.min
        } else {
            range.max * LOG_FLOOR_RATIO
        };
        Some(Range::new(min.log10(), range.max.log10()))
    }
}

const LOG_FLOOR_RATIO: f64 = 1e-6;

/// Map a value into linear or `log10` space.
pub fn map_value(value: f64, log_scale: bool) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    if log_scale {
        if value <= 0.0 { None } else { Some(value.log10()) }
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{DataFormat, NO_DATA};

    fn raw_with(values: &[f64]) -> RawData {
        let mut raw = RawData::new(DataFormat::Array2D);
        raw.set_width(values.len().max(1)).unwrap();
        raw.push(values);
        raw
    }

    fn config(mode: ScaleMode) -> ScaleConfig {
        ScaleConfig {
            mode,
            minimum: -1.0,
            maximum: 1.0,
            log_scale: false,
        }
    }

    #[test]
    fn manual_uses_configured_bounds() {
        let range = config(ScaleMode::Manual).resolve(
            &raw_with(&[5.0]),
            &SourceInfo::default(),
            Range::new(0.0, 9.0),
        );
        assert_eq!(range, Range::new(-1.0, 1.0));
    }

    #[test]
    fn operational_range_prefers_source_limits() {
        let source = SourceInfo {
            display_limits: Some((2.0, 8.0)),
            ..SourceInfo::default()
        };
        let range =
            config(ScaleMode::OperationalRange).resolve(&raw_with(&[]), &source, Range::new(0.0, 1.0));
        assert_eq!(range, Range::new(2.0, 8.0));
    }

    #[test]
    fn operational_range_falls_back_on_zero_limits() {
        let source = SourceInfo {
            display_limits: Some((0.0, 0.0)),
            ..SourceInfo::default()
        };
        let scale = config(ScaleMode::OperationalRange);
        let current = Range::new(0.0, 1.0);
        assert_eq!(scale.resolve(&raw_with(&[]), &source, current), Range::new(-1.0, 1.0));
        assert_eq!(
            scale.resolve(&raw_with(&[]), &SourceInfo::default(), current),
            Range::new(-1.0, 1.0)
        );
    }

    #[test]
    fn dynamic_scans_raw_data() {
        let range = config(ScaleMode::Dynamic).resolve(
            &raw_with(&[3.0, NO_DATA, 7.0]),
            &SourceInfo::default(),
            Range::new(0.0, 1.0),
        );
        assert_eq!(range, Range::new(3.0, 7.0));
    }

    #[test]
    fn dynamic_without_data_keeps_manual_bounds() {
        let range = config(ScaleMode::Dynamic).resolve(
            &RawData::default(),
            &SourceInfo::default(),
            Range::new(0.0, 1.0),
        );
        assert_eq!(range, Range::new(-1.0, 1.0));
    }

    #[test]
    fn displayed_keeps_current_range() {
        let current = Range::new(4.0, 6.0);
        let range =
            config(ScaleMode::Displayed).resolve(&raw_with(&[100.0]), &SourceInfo::default(), current);
        assert_eq!(range, current);
    }

    #[test]
    fn log_scale_rejects_non_positive() {
        assert!(map_value(0.0, true).is_none());
        assert!(map_value(-1.0, true).is_none());
        assert!((map_value(100.0, true).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(map_value(-1.0, false), Some(-1.0));
    }

    #[test]
    fn log_range_floors_non_positive_minimum() {
        let scale = ScaleConfig {
            log_scale: true,
            ..ScaleConfig::default()
        };
        let mapped = scale.map_range(Range::new(0.0, 100.0)).unwrap();
        assert!((mapped.min - -4.0).abs() < 1e-9);
        assert!((mapped.max - 2.0).abs() < 1e-9);
        assert!(scale.map_range(Range::new(-5.0, 0.0)).is_none());
    }
}
