//! Raw data storage and access.
//!
//! The raw buffer is either a FIFO of independently sized rows (1D
//! accumulation) or a single flattened 2D array that is reinterpreted with an
//! effective width. All lookups are bounds checked and fall back to a
//! caller-supplied default instead of panicking.

mod ring;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

use ring::RowRing;

/// Marker for "no value", in both raw samples and binned results.
///
/// `-2^1000` is exactly representable and never a plausible measurement.
/// Compare with [`is_no_data`], never with a tolerance.
pub const NO_DATA: f64 = -1.0715086071862673e301;

/// Largest accumulation capacity accepted in 1D mode.
pub const MAX_ACCUMULATION: usize = 1024;

/// Bit-exact test for [`NO_DATA`].
#[inline]
pub fn is_no_data(value: f64) -> bool {
    value.to_bits() == NO_DATA.to_bits()
}

/// How delivered arrays are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    /// Each delivery is one row; the most recent rows are accumulated.
    #[serde(rename = "array_1d")]
    Array1D,
    /// Each delivery is a complete flattened 2D array.
    #[default]
    #[serde(rename = "array_2d")]
    Array2D,
}

impl DataFormat {
    /// Map an integer property index onto a format.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Array1D),
            1 => Some(Self::Array2D),
            _ => None,
        }
    }
}

/// Resolve the width used to reinterpret a flat 2D buffer.
///
/// A width supplied by the data source always wins over the static fallback.
pub fn effective_width(source: Option<usize>, fallback: usize) -> usize {
    source.unwrap_or(fallback)
}

/// Metadata that accompanies data deliveries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceInfo {
    /// Engineering units.
    pub units: String,
    /// Number of decimal places to display.
    pub precision: u16,
    /// Display limits reported by the source as `(low, high)`.
    pub display_limits: Option<(f64, f64)>,
}

/// Raw sample buffer with its interpretation parameters.
#[derive(Debug, Clone)]
pub struct RawData {
    format: DataFormat,
    rows: RowRing,
    width: usize,
    source_width: Option<usize>,
}

impl RawData {
    /// Create an empty buffer.
    pub fn new(format: DataFormat) -> Self {
        Self {
            format,
            rows: RowRing::new(1),
            width: 1,
            source_width: None,
        }
    }

    /// Active data format.
    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// Change the data format. Stored rows are discarded when it changes.
    pub fn set_format(&mut self, format: DataFormat) {
        if self.format != format {
            log::debug!("data format changed to {format:?}, clearing raw buffer");
            self.rows.clear();
            self.format = format;
        }
    }

    /// Statically configured width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Set the static width. Values below 1 are rejected.
    pub fn set_width(&mut self, width: usize) -> Result<(), ConfigError> {
        if width < 1 {
            return Err(ConfigError::InvalidWidth(width));
        }
        self.width = width;
        Ok(())
    }

    /// Width supplied by the data source, if any.
    pub fn source_width(&self) -> Option<usize> {
        self.source_width
    }

    /// Set or clear the width supplied by the data source.
    pub fn set_source_width(&mut self, width: Option<usize>) {
        self.source_width = width;
    }

    /// Width used to reinterpret 2D data. See [`effective_width`].
    pub fn effective_width(&self) -> usize {
        effective_width(self.source_width, self.width)
    }

    /// Accumulation capacity used in 1D mode.
    pub fn capacity(&self) -> usize {
        self.rows.capacity()
    }

    /// Set the accumulation capacity (1..=[`MAX_ACCUMULATION`]).
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), ConfigError> {
        if !(1..=MAX_ACCUMULATION).contains(&capacity) {
            return Err(ConfigError::InvalidCapacity(capacity));
        }
        self.rows.set_capacity(capacity);
        Ok(())
    }

    /// Accept a delivery: append in 1D mode, replace in 2D mode.
    pub fn push(&mut self, values: &[f64]) {
        match self.format {
            DataFormat::Array1D => self.rows.push(values.to_vec()),
            DataFormat::Array2D => self.rows.replace(values.to_vec()),
        }
    }

    /// Drop all stored rows.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of rows currently stored.
    pub fn stored_rows(&self) -> usize {
        self.rows.len()
    }

    /// Check whether any stored row holds at least one sample.
    pub fn has_data(&self) -> bool {
        self.rows.iter().any(|row| !row.is_empty())
    }

    /// Logical `(rows, cols)` of the raw buffer.
    ///
    /// In 1D mode the row count is the capacity, regardless of how many rows
    /// are populated, and the column count is taken from the oldest row.
    pub fn shape(&self) -> (usize, usize) {
        match self.format {
            DataFormat::Array1D => {
                let cols = self.rows.first().map_or(0, <[f64]>::len);
                (self.rows.capacity(), cols)
            }
            DataFormat::Array2D => {
                let width = self.effective_width().max(1);
                let len = self.rows.first().map_or(0, <[f64]>::len);
                (len.div_ceil(width), width)
            }
        }
    }

    /// Raw value at `(row, col)`, or `default` when out of bounds.
    pub fn value(&self, row: usize, col: usize, default: f64) -> f64 {
        match self.format {
            DataFormat::Array1D => self
                .rows
                .get(row)
                .and_then(|values| values.get(col))
                .copied()
                .unwrap_or(default),
            DataFormat::Array2D => {
                let width = self.effective_width();
                if col >= width {
                    return default;
                }
                let Some(index) = row.checked_mul(width).and_then(|base| base.checked_add(col))
                else {
                    return default;
                };
                self.rows
                    .first()
                    .and_then(|values| values.get(index))
                    .copied()
                    .unwrap_or(default)
            }
        }
    }

    /// Minimum and maximum over all stored samples, ignoring [`NO_DATA`].
    ///
    /// Returns the defaults unchanged when there is nothing to scan.
    pub fn min_max(&self, default_min: f64, default_max: f64) -> (f64, f64) {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for value in self.rows.iter().flatten().copied() {
            if is_no_data(value) {
                continue;
            }
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
        }
        if min > max {
            (default_min, default_max)
        } else {
            (min, max)
        }
    }
}

impl Default for RawData {
    fn default() -> Self {
        Self::new(DataFormat::default())
    }
}
