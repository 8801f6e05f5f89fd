//! Slicing, binning and orientation between raw and display coordinates.
//!
//! Going forward, data is sliced, binned, rotated and finally flipped. Mapping
//! a display cell back to its source therefore undoes the flip first, then the
//! rotation, then the binning.

use serde::{Deserialize, Serialize};

use crate::binning::{BinMode, Region};

/// Quarter-turn rotation applied after binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Keep the binned orientation.
    #[default]
    None,
    /// Rotate 90 degrees counter-clockwise.
    Left90,
    /// Rotate 90 degrees clockwise.
    Right90,
    /// Rotate half a turn.
    Rotate180,
}

impl Rotation {
    /// Map an integer property index onto a rotation.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::None),
            1 => Some(Self::Left90),
            2 => Some(Self::Right90),
            3 => Some(Self::Rotate180),
            _ => None,
        }
    }

    /// Whether rows and columns trade places.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Left90 | Self::Right90)
    }
}

/// Rotation plus the two mirror flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Rotation applied after binning.
    pub rotation: Rotation,
    /// Mirror rows after rotation.
    pub flip_vertical: bool,
    /// Mirror columns after rotation.
    pub flip_horizontal: bool,
}

/// Slice window over raw rows and columns.
///
/// Negative bounds count back from the end, so `-1` is the last index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// First raw row.
    pub row_first: i32,
    /// Last raw row (inclusive).
    pub row_last: i32,
    /// First raw column.
    pub col_first: i32,
    /// Last raw column (inclusive).
    pub col_last: i32,
}

impl Default for Slice {
    fn default() -> Self {
        Self {
            row_first: 0,
            row_last: -1,
            col_first: 0,
            col_last: -1,
        }
    }
}

/// Everything the pipeline needs besides the raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformConfig {
    /// Slice window.
    pub slice: Slice,
    /// Raw rows aggregated per binned row.
    pub row_bin: usize,
    /// Raw columns aggregated per binned column.
    pub col_bin: usize,
    /// Aggregation policy.
    pub bin_mode: BinMode,
    /// Rotation and flips.
    pub orientation: Orientation,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            slice: Slice::default(),
            row_bin: 1,
            col_bin: 1,
            bin_mode: BinMode::default(),
            orientation: Orientation::default(),
        }
    }
}

impl TransformConfig {
    /// Resolve the configuration against a raw `(rows, cols)` shape.
    pub fn layout(&self, raw_shape: (usize, usize)) -> GridLayout {
        let (raw_rows, raw_cols) = raw_shape;
        let rows = AxisSlice::resolve(self.slice.row_first, self.slice.row_last, raw_rows);
        let cols = AxisSlice::resolve(self.slice.col_first, self.slice.col_last, raw_cols);
        let row_bin = self.row_bin.max(1);
        let col_bin = self.col_bin.max(1);
        // A slice that is empty on either axis selects no cells at all.
        let (binned_rows, binned_cols) = if rows.extent == 0 || cols.extent == 0 {
            (0, 0)
        } else {
            (rows.extent.div_ceil(row_bin), cols.extent.div_ceil(col_bin))
        };
        let (display_rows, display_cols) = if self.orientation.rotation.swaps_axes() {
            (binned_cols, binned_rows)
        } else {
            (binned_rows, binned_cols)
        };
        GridLayout {
            rows,
            cols,
            row_bin,
            col_bin,
            binned_rows,
            binned_cols,
            display_rows,
            display_cols,
            orientation: self.orientation,
        }
    }
}

/// Slice along one axis after resolving negative and out-of-range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSlice {
    /// First raw index.
    pub first: usize,
    /// Last raw index (inclusive); meaningful only when `extent > 0`.
    pub last: usize,
    /// Number of raw indices selected.
    pub extent: usize,
}

impl AxisSlice {
    /// Resolve a pair of signed bounds against an axis of `size` entries.
    ///
    /// An empty axis always yields an empty slice.
    pub fn resolve(first: i32, last: i32, size: usize) -> Self {
        let first = resolve_bound(first, size);
        let last = resolve_bound(last, size);
        let extent = if size == 0 {
            0
        } else {
            last.saturating_add(1).saturating_sub(first)
        };
        Self {
            first,
            last,
            extent,
        }
    }
}

/// Resolve one slice bound: negative counts from the end, result clamped to
/// `0..=size`.
pub fn resolve_bound(value: i32, size: usize) -> usize {
    let size = i64::try_from(size).unwrap_or(i64::MAX);
    let value = i64::from(value);
    let resolved = if value < 0 { size + value } else { value };
    // Clamped into 0..=size, which came from a usize.
    resolved.clamp(0, size) as usize
}

/// Resolved geometry of one pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Row slice.
    pub rows: AxisSlice,
    /// Column slice.
    pub cols: AxisSlice,
    /// Effective row bin (at least 1).
    pub row_bin: usize,
    /// Effective column bin (at least 1).
    pub col_bin: usize,
    /// Rows after binning.
    pub binned_rows: usize,
    /// Columns after binning.
    pub binned_cols: usize,
    /// Rows after rotation.
    pub display_rows: usize,
    /// Columns after rotation.
    pub display_cols: usize,
    orientation: Orientation,
}

impl GridLayout {
    /// Map a display cell back onto the raw region it aggregates.
    ///
    /// Returns `None` outside the displayed extent.
    pub fn source_region(&self, row: usize, col: usize) -> Option<Region> {
        let (rows, cols) = (self.display_rows, self.display_cols);
        if row >= rows || col >= cols {
            return None;
        }

        let row = if self.orientation.flip_vertical {
            rows - 1 - row
        } else {
            row
        };
        let col = if self.orientation.flip_horizontal {
            cols - 1 - col
        } else {
            col
        };

        let (bin_row, bin_col) = match self.orientation.rotation {
            Rotation::None => (row, col),
            Rotation::Rotate180 => (rows - 1 - row, cols - 1 - col),
            Rotation::Right90 => (cols - 1 - col, row),
            Rotation::Left90 => (col, rows - 1 - row),
        };

        let row_first = self.rows.first + bin_row * self.row_bin;
        let col_first = self.cols.first + bin_col * self.col_bin;
        let row_last = row_first
            .saturating_add(self.row_bin - 1)
            .min(self.rows.last);
        let col_last = col_first
            .saturating_add(self.col_bin - 1)
            .min(self.cols.last);
        Some(Region::new(row_first, row_last, col_first, col_last))
    }
}
