//! Recompute driver: raw data in, display grid out.

use crate::binning::bin_region;
use crate::datasource::{NO_DATA, RawData, is_no_data};
use crate::transform::{GridLayout, TransformConfig};
use crate::view::Range;

/// Largest display grid the pipeline will materialize (a 4096 x 4096 image).
pub const MAX_DISPLAY_CELLS: usize = 1 << 24;

/// Fully materialized display grid.
///
/// Cells without a value hold [`NO_DATA`]; the accessors translate that into
/// `None` or a caller default.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayGrid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl DisplayGrid {
    /// Grid of the given size with every cell missing.
    ///
    /// Sizes whose cell count overflows `usize` yield a 0x0 grid.
    pub fn empty(rows: usize, cols: usize) -> Self {
        let Some(len) = rows.checked_mul(cols) else {
            return Self::empty(0, 0);
        };
        Self {
            rows,
            cols,
            cells: vec![NO_DATA; len],
        }
    }

    /// Number of displayed rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of displayed columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Check whether the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell value, `None` when missing or out of bounds.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.raw_cell(row, col).filter(|value| !is_no_data(*value))
    }

    /// Cell value, or `default` when missing or out of bounds.
    pub fn value_or(&self, row: usize, col: usize, default: f64) -> f64 {
        self.value(row, col).unwrap_or(default)
    }

    /// Row-major cell storage, [`NO_DATA`] included.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Minimum and maximum over the cells that hold a value.
    pub fn min_max(&self) -> Option<Range> {
        let mut range: Option<Range> = None;
        for value in self.cells.iter().copied().filter(|value| !is_no_data(*value)) {
            range = Some(match range {
                None => Range::new(value, value),
                Some(mut existing) => {
                    existing.expand_to_include(value);
                    existing
                }
            });
        }
        range
    }

    fn raw_cell(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        let index = row * self.cols + col;
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value;
        }
    }
}

impl Default for DisplayGrid {
    fn default() -> Self {
        Self::empty(0, 0)
    }
}

/// Run slice, bin, rotate and flip over the raw data.
pub fn compute(raw: &RawData, config: &TransformConfig) -> (GridLayout, DisplayGrid) {
    let mut layout = config.layout(raw.shape());
    let cells = layout.display_rows.checked_mul(layout.display_cols);
    if cells.is_none_or(|cells| cells > MAX_DISPLAY_CELLS) {
        log::warn!(
            "{}x{} display grid exceeds {MAX_DISPLAY_CELLS} cells, showing nothing",
            layout.display_rows,
            layout.display_cols
        );
        layout.display_rows = 0;
        layout.display_cols = 0;
    }
    let mut grid = DisplayGrid::empty(layout.display_rows, layout.display_cols);
    for row in 0..layout.display_rows {
        for col in 0..layout.display_cols {
            if let Some(region) = layout.source_region(row, col) {
                grid.set(row, col, bin_region(raw, region, config.bin_mode));
            }
        }
    }
    log::debug!(
        "recomputed {}x{} grid from {:?} raw shape",
        layout.display_rows,
        layout.display_cols,
        raw.shape()
    );
    (layout, grid)
}
