//! Aggregation of raw regions into single display cells.

use serde::{Deserialize, Serialize};

use crate::datasource::{NO_DATA, RawData, is_no_data};

/// Aggregation policy for a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinMode {
    /// Pick the element at the middle of the region.
    #[default]
    Decimate,
    /// Mean of all samples present.
    Mean,
    /// Median of all samples present (upper middle for even counts).
    Median,
}

impl BinMode {
    /// Map an integer property index onto a policy.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Decimate),
            1 => Some(Self::Mean),
            2 => Some(Self::Median),
            _ => None,
        }
    }
}

/// Inclusive rectangle of raw coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First row.
    pub row_first: usize,
    /// Last row (inclusive).
    pub row_last: usize,
    /// First column.
    pub col_first: usize,
    /// Last column (inclusive).
    pub col_last: usize,
}

impl Region {
    /// Create a region from inclusive bounds.
    pub fn new(row_first: usize, row_last: usize, col_first: usize, col_last: usize) -> Self {
        Self {
            row_first,
            row_last,
            col_first,
            col_last,
        }
    }

    /// Number of rows covered; zero when inverted.
    pub fn rows(&self) -> usize {
        self.row_last.saturating_add(1).saturating_sub(self.row_first)
    }

    /// Number of columns covered; zero when inverted.
    pub fn cols(&self) -> usize {
        self.col_last.saturating_add(1).saturating_sub(self.col_first)
    }

    /// Number of cells covered.
    pub fn count(&self) -> usize {
        self.rows().saturating_mul(self.cols())
    }

    fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.row_first..=self.row_last)
            .flat_map(move |row| (self.col_first..=self.col_last).map(move |col| (row, col)))
    }
}

/// Reduce a raw region to one value.
///
/// Empty regions and regions without any sample yield [`NO_DATA`].
pub fn bin_region(raw: &RawData, region: Region, mode: BinMode) -> f64 {
    match region.count() {
        0 => NO_DATA,
        1 => raw.value(region.row_first, region.col_first, NO_DATA),
        _ => match mode {
            BinMode::Decimate => {
                let row = (region.row_first + region.row_last) / 2;
                let col = (region.col_first + region.col_last) / 2;
                raw.value(row, col, NO_DATA)
            }
            BinMode::Mean => {
                let mut sum = 0.0;
                let mut count = 0usize;
                for value in samples(raw, region) {
                    sum += value;
                    count += 1;
                }
                if count == 0 {
                    NO_DATA
                } else {
                    sum / count as f64
                }
            }
            BinMode::Median => {
                let mut values: Vec<f64> = samples(raw, region).collect();
                if values.is_empty() {
                    return NO_DATA;
                }
                values.sort_by(f64::total_cmp);
                values[values.len() / 2]
            }
        },
    }
}

fn samples(raw: &RawData, region: Region) -> impl Iterator<Item = f64> + '_ {
    region
        .cells()
        .map(|(row, col)| raw.value(row, col, NO_DATA))
        .filter(|value| !is_no_data(*value))
}
