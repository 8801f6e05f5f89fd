//! Image entry points: raw data, configuration and the cached display grid.

use crate::binning::{BinMode, Region};
use crate::config::{ConfigError, ImageConfig};
use crate::datasource::{DataFormat, RawData, SourceInfo};
use crate::pipeline::{DisplayGrid, compute};
use crate::scale::{ScaleConfig, ScaleMode};
use crate::transform::{GridLayout, Orientation, Rotation, Slice, TransformConfig};
use crate::view::Range;

/// Consumer notified after every recompute.
///
/// Presenters receive the freshly cached grid and must not assume any other
/// state; rendering reads the grid, nothing else.
pub trait Presenter: Send + Sync {
    /// Called synchronously once the grid has been rebuilt.
    fn present(&mut self, grid: &DisplayGrid);
}

impl<F> Presenter for F
where
    F: FnMut(&DisplayGrid) + Send + Sync,
{
    fn present(&mut self, grid: &DisplayGrid) {
        self(grid);
    }
}

/// Description of one display cell for hover read-outs.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    /// Display row.
    pub row: usize,
    /// Display column.
    pub col: usize,
    /// Raw region aggregated into the cell.
    pub source: Region,
    /// Cell value, `None` when missing.
    pub value: Option<f64>,
    /// Engineering units of the source.
    pub units: String,
    /// Decimal places to display.
    pub precision: u16,
}

impl Readout {
    /// Human readable `row, col: value units` label.
    pub fn label(&self) -> String {
        let precision = usize::from(self.precision);
        let value = match self.value {
            Some(value) => format!("{value:.precision$}"),
            None => "no data".to_string(),
        };
        if self.units.is_empty() || self.value.is_none() {
            format!("{}, {}: {value}", self.row, self.col)
        } else {
            format!("{}, {}: {value} {}", self.row, self.col, self.units)
        }
    }
}

/// 2D data image: raw buffer, pipeline configuration and cached output.
///
/// Every setter rebuilds the cached grid before it returns, then notifies the
/// registered presenters. Setters that reject a value leave the image as it
/// was and do not recompute.
pub struct DataImage {
    raw: RawData,
    transform: TransformConfig,
    scale: ScaleConfig,
    source: SourceInfo,
    layout: GridLayout,
    grid: DisplayGrid,
    display_range: Range,
    generation: u64,
    presenters: Vec<Box<dyn Presenter>>,
}

impl DataImage {
    /// Create an image with default configuration.
    pub fn new() -> Self {
        let scale = ScaleConfig::default();
        let raw = RawData::default();
        let transform = TransformConfig::default();
        let (layout, grid) = compute(&raw, &transform);
        Self {
            raw,
            transform,
            scale,
            source: SourceInfo::default(),
            layout,
            grid,
            display_range: scale.manual_range(),
            generation: 0,
            presenters: Vec::new(),
        }
    }

    /// Create an image from a configuration snapshot.
    pub fn with_config(config: ImageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut image = Self::new();
        image.raw.set_format(config.data_format);
        image.raw.set_width(config.width)?;
        image.raw.set_capacity(config.capacity)?;
        image.transform = config.transform();
        image.scale = config.scale;
        image.display_range = config.scale.manual_range();
        image.recompute();
        Ok(image)
    }

    /// Start building an image.
    pub fn builder() -> DataImageBuilder {
        DataImageBuilder::default()
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ImageConfig {
        ImageConfig {
            data_format: self.raw.format(),
            width: self.raw.width(),
            capacity: self.raw.capacity(),
            slice: self.transform.slice,
            row_bin: self.transform.row_bin,
            col_bin: self.transform.col_bin,
            bin_mode: self.transform.bin_mode,
            orientation: self.transform.orientation,
            scale: self.scale,
        }
    }

    /// Register a presenter called after every recompute.
    pub fn add_presenter(&mut self, presenter: impl Presenter + 'static) {
        self.presenters.push(Box::new(presenter));
    }

    // Inbound data.

    /// Deliver a new array: appended as a row in 1D mode, replacing the
    /// buffer in 2D mode.
    pub fn set_data(&mut self, values: &[f64]) {
        self.raw.push(values);
        self.recompute();
    }

    /// Drop all raw data.
    pub fn clear_data(&mut self) {
        self.raw.clear();
        self.recompute();
    }

    /// Set or clear the width supplied by the data source.
    pub fn set_source_width(&mut self, width: Option<usize>) {
        self.raw.set_source_width(width);
        self.recompute();
    }

    /// Replace the source metadata (units, precision, display limits).
    pub fn set_source_info(&mut self, info: SourceInfo) {
        self.source = info;
        self.recompute();
    }

    // Configuration.

    /// Change how deliveries are interpreted. Clears stored data on change.
    pub fn set_data_format(&mut self, format: DataFormat) {
        self.raw.set_format(format);
        self.recompute();
    }

    /// Set the static width (at least 1).
    pub fn set_width(&mut self, width: usize) -> Result<(), ConfigError> {
        self.raw.set_width(width).inspect_err(log_rejected)?;
        self.recompute();
        Ok(())
    }

    /// Set the 1D accumulation capacity (1..=1024).
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), ConfigError> {
        self.raw.set_capacity(capacity).inspect_err(log_rejected)?;
        self.recompute();
        Ok(())
    }

    /// Replace the whole slice window.
    pub fn set_slice(&mut self, slice: Slice) {
        self.transform.slice = slice;
        self.recompute();
    }

    /// First raw row shown; negative counts from the end.
    pub fn set_row_first(&mut self, value: i32) {
        self.transform.slice.row_first = value;
        self.recompute();
    }

    /// Last raw row shown; negative counts from the end.
    pub fn set_row_last(&mut self, value: i32) {
        self.transform.slice.row_last = value;
        self.recompute();
    }

    /// First raw column shown; negative counts from the end.
    pub fn set_col_first(&mut self, value: i32) {
        self.transform.slice.col_first = value;
        self.recompute();
    }

    /// Last raw column shown; negative counts from the end.
    pub fn set_col_last(&mut self, value: i32) {
        self.transform.slice.col_last = value;
        self.recompute();
    }

    /// Raw rows per displayed row (at least 1).
    pub fn set_row_bin(&mut self, bin: usize) -> Result<(), ConfigError> {
        self.transform.row_bin = validate_bin(bin)?;
        self.recompute();
        Ok(())
    }

    /// Raw columns per displayed column (at least 1).
    pub fn set_col_bin(&mut self, bin: usize) -> Result<(), ConfigError> {
        self.transform.col_bin = validate_bin(bin)?;
        self.recompute();
        Ok(())
    }

    /// Aggregation policy.
    pub fn set_bin_mode(&mut self, mode: BinMode) {
        self.transform.bin_mode = mode;
        self.recompute();
    }

    /// Rotation applied after binning.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.transform.orientation.rotation = rotation;
        self.recompute();
    }

    /// Mirror displayed rows.
    pub fn set_flip_vertical(&mut self, flip: bool) {
        self.transform.orientation.flip_vertical = flip;
        self.recompute();
    }

    /// Mirror displayed columns.
    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.transform.orientation.flip_horizontal = flip;
        self.recompute();
    }

    /// Replace rotation and both flips at once.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.transform.orientation = orientation;
        self.recompute();
    }

    /// Select where the display range comes from.
    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.scale.mode = mode;
        self.recompute();
    }

    /// Manual display bounds.
    pub fn set_manual_range(&mut self, minimum: f64, maximum: f64) {
        self.scale.minimum = minimum;
        self.scale.maximum = maximum;
        self.recompute();
    }

    /// Color values on a `log10` scale.
    pub fn set_log_scale(&mut self, log_scale: bool) {
        self.scale.log_scale = log_scale;
        self.recompute();
    }

    /// Set the data format from an integer property value.
    pub fn set_data_format_index(&mut self, index: i32) {
        match DataFormat::from_index(index) {
            Some(format) => self.set_data_format(format),
            None => log::warn!("ignoring unknown data format index {index}"),
        }
    }

    /// Set the bin mode from an integer property value.
    pub fn set_bin_mode_index(&mut self, index: i32) {
        match BinMode::from_index(index) {
            Some(mode) => self.set_bin_mode(mode),
            None => log::warn!("ignoring unknown bin mode index {index}"),
        }
    }

    /// Set the rotation from an integer property value.
    pub fn set_rotation_index(&mut self, index: i32) {
        match Rotation::from_index(index) {
            Some(rotation) => self.set_rotation(rotation),
            None => log::warn!("ignoring unknown rotation index {index}"),
        }
    }

    /// Set the scale mode from an integer property value.
    pub fn set_scale_mode_index(&mut self, index: i32) {
        match ScaleMode::from_index(index) {
            Some(mode) => self.set_scale_mode(mode),
            None => log::warn!("ignoring unknown scale mode index {index}"),
        }
    }

    /// Use the range of the currently displayed cells as the manual bounds.
    ///
    /// Switches to [`ScaleMode::Manual`]. Does nothing when no cell holds a
    /// value.
    pub fn capture_displayed_range(&mut self) {
        let Some(range) = self.grid.min_max() else {
            return;
        };
        self.scale.mode = ScaleMode::Manual;
        self.scale.minimum = range.min;
        self.scale.maximum = range.max;
        self.recompute();
    }

    // Queries.

    /// Displayed rows.
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Displayed columns.
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Displayed cell, `None` when missing or out of bounds.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.grid.value(row, col)
    }

    /// Displayed cell, or `default` when missing or out of bounds.
    pub fn value_or(&self, row: usize, col: usize, default: f64) -> f64 {
        self.grid.value_or(row, col, default)
    }

    /// The cached display grid.
    pub fn grid(&self) -> &DisplayGrid {
        &self.grid
    }

    /// Geometry of the last recompute.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Raw buffer.
    pub fn raw(&self) -> &RawData {
        &self.raw
    }

    /// Scale settings.
    pub fn scale(&self) -> &ScaleConfig {
        &self.scale
    }

    /// Source metadata.
    pub fn source_info(&self) -> &SourceInfo {
        &self.source
    }

    /// Engineering units of the source.
    pub fn units(&self) -> &str {
        &self.source.units
    }

    /// Display precision of the source.
    pub fn precision(&self) -> u16 {
        self.source.precision
    }

    /// Check whether any raw data is available.
    pub fn has_data(&self) -> bool {
        self.raw.has_data()
    }

    /// Display range resolved at the last recompute.
    pub fn display_range(&self) -> Range {
        self.display_range
    }

    /// Counter bumped on every recompute.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Describe a display cell, `None` outside the grid.
    pub fn readout(&self, row: usize, col: usize) -> Option<Readout> {
        let source = self.layout.source_region(row, col)?;
        Some(Readout {
            row,
            col,
            source,
            value: self.grid.value(row, col),
            units: self.source.units.clone(),
            precision: self.source.precision,
        })
    }

    fn recompute(&mut self) {
        let (layout, grid) = compute(&self.raw, &self.transform);
        self.layout = layout;
        self.grid = grid;
        self.display_range = self
            .scale
            .resolve(&self.raw, &self.source, self.display_range);
        self.generation = self.generation.wrapping_add(1);
        for presenter in &mut self.presenters {
            presenter.present(&self.grid);
        }
    }
}

impl Default for DataImage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DataImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataImage")
            .field("raw", &self.raw)
            .field("transform", &self.transform)
            .field("scale", &self.scale)
            .field("source", &self.source)
            .field("rows", &self.grid.rows())
            .field("cols", &self.grid.cols())
            .field("generation", &self.generation)
            .field("presenters", &self.presenters.len())
            .finish()
    }
}

fn validate_bin(bin: usize) -> Result<usize, ConfigError> {
    if bin < 1 {
        let err = ConfigError::InvalidBin(bin);
        log_rejected(&err);
        return Err(err);
    }
    Ok(bin)
}

fn log_rejected(err: &ConfigError) {
    log::warn!("rejected configuration value: {err}");
}

/// Builder for configuring an image before construction.
#[derive(Default)]
pub struct DataImageBuilder {
    config: ImageConfig,
    source: Option<SourceInfo>,
    presenters: Vec<Box<dyn Presenter>>,
}

impl DataImageBuilder {
    /// Start from a configuration snapshot.
    pub fn config(mut self, config: ImageConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the data format.
    pub fn data_format(mut self, format: DataFormat) -> Self {
        self.config.data_format = format;
        self
    }

    /// Set the static width.
    pub fn width(mut self, width: usize) -> Self {
        self.config.width = width;
        self
    }

    /// Set the 1D accumulation capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set the slice window.
    pub fn slice(mut self, slice: Slice) -> Self {
        self.config.slice = slice;
        self
    }

    /// Set both bin factors.
    pub fn bins(mut self, row_bin: usize, col_bin: usize) -> Self {
        self.config.row_bin = row_bin;
        self.config.col_bin = col_bin;
        self
    }

    /// Set the aggregation policy.
    pub fn bin_mode(mut self, mode: BinMode) -> Self {
        self.config.bin_mode = mode;
        self
    }

    /// Set rotation and flips.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    /// Set the scale settings.
    pub fn scale(mut self, scale: ScaleConfig) -> Self {
        self.config.scale = scale;
        self
    }

    /// Set the source metadata.
    pub fn source_info(mut self, info: SourceInfo) -> Self {
        self.source = Some(info);
        self
    }

    /// Register a presenter.
    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenters.push(Box::new(presenter));
        self
    }

    /// Build the image, validating the configuration.
    pub fn build(self) -> Result<DataImage, ConfigError> {
        let mut image = DataImage::with_config(self.config)?;
        image.presenters = self.presenters;
        if let Some(source) = self.source {
            image.set_source_info(source);
        }
        Ok(image)
    }
}

impl std::fmt::Debug for DataImageBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataImageBuilder")
            .field("config", &self.config)
            .field("source", &self.source)
            .field("presenters", &self.presenters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::datasource::{NO_DATA, is_no_data};

    fn image_2d(values: &[f64], width: usize) -> DataImage {
        let mut image = DataImage::builder()
            .data_format(DataFormat::Array2D)
            .width(width)
            .build()
            .unwrap();
        image.set_data(values);
        image
    }

    #[test]
    fn setters_recompute_synchronously() {
        let mut image = image_2d(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        assert_eq!((image.rows(), image.cols()), (2, 3));
        image.set_rotation(Rotation::Right90);
        assert_eq!((image.rows(), image.cols()), (3, 2));
        assert_eq!(image.value(0, 0), Some(4.0));
    }

    #[test]
    fn presenters_see_every_recompute() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut image = DataImage::builder()
            .width(2)
            .presenter(move |grid: &DisplayGrid| {
                sink.lock().unwrap().push((grid.rows(), grid.cols()));
            })
            .build()
            .unwrap();
        image.set_data(&[1.0, 2.0, 3.0, 4.0]);
        image.set_col_bin(2).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.last(), Some(&(2, 1)));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn rejected_setters_leave_state_untouched() {
        let mut image = image_2d(&[1.0, 2.0], 2);
        let generation = image.generation();
        assert!(image.set_width(0).is_err());
        assert!(image.set_row_bin(0).is_err());
        assert!(image.set_capacity(5000).is_err());
        assert_eq!(image.generation(), generation);
        assert_eq!(image.config().width, 2);
        assert_eq!(image.config().row_bin, 1);
    }

    #[test]
    fn huge_row_bin_after_slice_start_bins_remaining_rows() {
        let mut image = image_2d(&[1.0, 2.0, 3.0, 4.0, 5.0], 1);
        image.set_bin_mode(BinMode::Mean);
        image.set_row_first(2);
        image.set_row_bin(usize::MAX).unwrap();
        assert_eq!((image.rows(), image.cols()), (1, 1));
        assert_eq!(image.value(0, 0), Some(4.0));
        image.set_bin_mode(BinMode::Decimate);
        assert_eq!(image.value(0, 0), Some(3.0));
    }

    #[test]
    fn oversized_width_gives_empty_image() {
        let mut image = image_2d(&[1.0, 2.0], 2);
        image.set_width(usize::MAX).unwrap();
        assert_eq!((image.rows(), image.cols()), (0, 0));
        assert!(image.readout(0, 0).is_none());
        image.set_source_width(Some(2));
        assert_eq!((image.rows(), image.cols()), (1, 2));
    }

    #[test]
    fn toggling_flip_restores_grid() {
        let mut image = image_2d(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        let original = image.grid().clone();
        image.set_flip_vertical(true);
        assert_eq!(image.value(0, 0), Some(4.0));
        image.set_flip_vertical(false);
        assert_eq!(image.grid(), &original);
        image.set_flip_horizontal(true);
        assert_eq!(image.value(0, 0), Some(3.0));
        image.set_flip_horizontal(false);
        assert_eq!(image.grid(), &original);
    }

    #[test]
    fn unknown_indices_are_ignored() {
        let mut image = image_2d(&[1.0, 2.0], 2);
        let before = image.config();
        image.set_bin_mode_index(9);
        image.set_rotation_index(-1);
        image.set_scale_mode_index(4);
        image.set_data_format_index(2);
        assert_eq!(image.config(), before);
        image.set_bin_mode_index(1);
        assert_eq!(image.config().bin_mode, BinMode::Mean);
    }

    #[test]
    fn source_width_overrides_static_width() {
        let mut image = image_2d(&[0.0; 12], 3);
        assert_eq!(image.cols(), 3);
        image.set_source_width(Some(6));
        assert_eq!((image.rows(), image.cols()), (2, 6));
        image.set_source_width(None);
        assert_eq!(image.cols(), 3);
    }

    #[test]
    fn one_d_mode_accumulates_rows() {
        let mut image = DataImage::builder()
            .data_format(DataFormat::Array1D)
            .capacity(2)
            .build()
            .unwrap();
        image.set_data(&[1.0, 2.0]);
        image.set_data(&[3.0, 4.0]);
        image.set_data(&[5.0, 6.0]);
        assert_eq!((image.rows(), image.cols()), (2, 2));
        assert_eq!(image.value(0, 0), Some(3.0));
        assert_eq!(image.value(1, 1), Some(6.0));
    }

    #[test]
    fn value_or_hides_missing_cells() {
        let image = image_2d(&[1.0, NO_DATA], 2);
        assert_eq!(image.value_or(0, 1, 0.5), 0.5);
        assert!(!is_no_data(image.value_or(0, 1, 0.5)));
        assert_eq!(image.value_or(5, 5, 0.5), 0.5);
    }

    #[test]
    fn has_data_tracks_deliveries() {
        let mut image = DataImage::new();
        assert!(!image.has_data());
        image.set_data(&[1.0]);
        assert!(image.has_data());
        image.clear_data();
        assert!(!image.has_data());
    }

    #[test]
    fn dynamic_scale_follows_data() {
        let mut image = image_2d(&[2.0, 9.0], 2);
        image.set_scale_mode(ScaleMode::Dynamic);
        assert_eq!(image.display_range(), Range::new(2.0, 9.0));
        image.set_data(&[-3.0, 1.0]);
        assert_eq!(image.display_range(), Range::new(-3.0, 1.0));
        image.set_scale_mode(ScaleMode::Displayed);
        image.set_data(&[100.0, 200.0]);
        assert_eq!(image.display_range(), Range::new(-3.0, 1.0));
    }

    #[test]
    fn capture_displayed_range_uses_grid() {
        let mut image = image_2d(&[1.0, 2.0, 30.0, 40.0], 2);
        image.set_row_last(0);
        image.capture_displayed_range();
        assert_eq!(image.scale().mode, ScaleMode::Manual);
        assert_eq!(image.display_range(), Range::new(1.0, 2.0));
    }

    #[test]
    fn readout_reports_source_region_and_units() {
        let mut image = image_2d(&[1.0, 2.0, 3.0, 4.0], 4);
        image.set_col_bin(2).unwrap();
        image.set_source_info(SourceInfo {
            units: "mm".to_string(),
            precision: 1,
            display_limits: None,
        });
        let readout = image.readout(0, 1).unwrap();
        assert_eq!(readout.source, Region::new(0, 0, 2, 3));
        assert_eq!(readout.value, Some(3.0));
        assert_eq!(readout.label(), "0, 1: 3.0 mm");
        assert!(image.readout(0, 2).is_none());
        assert_eq!(image.units(), "mm");
        assert_eq!(image.precision(), 1);
    }

    #[test]
    fn config_snapshot_round_trips_through_builder() {
        let mut image = image_2d(&[0.0; 4], 2);
        image.set_orientation(Orientation {
            rotation: Rotation::Rotate180,
            flip_vertical: true,
            flip_horizontal: false,
        });
        image.set_log_scale(true);
        let config = image.config();
        let rebuilt = DataImage::with_config(config).unwrap();
        assert_eq!(rebuilt.config(), config);
    }
}
