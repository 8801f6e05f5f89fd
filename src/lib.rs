//! gpui_live2d turns a stream of 2D array data into a displayable image.
//! Incoming frames are sliced, binned, rotated and flipped into a cached grid
//! that a GPUI view paints as colored cells.

#![forbid(unsafe_code)]

pub mod binning;
pub mod config;
pub mod datasource;
mod geom;
pub mod gpui_backend;
pub mod image;
pub mod pipeline;
pub mod render;
pub mod scale;
pub mod style;
pub mod transform;
pub mod view;

pub use binning::{BinMode, Region, bin_region};
pub use config::{ConfigError, ImageConfig};
pub use datasource::{
    DataFormat, MAX_ACCUMULATION, NO_DATA, RawData, SourceInfo, effective_width, is_no_data,
};
pub use gpui_backend::{GpuiImageView, ImageHandle, ImageViewConfig};
pub use image::{DataImage, DataImageBuilder, Presenter, Readout};
pub use pipeline::{DisplayGrid, MAX_DISPLAY_CELLS, compute};
pub use render::{Color, ColorMap};
pub use scale::{ScaleConfig, ScaleMode, map_value};
pub use style::Theme;
pub use transform::{
    AxisSlice, GridLayout, Orientation, Rotation, Slice, TransformConfig, resolve_bound,
};
pub use view::Range;
