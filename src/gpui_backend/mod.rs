//! GPUI integration for gpui_live2d.
//!
//! This module provides a GPUI view that paints the cached grid of a
//! [`DataImage`](crate::image::DataImage) and shows a read-out of the cell
//! under the cursor.

mod config;
mod frame;
mod paint;
mod state;
mod text;
mod view;

pub use config::ImageViewConfig;
pub use view::{GpuiImageView, ImageHandle};
