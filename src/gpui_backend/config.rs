use crate::render::ColorMap;

/// Configuration for the GPUI image view.
#[derive(Debug, Clone)]
pub struct ImageViewConfig {
    /// Color map applied to cell values.
    pub colormap: ColorMap,
    /// Padding around the image in pixels.
    pub padding_px: f32,
    /// Draw a frame around the image.
    pub show_border: bool,
    /// Show a read-out for the hovered cell.
    pub show_hover: bool,
    /// Font size of the read-out.
    pub readout_size: f32,
}

impl Default for ImageViewConfig {
    fn default() -> Self {
        Self {
            colormap: ColorMap::default(),
            padding_px: 8.0,
            show_border: true,
            show_hover: true,
            readout_size: 12.0,
        }
    }
}
