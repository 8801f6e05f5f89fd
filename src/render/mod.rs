//! Rendering primitives for display grids.
//!
//! These types are backend-agnostic and are used by render backends (such as the
//! GPUI backend) to describe how an image should be drawn.

mod colormap;

pub use colormap::ColorMap;

use crate::geom::{ScreenPoint, ScreenRect};
use crate::pipeline::DisplayGrid;
use crate::scale::ScaleConfig;
use crate::view::Range;

const MIN_SPAN: f64 = 1e-12;

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f32,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Color::TRANSPARENT,
            stroke: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// Text styling.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 12.0,
        }
    }
}

/// Render command list.
#[derive(Debug, Clone)]
pub(crate) enum RenderCommand {
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Fill one grid cell.
    Cell {
        /// Cell bounds.
        rect: ScreenRect,
        /// Fill color.
        color: Color,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
    /// Draw text.
    Text {
        /// Text position.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

/// Aggregated render commands.
#[derive(Debug, Default, Clone)]
pub(crate) struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub(crate) fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub(crate) fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }
}

/// Mapping between display-grid cells and a screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellTransform {
    screen: ScreenRect,
    rows: usize,
    cols: usize,
}

impl CellTransform {
    /// Create a transform stretching `rows` x `cols` cells over `screen`.
    pub(crate) fn new(screen: ScreenRect, rows: usize, cols: usize) -> Option<Self> {
        if !screen.is_valid() || rows == 0 || cols == 0 {
            return None;
        }
        Some(Self { screen, rows, cols })
    }

    /// Screen bounds of a cell.
    pub(crate) fn cell_rect(&self, row: usize, col: usize) -> ScreenRect {
        let cell_w = self.screen.width() / self.cols as f32;
        let cell_h = self.screen.height() / self.rows as f32;
        let min_x = self.screen.min.x + col as f32 * cell_w;
        let min_y = self.screen.min.y + row as f32 * cell_h;
        ScreenRect::new(
            ScreenPoint::new(min_x, min_y),
            ScreenPoint::new(min_x + cell_w, min_y + cell_h),
        )
    }

    /// Cell under a screen point, if any.
    pub(crate) fn cell_at(&self, point: ScreenPoint) -> Option<(usize, usize)> {
        if !self.screen.contains(point) {
            return None;
        }
        let x_norm = (point.x - self.screen.min.x) / self.screen.width();
        let y_norm = (point.y - self.screen.min.y) / self.screen.height();
        let col = ((x_norm * self.cols as f32) as usize).min(self.cols - 1);
        let row = ((y_norm * self.rows as f32) as usize).min(self.rows - 1);
        Some((row, col))
    }
}

/// Build one colored cell per grid value.
///
/// Missing cells, and non-positive cells on a log scale, are skipped so the
/// background shows through.
pub(crate) fn build_cells(
    grid: &DisplayGrid,
    range: Range,
    scale: &ScaleConfig,
    colormap: ColorMap,
    transform: &CellTransform,
    out: &mut Vec<RenderCommand>,
) {
    out.clear();
    let Some(mapped) = scale.map_range(range) else {
        log::debug!("display range {range:?} cannot be mapped, skipping cells");
        return;
    };
    let mapped = mapped.with_min_span(MIN_SPAN);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let Some(value) = grid.value(row, col).and_then(|value| scale.map_value(value))
            else {
                continue;
            };
            out.push(RenderCommand::Cell {
                rect: transform.cell_rect(row, col),
                color: colormap.color(mapped.normalize(value)),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{DataFormat, NO_DATA, RawData};
    use crate::pipeline::compute;
    use crate::transform::TransformConfig;

    fn screen(w: f32, h: f32) -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(w, h))
    }

    fn grid_of(values: &[f64], width: usize) -> DisplayGrid {
        let mut raw = RawData::new(DataFormat::Array2D);
        raw.set_width(width).unwrap();
        raw.push(values);
        compute(&raw, &TransformConfig::default()).1
    }

    fn cell_colors(commands: &[RenderCommand]) -> Vec<Color> {
        commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Cell { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cell_rects_tile_the_screen() {
        let transform = CellTransform::new(screen(100.0, 50.0), 2, 4).unwrap();
        let rect = transform.cell_rect(1, 3);
        assert_eq!(rect.min, ScreenPoint::new(75.0, 25.0));
        assert_eq!(rect.max, ScreenPoint::new(100.0, 50.0));
    }

    #[test]
    fn cell_at_inverts_cell_rect() {
        let transform = CellTransform::new(screen(100.0, 50.0), 2, 4).unwrap();
        assert_eq!(transform.cell_at(ScreenPoint::new(80.0, 30.0)), Some((1, 3)));
        assert_eq!(transform.cell_at(ScreenPoint::new(100.0, 50.0)), Some((1, 3)));
        assert_eq!(transform.cell_at(ScreenPoint::new(0.0, 0.0)), Some((0, 0)));
        assert_eq!(transform.cell_at(ScreenPoint::new(101.0, 10.0)), None);
    }

    #[test]
    fn empty_grid_has_no_transform() {
        assert!(CellTransform::new(screen(10.0, 10.0), 0, 0).is_none());
        assert!(CellTransform::new(screen(0.0, 10.0), 1, 1).is_none());
    }

    #[test]
    fn build_cells_skips_missing_values() {
        let grid = grid_of(&[0.0, NO_DATA, 10.0], 3);
        let transform = CellTransform::new(screen(30.0, 10.0), 1, 3).unwrap();
        let mut out = Vec::new();
        build_cells(
            &grid,
            Range::new(0.0, 10.0),
            &ScaleConfig::default(),
            ColorMap::Grayscale,
            &transform,
            &mut out,
        );
        assert_eq!(
            cell_colors(&out),
            vec![ColorMap::Grayscale.color(0.0), ColorMap::Grayscale.color(1.0)]
        );
    }

    #[test]
    fn build_cells_on_log_scale_drops_non_positive() {
        let grid = grid_of(&[-1.0, 10.0, 100.0], 3);
        let transform = CellTransform::new(screen(30.0, 10.0), 1, 3).unwrap();
        let scale = ScaleConfig {
            log_scale: true,
            ..ScaleConfig::default()
        };
        let mut out = Vec::new();
        build_cells(
            &grid,
            Range::new(1.0, 100.0),
            &scale,
            ColorMap::Grayscale,
            &transform,
            &mut out,
        );
        let colors = cell_colors(&out);
        assert_eq!(colors.len(), 2);
        assert!((colors[0].r - 0.5).abs() < 1e-6);
    }
}
