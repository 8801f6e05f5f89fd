use gpui::{Bounds, Pixels, Window};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::image::DataImage;
use crate::render::{
    CellTransform, RectStyle, RenderCommand, RenderList, TextStyle, build_cells,
};
use crate::style::Theme;

use super::config::ImageViewConfig;
use super::state::{CellCacheKey, ImageUiState};
use super::text::measure;

const READOUT_PADDING: f32 = 4.0;
const READOUT_OFFSET: f32 = 12.0;

#[derive(Debug, Clone)]
pub(crate) struct ImageFrame {
    pub(crate) render: RenderList,
}

pub(crate) fn build_frame(
    image: &DataImage,
    state: &mut ImageUiState,
    config: &ImageViewConfig,
    theme: &Theme,
    bounds: Bounds<Pixels>,
    window: &Window,
) -> ImageFrame {
    let mut render = RenderList::new();

    let full_width = f32::from(bounds.size.width);
    let full_height = f32::from(bounds.size.height);
    if full_width <= 1.0 || full_height <= 1.0 {
        return ImageFrame { render };
    }

    let origin_x = f32::from(bounds.origin.x);
    let origin_y = f32::from(bounds.origin.y);
    let padding = config
        .padding_px
        .clamp(0.0, (full_width.min(full_height) - 1.0) * 0.5);
    let image_rect = ScreenRect::new(
        ScreenPoint::new(origin_x + padding, origin_y + padding),
        ScreenPoint::new(
            origin_x + full_width - padding,
            origin_y + full_height - padding,
        ),
    );
    state.image_rect = Some(image_rect);
    state.cells = CellTransform::new(image_rect, image.rows(), image.cols());

    let key = CellCacheKey {
        generation: image.generation(),
        rect: image_rect,
    };
    if state.cache.key.as_ref() != Some(&key) {
        match state.cells.as_ref() {
            Some(cells) => build_cells(
                image.grid(),
                image.display_range(),
                image.scale(),
                config.colormap,
                cells,
                &mut state.cache.commands,
            ),
            None => state.cache.commands.clear(),
        }
        state.cache.key = Some(key);
    }

    render.push(RenderCommand::ClipRect(image_rect));
    for command in &state.cache.commands {
        render.push(command.clone());
    }
    render.push(RenderCommand::ClipEnd);

    if config.show_border {
        render.push(RenderCommand::Rect {
            rect: image_rect,
            style: RectStyle {
                stroke: theme.border,
                ..RectStyle::default()
            },
        });
    }

    if config.show_hover {
        let readout = state
            .hover_cell()
            .and_then(|(row, col)| image.readout(row, col));
        if let (Some(readout), Some(hover)) = (readout, state.hover) {
            let full_rect = ScreenRect::new(
                ScreenPoint::new(origin_x, origin_y),
                ScreenPoint::new(origin_x + full_width, origin_y + full_height),
            );
            push_readout(
                &mut render,
                &readout.label(),
                hover,
                full_rect,
                config,
                theme,
                window,
            );
        }
    }

    ImageFrame { render }
}

fn push_readout(
    render: &mut RenderList,
    text: &str,
    hover: ScreenPoint,
    bounds: ScreenRect,
    config: &ImageViewConfig,
    theme: &Theme,
    window: &Window,
) {
    let (text_w, text_h) = measure(window, text, config.readout_size);
    let box_w = text_w + READOUT_PADDING * 2.0;
    let box_h = text_h + READOUT_PADDING * 2.0;
    let origin = place_box(hover, (box_w, box_h), bounds);
    let rect = ScreenRect::new(
        origin,
        ScreenPoint::new(origin.x + box_w, origin.y + box_h),
    );
    render.push(RenderCommand::Rect {
        rect,
        style: RectStyle {
            fill: theme.readout_background,
            stroke: theme.border,
            stroke_width: 1.0,
        },
    });
    render.push(RenderCommand::Text {
        position: ScreenPoint::new(origin.x + READOUT_PADDING, origin.y + READOUT_PADDING),
        text: text.to_string(),
        style: TextStyle {
            color: theme.text,
            size: config.readout_size,
        },
    });
}

// Below-right of the cursor, pushed back inside the view when it would overflow.
fn place_box(hover: ScreenPoint, size: (f32, f32), bounds: ScreenRect) -> ScreenPoint {
    let mut x = hover.x + READOUT_OFFSET;
    let mut y = hover.y + READOUT_OFFSET;
    if x + size.0 > bounds.max.x {
        x = hover.x - READOUT_OFFSET - size.0;
    }
    if y + size.1 > bounds.max.y {
        y = hover.y - READOUT_OFFSET - size.1;
    }
    ScreenPoint::new(x.max(bounds.min.x), y.max(bounds.min.y))
}
