use std::sync::{Arc, PoisonError, RwLock};

use gpui::prelude::*;
use gpui::{MouseMoveEvent, Pixels, Point, Window, canvas, div};

use crate::geom::ScreenPoint;
use crate::image::DataImage;
use crate::style::Theme;

use super::config::ImageViewConfig;
use super::frame::build_frame;
use super::paint::{paint_frame, to_hsla};
use super::state::ImageUiState;

/// A GPUI view that renders a [`DataImage`] as a grid of colored cells.
///
/// The view only paints what the image has already computed; all slicing,
/// binning and orientation happens when the image is mutated.
#[derive(Clone)]
pub struct GpuiImageView {
    image: Arc<RwLock<DataImage>>,
    state: Arc<RwLock<ImageUiState>>,
    config: ImageViewConfig,
    theme: Theme,
}

impl GpuiImageView {
    /// Create a new GPUI image view for the given image.
    ///
    /// Uses the default [`ImageViewConfig`] and the light theme.
    pub fn new(image: DataImage) -> Self {
        Self::with_config(image, ImageViewConfig::default())
    }

    /// Create a new GPUI image view with a custom configuration.
    pub fn with_config(image: DataImage, config: ImageViewConfig) -> Self {
        Self {
            image: Arc::new(RwLock::new(image)),
            state: Arc::new(RwLock::new(ImageUiState::default())),
            config,
            theme: Theme::default(),
        }
    }

    /// Replace the view theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Get a handle for mutating the underlying image.
    ///
    /// This is useful for streaming updates from async tasks.
    pub fn image_handle(&self) -> ImageHandle {
        ImageHandle {
            image: Arc::clone(&self.image),
        }
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = state
            .image_rect
            .filter(|rect| rect.contains(pos))
            .map(|_| pos);
        if next != state.hover {
            state.hover = next;
            cx.notify();
        }
    }
}

impl Render for GpuiImageView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let image = Arc::clone(&self.image);
        let state = Arc::clone(&self.state);
        let config = self.config.clone();
        let theme = self.theme.clone();
        let background = to_hsla(theme.background);

        div()
            .size_full()
            .bg(background)
            .child(
                canvas(
                    move |bounds, window, _| {
                        let image = image.read().unwrap_or_else(PoisonError::into_inner);
                        let mut state = state.write().unwrap_or_else(PoisonError::into_inner);
                        build_frame(&image, &mut state, &config, &theme, bounds, window)
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
    }
}

/// A handle for mutating a [`DataImage`] held inside a `GpuiImageView`.
///
/// The handle clones cheaply and can be moved into async tasks. Every
/// mutation recomputes the display grid before the lock is released, so the
/// next frame always paints a consistent image.
#[derive(Clone)]
pub struct ImageHandle {
    image: Arc<RwLock<DataImage>>,
}

impl ImageHandle {
    /// Read the image state.
    ///
    /// The image is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&DataImage) -> R) -> R {
        let image = self.image.read().unwrap_or_else(PoisonError::into_inner);
        f(&image)
    }

    /// Mutate the image state.
    ///
    /// The image is locked for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut DataImage) -> R) -> R {
        let mut image = self.image.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut image)
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}
