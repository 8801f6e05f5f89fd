use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{CellTransform, RenderCommand};

/// Per-view interaction state and render cache.
#[derive(Debug, Default)]
pub(crate) struct ImageUiState {
    pub(crate) hover: Option<ScreenPoint>,
    pub(crate) image_rect: Option<ScreenRect>,
    pub(crate) cells: Option<CellTransform>,
    pub(crate) cache: CellCache,
}

impl ImageUiState {
    /// Display cell under the hover position.
    pub(crate) fn hover_cell(&self) -> Option<(usize, usize)> {
        let hover = self.hover?;
        self.cells.as_ref()?.cell_at(hover)
    }
}

/// Cell commands from the last frame, keyed by what produced them.
#[derive(Debug, Default)]
pub(crate) struct CellCache {
    pub(crate) key: Option<CellCacheKey>,
    pub(crate) commands: Vec<RenderCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CellCacheKey {
    pub(crate) generation: u64,
    pub(crate) rect: ScreenRect,
}
