//! Visual theme for image views.

use crate::render::Color;

/// Colors used around the image cells.
#[derive(Debug, Clone)]
pub struct Theme {
    /// View background, visible through missing cells.
    pub background: Color,
    /// Frame drawn around the image.
    pub border: Color,
    /// Read-out text.
    pub text: Color,
    /// Read-out box fill.
    pub readout_background: Color,
}

impl Theme {
    /// Light theme.
    pub fn light() -> Self {
        Self {
            background: Color::WHITE,
            border: Color::new(0.6, 0.6, 0.6, 1.0),
            text: Color::BLACK,
            readout_background: Color::new(1.0, 1.0, 1.0, 0.85),
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::new(0.08, 0.08, 0.1, 1.0),
            border: Color::new(0.35, 0.35, 0.4, 1.0),
            text: Color::new(0.92, 0.92, 0.95, 1.0),
            readout_background: Color::new(0.0, 0.0, 0.0, 0.7),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
