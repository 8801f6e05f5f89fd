//! Color maps from normalized values to cell colors.

use serde::{Deserialize, Serialize};

use super::Color;

/// Mapping from a normalized value to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMap {
    /// Black to white.
    #[default]
    Grayscale,
    /// Blue through cyan, yellow and red.
    Jet,
}

impl ColorMap {
    /// Color for `t` in `0.0..=1.0`; values outside are clamped.
    pub fn color(self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
        match self {
            Self::Grayscale => Color::new(t, t, t, 1.0),
            Self::Jet => {
                let r = jet_channel(t - 0.75);
                let g = jet_channel(t - 0.5);
                let b = jet_channel(t - 0.25);
                Color::new(r, g, b, 1.0)
            }
        }
    }
}

// Triangle of width 1.5 centered on zero, flat-topped at 1.
fn jet_channel(offset: f32) -> f32 {
    (1.5 - 4.0 * offset.abs()).clamp(0.0, 1.0)
}
