use gpui::{TextRun, Window, font, px};

/// Width and height of a single line of text, in pixels.
pub(crate) fn measure(window: &Window, text: &str, size: f32) -> (f32, f32) {
    if text.is_empty() {
        return (0.0, 0.0);
    }
    let run = TextRun {
        len: text.len(),
        font: font(".SystemUIFont"),
        color: gpui::black(),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window
        .text_system()
        .shape_line(text.to_string().into(), px(size), &[run], None);
    let width = f32::from(shaped.width);
    let height = f32::from(shaped.ascent + shaped.descent);
    (width, height.max(size * 1.2))
}
