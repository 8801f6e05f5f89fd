use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};

use gpui_live2d::{
    BinMode, ColorMap, DataImage, GpuiImageView, ImageConfig, ImageViewConfig, Orientation,
    Rotation, ScaleConfig, Slice, SourceInfo,
};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;

fn frame() -> Vec<f64> {
    (0..HEIGHT)
        .flat_map(|row| {
            (0..WIDTH).map(move |col| {
                let x = col as f64 / WIDTH as f64 - 0.3;
                let y = row as f64 / HEIGHT as f64 - 0.5;
                let r = (x * x + y * y).sqrt();
                200.0 * (-r * 6.0).exp() * (1.0 + (r * 40.0).cos()) * 0.5
            })
        })
        .collect()
}

fn main() {
    env_logger::init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(720.0), px(480.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let config = ImageConfig {
                width: WIDTH,
                slice: Slice {
                    row_first: 20,
                    row_last: -21,
                    col_first: 0,
                    col_last: -1,
                },
                row_bin: 2,
                col_bin: 2,
                bin_mode: BinMode::Mean,
                orientation: Orientation {
                    rotation: Rotation::Right90,
                    flip_vertical: false,
                    flip_horizontal: true,
                },
                scale: ScaleConfig {
                    maximum: 200.0,
                    ..ScaleConfig::default()
                },
                ..ImageConfig::default()
            };

            let mut image = DataImage::with_config(config).expect("valid image configuration");
            image.set_source_info(SourceInfo {
                units: "counts".to_string(),
                precision: 1,
                display_limits: Some((0.0, 200.0)),
            });
            image.set_data(&frame());

            let view_config = ImageViewConfig {
                colormap: ColorMap::Grayscale,
                ..Default::default()
            };
            let view = GpuiImageView::with_config(image, view_config);
            cx.new(|_| view)
        })
        .unwrap();
    });
}
