use std::time::Duration;

use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Timer, WindowBounds, WindowOptions, px,
    size,
};

use gpui_live2d::{
    ColorMap, DataFormat, DataImage, GpuiImageView, ImageViewConfig, ScaleConfig, ScaleMode,
    SourceInfo, Theme,
};

const WIDTH: usize = 256;
const HISTORY: usize = 200;

fn spectrum(phase: f64) -> Vec<f64> {
    let peak = WIDTH as f64 * (0.5 + 0.35 * phase.sin());
    (0..WIDTH)
        .map(|i| {
            let offset = (i as f64 - peak) / 6.0;
            let noise = ((i as f64 * 12.9898 + phase * 78.233).sin() * 43758.5453).fract();
            (-offset * offset).exp() + 0.15 * noise.abs()
        })
        .collect()
}

fn main() {
    env_logger::init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(600.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let image = DataImage::builder()
                .data_format(DataFormat::Array1D)
                .capacity(HISTORY)
                .scale(ScaleConfig {
                    mode: ScaleMode::Dynamic,
                    ..ScaleConfig::default()
                })
                .source_info(SourceInfo {
                    units: "dB".to_string(),
                    precision: 3,
                    display_limits: None,
                })
                .build()
                .expect("valid waterfall configuration");

            let config = ImageViewConfig {
                colormap: ColorMap::Jet,
                ..Default::default()
            };
            let view = GpuiImageView::with_config(image, config).with_theme(Theme::dark());
            let image_handle = view.image_handle();
            let view_handle = cx.new(|_| view);

            let view_for_task = view_handle.clone();
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        let mut phase = 0.0_f64;
                        loop {
                            Timer::after(Duration::from_millis(33)).await;
                            let row = spectrum(phase);
                            phase += 0.03;
                            cx.update(|_, cx| {
                                view_for_task.update(cx, |_view, view_cx| {
                                    image_handle.write(|image| image.set_data(&row));
                                    view_cx.notify();
                                });
                            })
                            .ok();
                        }
                    }
                })
                .detach();

            view_handle
        })
        .unwrap();
    });
}
