mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::DropscopeApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = config::DashboardConfig::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dropscope – Student Dropout Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DropscopeApp::new(config)))),
    )
}
