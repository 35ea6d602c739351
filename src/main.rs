mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::RustyRasterApp;
use eframe::egui;
use rusty_raster::config::RunConfig;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional first argument: a run config; otherwise look for the default
    // recordings in the working directory.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match &config_path {
        Some(path) => match RunConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e:#}");
                std::process::exit(2);
            }
        },
        None => RunConfig::default(),
    };

    let mut state = AppState::new(config, config_path);
    state.reload();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Raster – Recording Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyRasterApp::new(state)))),
    )
}
