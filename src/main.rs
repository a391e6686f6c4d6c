mod app;
mod color;
mod config;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::MouseRhythmsApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = ViewerConfig::from_args()?;
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mouse Rhythms – Activity & Temperature",
        options,
        Box::new(move |_cc| Ok(Box::new(MouseRhythmsApp::new(config, runtime)))),
    )
    .map_err(|e| anyhow!("viewer exited with error: {e}"))
}
