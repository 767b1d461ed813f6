use anyhow::{anyhow, Context};
use eframe::egui;

use supplier_directory::app::DirectoryApp;
use supplier_directory::config::load_app_config;

fn main() -> anyhow::Result<()> {
    let config = load_app_config().context("reading configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();
    log::info!(
        "Starting with source {:?}, route {}",
        config.source,
        config.start_route
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Supplier Directory",
        options,
        Box::new(move |cc| Ok(Box::new(DirectoryApp::new(&config, cc.egui_ctx.clone())))),
    )
    .map_err(|e| anyhow!("running the viewer: {e}"))
}
