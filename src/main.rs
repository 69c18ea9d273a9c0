mod app;
mod color;
mod config;
mod data;
mod error;
mod format;
mod state;
mod ui;

use app::SalesPanelApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration, using defaults: {e:#}");
            AppConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Painel de Vendas",
        options,
        Box::new(|_cc| Ok(Box::new(SalesPanelApp::new(config)))),
    )
}
