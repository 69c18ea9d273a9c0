use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesPanelApp {
    pub state: AppState,
}

impl SalesPanelApp {
    /// Build the app and open the configured default file, if any.
    pub fn new(config: AppConfig) -> Self {
        let default_file = config.default_file.clone();
        let mut state = AppState::new(config);
        if let Some(path) = default_file {
            state.open(&path);
        }
        Self { state }
    }
}

impl eframe::App for SalesPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, tables, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            report::dashboard(ui, &self.state);
        });
    }
}
