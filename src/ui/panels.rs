use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::{AppState, Dimension};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    let Some(bounds) = state.dataset.as_ref().map(|ds| ds.date_bounds) else {
        ui.label("Nenhum arquivo carregado.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            dimension_filter(ui, state, Dimension::Region, "Estados");
            dimension_filter(ui, state, Dimension::Store, "Lojas");
            ui.separator();

            match bounds {
                Some((min, max)) => period_filter(ui, state, min, max),
                None => {
                    ui.label("Sem datas no arquivo.");
                }
            }
        });
}

/// Collapsible multiselect for one dimension, with All / None buttons.
fn dimension_filter(ui: &mut Ui, state: &mut AppState, dim: Dimension, title: &str) {
    // Clone what we need so we can mutate state inside the loop.
    let options = state.options(dim).to_vec();
    let n_selected = options.iter().filter(|v| state.is_selected(dim, v)).count();
    let header_text = format!("{title}  ({n_selected}/{})", options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Todos").clicked() {
                    state.select_all(dim);
                }
                if ui.small_button("Nenhum").clicked() {
                    state.select_none(dim);
                }
            });

            for value in &options {
                let mut checked = state.is_selected(dim, value);
                let mut text = RichText::new(value);
                if dim == Dimension::Store {
                    text = text.color(state.store_colors.color_for(value));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle(dim, value);
                }
            }
        });
}

/// Start / end date pickers. Either end can be cleared, which leaves the
/// period incomplete until the user picks it again.
fn period_filter(ui: &mut Ui, state: &mut AppState, min: NaiveDate, max: NaiveDate) {
    ui.strong("Período da venda");

    let start = state.criteria.period.start;
    let end = state.criteria.period.end;

    egui::Grid::new("period_grid")
        .num_columns(3)
        .spacing([6.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Início");
            if let Some(date) = date_slot(ui, "start_date", start, min) {
                state.set_start(date);
            }
            ui.end_row();

            ui.label("Fim");
            if let Some(date) = date_slot(ui, "end_date", end, max) {
                state.set_end(date);
            }
            ui.end_row();
        });

    if ui.small_button("Período completo").clicked() {
        state.set_start(Some(min));
        state.set_end(Some(max));
    }
}

/// One date picker with a clear button. Returns the new value when changed.
fn date_slot(
    ui: &mut Ui,
    id: &str,
    current: Option<NaiveDate>,
    fallback: NaiveDate,
) -> Option<Option<NaiveDate>> {
    match current {
        Some(mut date) => {
            let picked = ui
                .add(DatePickerButton::new(&mut date).id_salt(id).format("%d/%m/%Y"))
                .changed();
            let cleared = ui.small_button("✖").on_hover_text("Limpar").clicked();
            if cleared {
                Some(None)
            } else if picked {
                Some(Some(date))
            } else {
                None
            }
        }
        None => {
            ui.label(RichText::new("—").weak());
            ui.small_button("Escolher").clicked().then_some(Some(fallback))
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Recarregar"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = match &state.report {
                Some(Ok(report)) => report.row_count,
                _ => 0,
            };
            ui.label(format!("{} vendas carregadas, {visible} no filtro", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir base de vendas")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "csv", "json", "parquet", "pq"])
        .add_filter("Excel / ODS", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
