use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::color::StoreColors;
use crate::data::aggregate::{MonthlySummary, StoreSummary};
use crate::format::CurrencyFormat;

const CHART_HEIGHT: f32 = 280.0;

/// Axis label for category index `mark`, blank between categories.
fn category_label(labels: &[String], mark: f64) -> String {
    if mark < 0.0 || mark.fract() != 0.0 {
        return String::new();
    }
    labels.get(mark as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Monthly evolution (line + markers)
// ---------------------------------------------------------------------------

/// Monthly sales line chart. Months are evenly spaced categories.
pub fn monthly_chart(ui: &mut Ui, monthly: &[MonthlySummary], currency: &CurrencyFormat) {
    let labels: Vec<String> = monthly.iter().map(|m| m.year_month.clone()).collect();
    let series: Vec<[f64; 2]> = monthly
        .iter()
        .enumerate()
        .map(|(i, m)| [i as f64, m.amount])
        .collect();

    let x_labels = labels.clone();
    let y_currency = currency.clone();
    let hover_currency = currency.clone();

    Plot::new("monthly_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Mês")
        .y_axis_label("Valor")
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&x_labels, mark.value))
        .y_axis_formatter(move |mark: GridMark, _range| y_currency.format(mark.value))
        .label_formatter(move |_name, point| {
            format!(
                "{}\n{}",
                category_label(&labels, point.x.round()),
                hover_currency.format(point.y)
            )
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .name("Vendas")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series))
                    .color(Color32::LIGHT_BLUE)
                    .radius(4.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Sales by store (bars)
// ---------------------------------------------------------------------------

/// Bar per store, in report order (largest first).
pub fn store_chart(
    ui: &mut Ui,
    stores: &[StoreSummary],
    colors: &StoreColors,
    currency: &CurrencyFormat,
) {
    let labels: Vec<String> = stores.iter().map(|s| s.store.clone()).collect();
    let bars: Vec<Bar> = stores
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new(i as f64, s.amount)
                .name(&s.store)
                .fill(colors.color_for(&s.store))
        })
        .collect();

    let y_currency = currency.clone();
    let bar_currency = currency.clone();

    Plot::new("store_plot")
        .height(CHART_HEIGHT)
        .y_axis_label("Valor")
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&labels, mark.value))
        .y_axis_formatter(move |mark: GridMark, _range| y_currency.format(mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .width(0.7)
                    .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
                        format!("{}\n{}", bar.name, bar_currency.format(bar.value))
                    })),
            );
        });
}
