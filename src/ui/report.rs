use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{RegionSummary, SalesReport, StoreSummary};
use crate::format::CurrencyFormat;
use crate::state::AppState;
use crate::ui::plot;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Central panel – metrics, tables and charts
// ---------------------------------------------------------------------------

/// Render the dashboard for the current report.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let report = match &state.report {
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Abra uma base de vendas  (Arquivo → Abrir…)");
            });
            return;
        }
        Some(Err(e)) => {
            ui.heading("Painel de Vendas");
            ui.add_space(8.0);
            ui.label(
                RichText::new("Por favor, selecione o intervalo (data inicial e data final).")
                    .color(Color32::YELLOW),
            );
            ui.label(RichText::new(e.to_string()).weak());
            return;
        }
        Some(Ok(report)) => report,
    };

    let currency = &state.config.currency;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Painel de Vendas");
            ui.add_space(8.0);

            total_metric(ui, report, currency);
            ui.add_space(12.0);

            if report.is_empty() {
                ui.label(RichText::new("Nenhum dado disponível.").color(Color32::YELLOW));
                return;
            }

            ui.heading("Vendas por Loja");
            ui.columns(2, |cols| {
                store_table(&mut cols[0], &report.stores, currency);
                plot::store_chart(&mut cols[1], &report.stores, &state.store_colors, currency);
            });
            ui.add_space(12.0);

            ui.heading("Resumo por Estado");
            region_table(ui, &report.regions, currency);
            ui.add_space(12.0);

            ui.heading("Evolução das Vendas Mensais");
            plot::monthly_chart(ui, &report.monthly, currency);
            ui.add_space(8.0);

            match &report.best_month {
                Some(best) => {
                    ui.label(
                        RichText::new(format!(
                            "Mês com maior faturamento: {} com {}",
                            best.year_month,
                            currency.format(best.amount)
                        ))
                        .strong()
                        .color(Color32::LIGHT_BLUE),
                    );
                }
                None => {
                    ui.label(RichText::new("Nenhum dado disponível.").color(Color32::YELLOW));
                }
            }
        });
}

fn total_metric(ui: &mut Ui, report: &SalesReport, currency: &CurrencyFormat) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new("Total Vendido").weak());
        ui.label(RichText::new(currency.format(report.total)).size(28.0).strong());
    });
}

fn store_table(ui: &mut Ui, stores: &[StoreSummary], currency: &CurrencyFormat) {
    ui.push_id("store_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::remainder().at_least(120.0))
            .column(Column::auto().at_least(110.0))
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Nome da Loja");
                });
                header.col(|ui| {
                    ui.strong("Valor da Venda");
                });
            })
            .body(|mut body| {
                for s in stores {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(&s.store);
                        });
                        row.col(|ui| {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(currency.format(s.amount));
                            });
                        });
                    });
                }
            });
    });
}

fn region_table(ui: &mut Ui, regions: &[RegionSummary], currency: &CurrencyFormat) {
    ui.push_id("region_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(120.0))
            .column(Column::auto().at_least(90.0))
            .column(Column::remainder().at_least(110.0))
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for title in ["UF", "Valor Total", "Quantidade", "Ticket Médio"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for r in regions {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(&r.region);
                        });
                        row.col(|ui| {
                            ui.label(currency.format(r.amount));
                        });
                        row.col(|ui| {
                            ui.label(currency.format_number(r.quantity as f64, 0));
                        });
                        row.col(|ui| {
                            ui.label(currency.format_ticket(r.ticket_average));
                        });
                    });
                }
            });
    });
}
