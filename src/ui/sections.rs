use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::habitable::{HZ_DISTANCE_AU, HZ_TEMPERATURE_K};
use crate::data::model::{Measured, PlanetRecord};
use crate::data::stats::{self, DatasetMetrics, HabitableZoneStats};
use crate::state::{AppState, SummaryState, SummaryTarget};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).weak());
            ui.label(RichText::new(value).size(22.0).strong());
        });
    });
}

pub fn kpi_row(ui: &mut Ui, state: &AppState, records: &[&PlanetRecord]) {
    let DatasetMetrics {
        total,
        methods,
        host_stars,
    } = stats::metrics(records);
    let years = match &state.criteria.year_range {
        Some(r) => format!("{}–{}", r.start(), r.end()),
        None => "all".to_string(),
    };

    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Total exoplanets", &total.to_string());
        metric(ui, "Discovery methods", &methods.to_string());
        metric(ui, "Host stars", &host_stars.to_string());
        metric(ui, "Year range", &years);
    });
}

// ---------------------------------------------------------------------------
// Habitable-zone statistics and candidates
// ---------------------------------------------------------------------------

pub fn habitable_zone_stats(ui: &mut Ui, records: &[&PlanetRecord]) {
    let HabitableZoneStats {
        analysed,
        in_zone,
        percentage,
    } = stats::habitable_zone_stats(records);

    ui.strong("Habitable zone stats");
    metric(ui, "Planets in HZ", &in_zone.to_string());
    metric(ui, "Total analysed", &analysed.to_string());
    metric(ui, "HZ percentage", &format!("{percentage:.1}%"));

    ui.separator();
    ui.strong("Habitable zone criteria:");
    ui.label(format!(
        "• Orbital distance: {}–{} AU",
        HZ_DISTANCE_AU.start(),
        HZ_DISTANCE_AU.end()
    ));
    ui.label(format!(
        "• Star temperature: {}–{} K",
        HZ_TEMPERATURE_K.start(),
        HZ_TEMPERATURE_K.end()
    ));

    let top = stats::top_candidates(records, 5);
    if top.is_empty() {
        return;
    }
    ui.separator();
    ui.strong("Top HZ candidates:");
    ui.push_id("top_candidates", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto(), 3)
            .header(ROW_HEIGHT, |mut header| {
                for title in ["Planet", "Radius (R⊕)", "Distance (AU)"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, top.len(), |mut row| {
                    let rec = top[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(rec.identifier.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(Measured(rec.planet_radius_earth).to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(Measured(rec.orbital_distance_au).to_string());
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// AI summary
// ---------------------------------------------------------------------------

pub fn summary_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("AI Summary");

    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_label("Summarize which view?")
            .selected_text(state.summary_target.label())
            .show_ui(ui, |ui: &mut Ui| {
                for target in [SummaryTarget::AllFiltered, SummaryTarget::HabitableOnly] {
                    ui.selectable_value(&mut state.summary_target, target, target.label());
                }
            });

        let can_request = !state.summarizing() && state.dataset.is_some();
        if ui
            .add_enabled(can_request, egui::Button::new("Generate AI summary"))
            .clicked()
        {
            state.request_summary();
        }
        if state.summarizing() {
            ui.spinner();
            ui.label("Generating summary…");
        }
    });

    match &state.summary {
        SummaryState::Idle => {
            ui.label(RichText::new("No summary generated yet.").weak());
        }
        SummaryState::Ready(text) => {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.label(text.as_str());
            });
        }
        SummaryState::Unavailable(notice) => {
            ui.label(RichText::new(notice).color(Color32::YELLOW));
        }
    }
}

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

const RAW_COLUMNS: [&str; 8] = [
    "Planet",
    "Host star",
    "Method",
    "Year",
    "Radius (R⊕)",
    "Mass (M⊕)",
    "Distance (AU)",
    "Star temp (K)",
];

pub fn raw_data_table(ui: &mut Ui, records: &[&PlanetRecord]) {
    egui::CollapsingHeader::new("View raw data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.push_id("raw_data", |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .cell_layout(Layout::left_to_right(Align::Center))
                    .columns(Column::auto().at_least(60.0), RAW_COLUMNS.len())
                    .max_scroll_height(400.0)
                    .header(ROW_HEIGHT + 2.0, |mut header| {
                        for title in RAW_COLUMNS {
                            header.col(|ui: &mut Ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(ROW_HEIGHT, records.len(), |mut row| {
                            let rec = records[row.index()];
                            let cells = [
                                rec.identifier.clone(),
                                rec.host_name.clone().unwrap_or_default(),
                                rec.discovery_method.clone(),
                                rec.discovery_year.to_string(),
                                Measured(rec.planet_radius_earth).to_string(),
                                Measured(rec.planet_mass_earth).to_string(),
                                Measured(rec.orbital_distance_au).to_string(),
                                Measured(rec.host_star_temperature_k).to_string(),
                            ];
                            for cell in cells {
                                row.col(|ui: &mut Ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    });
            });
            ui.label(RichText::new(format!("Showing {} planets", records.len())).weak());
        });
}
