use std::time::Duration;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{charts, panels, sections};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExoplanetApp {
    pub state: AppState,
}

impl ExoplanetApp {
    /// Create the app and start the first archive fetch.
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        state.request_refresh();
        Self { state }
    }
}

impl eframe::App for ExoplanetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_jobs();
        if self.state.loading() || self.state.summarizing() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: toolbar ----
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

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Exoplanet Explorer");
    ui.label(RichText::new("NASA Exoplanet Archive data, interactive charts and an AI summary").weak());
    ui.separator();

    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading() {
                ui.heading("Fetching exoplanet data from NASA…");
            } else {
                ui.heading("No data loaded. Press Refresh to try again.");
            }
        });
        return;
    }

    // The view borrows the state; render everything read-only first.
    {
        let records = state.visible_records();
        let color_map = state.color_map.as_ref();

        sections::kpi_row(ui, state, &records);
        ui.separator();

        if records.is_empty() {
            ui.label(RichText::new("No planets match this selection.").strong());
        } else {
            ui.heading("Timeline of exoplanet discoveries");
            charts::timeline_chart(ui, &records, color_map);
            ui.separator();

            ui.heading("Planet size vs. distance from star");
            charts::size_distance_chart(ui, &records, color_map);
            ui.separator();

            ui.heading("Habitable zone analysis");
            ui.columns(2, |cols: &mut [Ui]| {
                charts::habitable_zone_chart(&mut cols[0], &records);
                sections::habitable_zone_stats(&mut cols[1], &records);
            });
        }
        ui.separator();
    }

    sections::summary_section(ui, state);
    ui.separator();

    let records = state.visible_records();
    sections::raw_data_table(ui, &records);
}
