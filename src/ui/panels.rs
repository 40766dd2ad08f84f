use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::habitable::{HZ_DISTANCE_AU, HZ_TEMPERATURE_K};
use crate::state::AppState;

/// Upper end of the radius sliders (Earth radii).
const RADIUS_SLIDER_CAP: f64 = 30.0;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Copy what we need so we can mutate state inside the scroll area.
    let counts: Vec<(String, usize)> = dataset
        .method_counts()
        .into_iter()
        .map(|(m, c)| (m.to_string(), c))
        .collect();
    let (min_year, max_year) = dataset.year_bounds.unwrap_or((0, 0));
    let radius_cap = dataset
        .max_radius
        .unwrap_or(RADIUS_SLIDER_CAP)
        .min(RADIUS_SLIDER_CAP);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Discovery method ----
            ui.horizontal(|ui: &mut Ui| {
                ui.strong("Discovery method");
                if ui.small_button("All").clicked() {
                    state.select_all_methods();
                }
            });
            let toggleable = state.methods_toggleable();
            for (method, count) in &counts {
                let mut checked = state.method_selected(method);
                let mut text = RichText::new(format!("{method}  ({count})"));
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(method));
                }
                if ui
                    .add_enabled(toggleable, egui::Checkbox::new(&mut checked, text))
                    .changed()
                {
                    state.toggle_method(method);
                }
            }
            ui.separator();

            // ---- Discovery year ----
            ui.strong("Discovery year");
            let (mut from, mut to) = state
                .criteria
                .year_range
                .as_ref()
                .map(|r| (*r.start(), *r.end()))
                .unwrap_or((min_year, max_year));
            let from_changed = ui
                .add(egui::Slider::new(&mut from, min_year..=max_year).text("from"))
                .changed();
            let to_changed = ui
                .add(egui::Slider::new(&mut to, min_year..=max_year).text("to"))
                .changed();
            if from_changed || to_changed {
                // Keep the range ordered: the slider that moved pushes the other.
                if from > to {
                    if from_changed {
                        to = from;
                    } else {
                        from = to;
                    }
                }
                state.criteria.year_range = Some(from..=to);
                state.refilter();
            }
            ui.separator();

            // ---- Planet radius ----
            ui.strong("Planet radius (Earth radii)");
            let mut limit = state.criteria.radius_range.is_some();
            if ui.checkbox(&mut limit, "Limit radius").changed() {
                state.criteria.radius_range = limit.then_some(0.0..=radius_cap.min(10.0));
                state.refilter();
            }
            if let Some(range) = state.criteria.radius_range.clone() {
                let (mut lo, mut hi) = range.into_inner();
                let lo_changed = ui
                    .add(egui::Slider::new(&mut lo, 0.0..=radius_cap).text("min"))
                    .changed();
                let hi_changed = ui
                    .add(egui::Slider::new(&mut hi, 0.0..=radius_cap).text("max"))
                    .changed();
                if lo_changed || hi_changed {
                    if lo > hi {
                        if lo_changed {
                            hi = lo;
                        } else {
                            lo = hi;
                        }
                    }
                    state.criteria.radius_range = Some(lo..=hi);
                    state.refilter();
                }
                ui.label(RichText::new("Planets with unknown radius are hidden.").weak());
            }
            ui.separator();

            // ---- Habitable zone ----
            if ui
                .checkbox(&mut state.criteria.habitable_only, "Habitable zone only")
                .changed()
            {
                state.refilter();
            }
            ui.label(
                RichText::new(format!(
                    "{}–{} AU, {}–{} K star",
                    HZ_DISTANCE_AU.start(),
                    HZ_DISTANCE_AU.end(),
                    HZ_TEMPERATURE_K.start(),
                    HZ_TEMPERATURE_K.end()
                ))
                .weak(),
            );
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.add_space(8.0);
            ui.label(RichText::new("Data source: NASA Exoplanet Archive").weak());
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        if ui
            .add_enabled(!state.loading(), egui::Button::new("⟳ Refresh"))
            .clicked()
        {
            state.request_refresh();
        }
        if state.loading() {
            ui.spinner();
            ui.label("Fetching exoplanet data from NASA…");
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} planets loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }
        if let Some(report) = &state.report {
            let skipped = report.malformed + report.duplicates;
            if skipped > 0 {
                ui.label(RichText::new(format!("({skipped} rows skipped)")).weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
