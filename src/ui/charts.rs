use std::collections::BTreeSet;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotPoints, Points, Polygon};

use crate::color::ColorMap;
use crate::data::habitable::{is_habitable, HZ_DISTANCE_AU, HZ_TEMPERATURE_K};
use crate::data::model::PlanetRecord;
use crate::data::stats::{self, ANALYSIS_MAX_DISTANCE_AU, ANALYSIS_TEMPERATURE_K};

const CHART_HEIGHT: f32 = 300.0;

/// Conservative solar habitable zone (AU) drawn on the size/distance chart.
const SOLAR_HZ_AU: (f64, f64) = (0.95, 1.37);

fn method_color(color_map: Option<&ColorMap>, method: &str) -> Color32 {
    color_map
        .map(|cm| cm.color_for(method))
        .unwrap_or(Color32::LIGHT_BLUE)
}

fn methods_in(records: &[&PlanetRecord]) -> BTreeSet<String> {
    records.iter().map(|r| r.discovery_method.clone()).collect()
}

/// Corners of an axis-aligned rectangle.
fn band(x: (f64, f64), y: (f64, f64)) -> Vec<[f64; 2]> {
    vec![[x.0, y.0], [x.1, y.0], [x.1, y.1], [x.0, y.1]]
}

// ---------------------------------------------------------------------------
// Discovery timeline (stacked bars per method)
// ---------------------------------------------------------------------------

pub fn timeline_chart(ui: &mut Ui, records: &[&PlanetRecord], color_map: Option<&ColorMap>) {
    let timeline = stats::discovery_timeline(records);

    let mut charts: Vec<BarChart> = Vec::new();
    for method in methods_in(records) {
        let bars: Vec<Bar> = timeline
            .iter()
            .filter(|((_, m), _)| *m == method)
            .map(|((year, _), count)| Bar::new(*year as f64, *count as f64).width(0.9))
            .collect();

        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&method)
            .color(method_color(color_map, &method))
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new("timeline_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Planets discovered")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Planet size vs. orbital distance
// ---------------------------------------------------------------------------

pub fn size_distance_chart(ui: &mut Ui, records: &[&PlanetRecord], color_map: Option<&ColorMap>) {
    let methods = methods_in(records);

    Plot::new("size_distance_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Orbital distance (AU)")
        .y_axis_label("Planet radius (Earth radii)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.polygon(
                Polygon::new(band(SOLAR_HZ_AU, (0.0, 25.0)))
                    .name("Habitable zone")
                    .fill_color(Color32::from_rgba_unmultiplied(0, 200, 0, 20))
                    .stroke(Stroke::NONE),
            );

            for method in &methods {
                let points: PlotPoints = records
                    .iter()
                    .filter(|r| r.discovery_method == *method)
                    .filter_map(|r| match (r.orbital_distance_au, r.planet_radius_earth) {
                        (Some(d), Some(rad)) if d < 10.0 && rad < 25.0 => Some([d, rad]),
                        _ => None,
                    })
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(method)
                        .color(method_color(color_map, method))
                        .shape(MarkerShape::Circle)
                        .radius(2.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Habitable-zone map: stellar temperature vs. orbital distance
// ---------------------------------------------------------------------------

pub fn habitable_zone_chart(ui: &mut Ui, records: &[&PlanetRecord]) {
    let (inside, outside): (Vec<&PlanetRecord>, Vec<&PlanetRecord>) = records
        .iter()
        .copied()
        .filter(|r| stats::in_hz_analysis(r))
        .partition(|r| is_habitable(r));

    let to_points = |recs: &[&PlanetRecord]| {
        recs.iter()
            .filter_map(|r| Some([r.orbital_distance_au?, r.host_star_temperature_k?]))
            .collect::<PlotPoints>()
    };

    Plot::new("habitable_zone_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Orbital distance (AU)")
        .y_axis_label("Star temperature (K)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.polygon(
                Polygon::new(band(
                    (*HZ_DISTANCE_AU.start(), *HZ_DISTANCE_AU.end()),
                    (*ANALYSIS_TEMPERATURE_K.start(), *ANALYSIS_TEMPERATURE_K.end()),
                ))
                .fill_color(Color32::from_rgba_unmultiplied(0, 200, 0, 16))
                .stroke(Stroke::NONE),
            );
            plot_ui.polygon(
                Polygon::new(band(
                    (0.0, ANALYSIS_MAX_DISTANCE_AU),
                    (*HZ_TEMPERATURE_K.start(), *HZ_TEMPERATURE_K.end()),
                ))
                .fill_color(Color32::from_rgba_unmultiplied(220, 220, 0, 10))
                .stroke(Stroke::NONE),
            );

            plot_ui.points(
                Points::new(to_points(&outside[..]))
                    .name("Outside HZ")
                    .color(Color32::from_rgb(70, 130, 180))
                    .radius(2.0),
            );
            plot_ui.points(
                Points::new(to_points(&inside[..]))
                    .name("In habitable zone")
                    .color(Color32::from_rgb(50, 205, 50))
                    .shape(MarkerShape::Asterisk)
                    .radius(5.0),
            );
        });
}
