use std::collections::{BTreeMap, BTreeSet};

use super::filter::FilterCriteria;
use super::habitable::is_habitable;
use super::model::PlanetRecord;

// ---------------------------------------------------------------------------
// KPI metrics
// ---------------------------------------------------------------------------

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatasetMetrics {
    pub total: usize,
    pub methods: usize,
    pub host_stars: usize,
}

pub fn metrics(records: &[&PlanetRecord]) -> DatasetMetrics {
    let methods: BTreeSet<&str> = records.iter().map(|r| r.discovery_method.as_str()).collect();
    let hosts: BTreeSet<&str> = records.iter().filter_map(|r| r.host_name.as_deref()).collect();
    DatasetMetrics {
        total: records.len(),
        methods: methods.len(),
        host_stars: hosts.len(),
    }
}

// ---------------------------------------------------------------------------
// Discovery timeline
// ---------------------------------------------------------------------------

/// Discoveries per `(year, method)`, ordered by year then method.
pub fn discovery_timeline(records: &[&PlanetRecord]) -> BTreeMap<(i32, String), usize> {
    let mut counts = BTreeMap::new();
    for rec in records {
        *counts
            .entry((rec.discovery_year, rec.discovery_method.clone()))
            .or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Habitable-zone analysis
// ---------------------------------------------------------------------------

/// Temperature window of stars considered in the HZ analysis (K).
pub const ANALYSIS_TEMPERATURE_K: std::ops::RangeInclusive<f64> = 2000.0..=12000.0;

/// Orbits at or beyond this distance (AU) are left out of the HZ analysis.
pub const ANALYSIS_MAX_DISTANCE_AU: f64 = 10.0;

/// Whether a record takes part in the HZ analysis: distance, temperature and
/// radius known, temperature in the analysis window and a close orbit.
pub fn in_hz_analysis(record: &PlanetRecord) -> bool {
    match (
        record.orbital_distance_au,
        record.host_star_temperature_k,
        record.planet_radius_earth,
    ) {
        (Some(d), Some(t), Some(_)) => {
            ANALYSIS_TEMPERATURE_K.contains(&t) && d < ANALYSIS_MAX_DISTANCE_AU
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HabitableZoneStats {
    pub analysed: usize,
    pub in_zone: usize,
    /// Share of analysed planets inside the zone, 0–100.
    pub percentage: f64,
}

/// Whether `record` counts as a habitable-zone candidate: analysable and
/// inside the zone. Shared by the HZ panel and the summary target.
pub fn is_hz_candidate(record: &PlanetRecord) -> bool {
    in_hz_analysis(record) && is_habitable(record)
}

/// Candidates among `records`, in input order.
pub fn habitable_candidates<'a>(records: &[&'a PlanetRecord]) -> Vec<&'a PlanetRecord> {
    records.iter().copied().filter(|r| is_hz_candidate(r)).collect()
}

pub fn habitable_zone_stats(records: &[&PlanetRecord]) -> HabitableZoneStats {
    let analysed: Vec<&&PlanetRecord> = records.iter().filter(|r| in_hz_analysis(r)).collect();
    let in_zone = analysed.iter().filter(|r| is_habitable(r)).count();
    let percentage = if analysed.is_empty() {
        0.0
    } else {
        in_zone as f64 / analysed.len() as f64 * 100.0
    };
    HabitableZoneStats {
        analysed: analysed.len(),
        in_zone,
        percentage,
    }
}

/// The `n` smallest habitable planets with a known radius.
pub fn top_candidates<'a>(records: &[&'a PlanetRecord], n: usize) -> Vec<&'a PlanetRecord> {
    let mut candidates = habitable_candidates(records);
    candidates.sort_by(|a, b| {
        let ra = a.planet_radius_earth.unwrap_or(f64::INFINITY);
        let rb = b.planet_radius_earth.unwrap_or(f64::INFINITY);
        ra.total_cmp(&rb)
    });
    candidates.truncate(n);
    candidates
}

// ---------------------------------------------------------------------------
// Summary statistics (AI prompt input)
// ---------------------------------------------------------------------------

/// Aggregate numbers describing a working subset for the summary prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total_planets: usize,
    pub year_range: String,
    /// Most frequent methods, descending count, ties by name.
    pub top_methods: Vec<(String, usize)>,
    pub avg_radius: Option<f64>,
    pub avg_distance: Option<f64>,
    pub habitable_zone_count: usize,
    pub method_filter: String,
    pub habitable_only: bool,
}

impl SummaryStats {
    /// Build statistics for `target`.
    ///
    /// `habitable_zone_count` comes from the caller because it always refers
    /// to the full filtered view, even when `target` is the HZ subset.
    pub fn compute(
        target: &[&PlanetRecord],
        criteria: &FilterCriteria,
        habitable_zone_count: usize,
    ) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for rec in target {
            *counts.entry(rec.discovery_method.as_str()).or_insert(0) += 1;
        }
        let mut top_methods: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(m, c)| (m.to_string(), c))
            .collect();
        top_methods.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_methods.truncate(3);

        let year_range = match &criteria.year_range {
            Some(r) => format!("{}–{}", r.start(), r.end()),
            None => "all years".to_string(),
        };
        let method_filter = if criteria.discovery_methods.is_empty() {
            "All".to_string()
        } else {
            criteria
                .discovery_methods
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        SummaryStats {
            total_planets: target.len(),
            year_range,
            top_methods,
            avg_radius: mean(target.iter().filter_map(|r| r.planet_radius_earth)),
            avg_distance: mean(target.iter().filter_map(|r| r.orbital_distance_au)),
            habitable_zone_count,
            method_filter,
            habitable_only: criteria.habitable_only,
        }
    }
}

/// Mean of known values rounded to two decimals, `None` when there are none.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| (sum / n as f64 * 100.0).round() / 100.0)
}
