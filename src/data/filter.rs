use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::habitable::is_habitable;
use super::model::{Dataset, PlanetRecord};

// ---------------------------------------------------------------------------
// Filter criteria: user-selected predicates over the dataset
// ---------------------------------------------------------------------------

/// Predicate configuration narrowing a [`Dataset`] to a working subset.
///
/// The default value applies no restriction at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Accepted discovery methods. Empty means "no restriction".
    pub discovery_methods: BTreeSet<String>,
    /// Inclusive discovery-year bound.
    pub year_range: Option<RangeInclusive<i32>>,
    /// Inclusive planet-radius bound in Earth radii. Records with unknown
    /// radius never pass an active bound.
    pub radius_range: Option<RangeInclusive<f64>>,
    pub habitable_only: bool,
}

/// First discovery year selected by default.
pub const DEFAULT_FIRST_YEAR: i32 = 2000;

impl FilterCriteria {
    /// Criteria a fresh dataset starts with: years from
    /// [`DEFAULT_FIRST_YEAR`] (clamped to the dataset) to the latest year, and
    /// a radius bound of 0–10 Earth radii.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        FilterCriteria {
            discovery_methods: BTreeSet::new(),
            year_range: dataset
                .year_bounds
                .map(|(lo, hi)| DEFAULT_FIRST_YEAR.clamp(lo, hi)..=hi),
            radius_range: Some(0.0..=10.0),
            habitable_only: false,
        }
    }

    /// Whether a single record passes every active predicate.
    pub fn matches(&self, record: &PlanetRecord) -> bool {
        (self.discovery_methods.is_empty()
            || self.discovery_methods.contains(&record.discovery_method))
            && self
                .year_range
                .as_ref()
                .map_or(true, |r| r.contains(&record.discovery_year))
            && self
                .radius_range
                .as_ref()
                .map_or(true, |r| optional_in_range(record.planet_radius_earth, r))
            && (!self.habitable_only || is_habitable(record))
    }

    /// Human-readable description of the active predicates.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();

        if self.discovery_methods.is_empty() {
            parts.push("methods: all".to_string());
        } else {
            let names: Vec<&str> = self.discovery_methods.iter().map(String::as_str).collect();
            parts.push(format!("methods: {}", names.join(", ")));
        }
        match &self.year_range {
            Some(r) => parts.push(format!("years: {}–{}", r.start(), r.end())),
            None => parts.push("years: all".to_string()),
        }
        if let Some(r) = &self.radius_range {
            parts.push(format!("radius: {:.1}–{:.1} R⊕", r.start(), r.end()));
        }
        if self.habitable_only {
            parts.push("habitable zone only".to_string());
        }
        parts.join("; ")
    }
}

/// `true` when the value is known and inside the inclusive range.
///
/// Unknown values never pass, so "not measured" is not confused with
/// "measured and in range".
pub fn optional_in_range(value: Option<f64>, range: &RangeInclusive<f64>) -> bool {
    value.is_some_and(|v| range.contains(&v))
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active filters, in dataset order.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Records of `dataset` passing `criteria`, preserving order.
pub fn filter_dataset<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> Vec<&'a PlanetRecord> {
    filter_records(dataset.records(), criteria)
}

/// Filter any ordered sequence of records, preserving order.
pub fn filter_records<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a PlanetRecord>
where
    I: IntoIterator<Item = &'a PlanetRecord>,
{
    records.into_iter().filter(|r| criteria.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(
        name: &str,
        year: i32,
        method: &str,
        radius: Option<f64>,
        distance: Option<f64>,
        teff: Option<f64>,
    ) -> PlanetRecord {
        PlanetRecord {
            planet_radius_earth: radius,
            orbital_distance_au: distance,
            host_star_temperature_k: teff,
            ..PlanetRecord::new(name, year, method)
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            planet("51 Peg b", 1995, "Radial Velocity", None, Some(0.05), Some(5768.0)),
            planet("Kepler-22 b", 2011, "Transit", Some(2.1), Some(0.85), Some(5518.0)),
            planet("HR 8799 b", 2008, "Imaging", Some(13.0), Some(68.0), Some(7430.0)),
            planet("TRAPPIST-1 e", 2017, "Transit", Some(0.92), Some(0.029), Some(2566.0)),
            planet("Kepler-452 b", 2015, "Transit", Some(1.63), Some(1.046), Some(5757.0)),
            planet("OGLE-2005-BLG-390L b", 2005, "Microlensing", None, Some(2.6), None),
            planet("Kepler-62 f", 2013, "Transit", Some(1.41), Some(0.718), Some(4925.0)),
        ])
        .0
    }

    fn names(records: &[&PlanetRecord]) -> Vec<String> {
        records.iter().map(|r| r.identifier.clone()).collect()
    }

    #[test]
    fn default_criteria_keep_everything() {
        let ds = sample();
        let out = filter_dataset(&ds, &FilterCriteria::default());
        assert_eq!(out.len(), ds.len());
    }

    #[test]
    fn result_is_ordered_subsequence() {
        let ds = sample();
        let criteria = FilterCriteria {
            discovery_methods: ["Transit".to_string()].into(),
            ..Default::default()
        };

        let idx = filtered_indices(&ds, &criteria);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            names(&filter_dataset(&ds, &criteria)),
            vec!["Kepler-22 b", "TRAPPIST-1 e", "Kepler-452 b", "Kepler-62 f"]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample();
        let criteria = FilterCriteria {
            year_range: Some(2005..=2015),
            radius_range: Some(1.0..=3.0),
            habitable_only: true,
            ..Default::default()
        };

        let once = filter_dataset(&ds, &criteria);
        let twice = filter_records(once.iter().copied(), &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn single_year_range_selects_exact_year() {
        let ds = sample();
        let criteria = FilterCriteria {
            year_range: Some(2011..=2011),
            ..Default::default()
        };
        let out = filter_dataset(&ds, &criteria);
        assert_eq!(names(&out), vec!["Kepler-22 b"]);
        assert!(out.iter().all(|r| r.discovery_year == 2011));
    }

    #[test]
    fn empty_method_set_means_no_restriction() {
        let ds = sample();
        let with_empty = FilterCriteria {
            discovery_methods: BTreeSet::new(),
            year_range: Some(2000..=2020),
            ..Default::default()
        };
        let without = FilterCriteria {
            year_range: Some(2000..=2020),
            ..Default::default()
        };
        assert_eq!(filter_dataset(&ds, &with_empty), filter_dataset(&ds, &without));
    }

    #[test]
    fn active_radius_bound_excludes_unknown_radius() {
        let ds = sample();
        let criteria = FilterCriteria {
            radius_range: Some(0.0..=100.0),
            ..Default::default()
        };
        let out = filter_dataset(&ds, &criteria);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|r| r.planet_radius_earth.is_some()));
    }

    #[test]
    fn radius_bounds_are_inclusive() {
        let ds = sample();
        let criteria = FilterCriteria {
            radius_range: Some(1.41..=2.1),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_dataset(&ds, &criteria)),
            vec!["Kepler-22 b", "Kepler-452 b", "Kepler-62 f"]
        );
    }

    #[test]
    fn habitable_only_applies_zone_predicate() {
        let ds = sample();
        let criteria = FilterCriteria {
            habitable_only: true,
            ..Default::default()
        };
        assert_eq!(
            names(&filter_dataset(&ds, &criteria)),
            vec!["Kepler-22 b", "Kepler-452 b", "Kepler-62 f"]
        );
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let ds = sample();
        let criteria = FilterCriteria {
            discovery_methods: ["Astrometry".to_string()].into(),
            ..Default::default()
        };
        assert!(filter_dataset(&ds, &criteria).is_empty());
    }

    #[test]
    fn empty_dataset_filters_to_empty() {
        let (ds, _) = Dataset::from_records(Vec::new());
        let criteria = FilterCriteria {
            discovery_methods: ["Transit".to_string()].into(),
            year_range: Some(1990..=2030),
            radius_range: Some(0.0..=5.0),
            habitable_only: true,
        };
        assert!(filter_dataset(&ds, &criteria).is_empty());
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn for_dataset_starts_at_2000() {
        let ds = sample();
        let criteria = FilterCriteria::for_dataset(&ds);
        assert_eq!(criteria.year_range, Some(2000..=2017));
        assert_eq!(criteria.radius_range, Some(0.0..=10.0));
        assert!(criteria.discovery_methods.is_empty());
    }

    #[test]
    fn default_first_year_is_clamped_to_dataset() {
        let late = Dataset::from_records(vec![
            PlanetRecord::new("a", 2009, "Transit"),
            PlanetRecord::new("b", 2014, "Transit"),
        ])
        .0;
        assert_eq!(FilterCriteria::for_dataset(&late).year_range, Some(2009..=2014));

        let early = Dataset::from_records(vec![PlanetRecord::new("c", 1992, "Pulsar Timing")]).0;
        assert_eq!(FilterCriteria::for_dataset(&early).year_range, Some(1992..=1992));
    }

    #[test]
    fn describe_lists_active_predicates() {
        let criteria = FilterCriteria {
            discovery_methods: ["Imaging".to_string(), "Transit".to_string()].into(),
            year_range: Some(2000..=2024),
            radius_range: None,
            habitable_only: true,
        };
        assert_eq!(
            criteria.describe(),
            "methods: Imaging, Transit; years: 2000–2024; habitable zone only"
        );
    }

    #[test]
    fn optional_in_range_rejects_unknown() {
        assert!(!optional_in_range(None, &(0.0..=1.0)));
        assert!(optional_in_range(Some(1.0), &(0.0..=1.0)));
        assert!(!optional_in_range(Some(1.5), &(0.0..=1.0)));
    }
}
