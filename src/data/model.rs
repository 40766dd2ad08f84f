use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// PlanetRecord – one row of the confirmed-planets table
// ---------------------------------------------------------------------------

/// A single confirmed exoplanet (one row of the archive result).
///
/// Optional numeric fields are `None` when the archive has no measurement.
/// They are never defaulted to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetRecord {
    /// Planet name, unique within a dataset.
    pub identifier: String,
    pub discovery_year: i32,
    /// Discovery method as reported upstream (open set).
    pub discovery_method: String,
    /// Semi-major axis in AU.
    pub orbital_distance_au: Option<f64>,
    /// Planet radius in Earth radii.
    pub planet_radius_earth: Option<f64>,
    /// Host star effective temperature in Kelvin.
    pub host_star_temperature_k: Option<f64>,
    pub host_name: Option<String>,
    /// Planet mass in Earth masses.
    pub planet_mass_earth: Option<f64>,
    /// Distance of the system from Earth in parsecs.
    pub system_distance_pc: Option<f64>,
    /// Host star radius in solar radii.
    pub star_radius_solar: Option<f64>,
}

impl PlanetRecord {
    /// Record with only the required columns known.
    pub fn new(identifier: &str, discovery_year: i32, discovery_method: &str) -> Self {
        PlanetRecord {
            identifier: identifier.to_string(),
            discovery_year,
            discovery_method: discovery_method.to_string(),
            orbital_distance_au: None,
            planet_radius_earth: None,
            host_star_temperature_k: None,
            host_name: None,
            planet_mass_earth: None,
            system_distance_pc: None,
            star_radius_solar: None,
        }
    }
}

/// Formats an optional measurement, `N/A` when unknown.
pub struct Measured(pub Option<f64>);

impl fmt::Display for Measured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.2}"),
            None => write!(f, "N/A"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the normalized snapshot of one fetch
// ---------------------------------------------------------------------------

/// The full normalized dataset with pre-computed indices.
///
/// Immutable once built: filtering produces new views, never edits in place.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<PlanetRecord>,
    /// Sorted set of discovery methods present.
    pub methods: BTreeSet<String>,
    /// Smallest and largest discovery year, `None` for an empty dataset.
    pub year_bounds: Option<(i32, i32)>,
    /// Largest known planet radius.
    pub max_radius: Option<f64>,
}

impl Dataset {
    /// Build indices from normalized records.
    ///
    /// Records sharing an identifier are dropped after the first occurrence;
    /// the number dropped is returned alongside the dataset.
    pub fn from_records(records: Vec<PlanetRecord>) -> (Self, usize) {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut kept = Vec::with_capacity(records.len());
        let mut duplicates = 0;

        for rec in records {
            if seen.insert(rec.identifier.clone()) {
                kept.push(rec);
            } else {
                duplicates += 1;
            }
        }

        let methods = kept.iter().map(|r| r.discovery_method.clone()).collect();
        let year_bounds = kept.iter().fold(None, |acc, r| match acc {
            None => Some((r.discovery_year, r.discovery_year)),
            Some((lo, hi)) => Some((lo.min(r.discovery_year), hi.max(r.discovery_year))),
        });
        let max_radius = kept
            .iter()
            .filter_map(|r| r.planet_radius_earth)
            .reduce(f64::max);

        let dataset = Dataset {
            records: kept,
            methods,
            year_bounds,
            max_radius,
        };
        (dataset, duplicates)
    }

    /// All records in archive order.
    pub fn records(&self) -> &[PlanetRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per discovery method.
    pub fn method_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for rec in &self.records {
            *counts.entry(rec.discovery_method.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(name: &str, year: i32, method: &str, radius: Option<f64>) -> PlanetRecord {
        PlanetRecord {
            planet_radius_earth: radius,
            ..PlanetRecord::new(name, year, method)
        }
    }

    #[test]
    fn from_records_keeps_first_duplicate() {
        let (ds, dups) = Dataset::from_records(vec![
            planet("a b", 2001, "Transit", Some(1.0)),
            planet("c d", 1995, "Radial Velocity", None),
            planet("a b", 2020, "Imaging", Some(9.0)),
        ]);

        assert_eq!(dups, 1);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].discovery_year, 2001);
        assert_eq!(ds.records()[1].identifier, "c d");
    }

    #[test]
    fn indices_cover_records() {
        let (ds, _) = Dataset::from_records(vec![
            planet("x", 2010, "Transit", Some(2.5)),
            planet("y", 1999, "Radial Velocity", None),
            planet("z", 2016, "Transit", Some(11.2)),
        ]);

        assert_eq!(ds.year_bounds, Some((1999, 2016)));
        assert_eq!(ds.max_radius, Some(11.2));
        assert_eq!(
            ds.methods.iter().cloned().collect::<Vec<_>>(),
            vec!["Radial Velocity".to_string(), "Transit".to_string()]
        );
        assert_eq!(ds.method_counts().get("Transit"), Some(&2));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let (ds, dups) = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(dups, 0);
        assert_eq!(ds.year_bounds, None);
        assert_eq!(ds.max_radius, None);
    }

    #[test]
    fn measured_prints_na_for_unknown() {
        assert_eq!(Measured(None).to_string(), "N/A");
        assert_eq!(Measured(Some(1.234)).to_string(), "1.23");
    }
}
