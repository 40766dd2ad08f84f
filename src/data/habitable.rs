use std::ops::RangeInclusive;

use super::filter::optional_in_range;
use super::model::PlanetRecord;

// ---------------------------------------------------------------------------
// Habitable-zone classification
// ---------------------------------------------------------------------------

/// Orbital distance window in AU (inclusive).
pub const HZ_DISTANCE_AU: RangeInclusive<f64> = 0.5..=2.0;

/// Host star temperature window in Kelvin (inclusive).
pub const HZ_TEMPERATURE_K: RangeInclusive<f64> = 3700.0..=7200.0;

/// Simplified habitable-zone test: orbital distance and stellar temperature
/// must both be known and inside their windows.
///
/// Stellar luminosity and spectral type are ignored. A record with either
/// field unknown is classified `false`, which is not a claim that the planet
/// is uninhabitable.
pub fn is_habitable(record: &PlanetRecord) -> bool {
    optional_in_range(record.orbital_distance_au, &HZ_DISTANCE_AU)
        && optional_in_range(record.host_star_temperature_k, &HZ_TEMPERATURE_K)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(distance: Option<f64>, teff: Option<f64>) -> PlanetRecord {
        PlanetRecord {
            orbital_distance_au: distance,
            host_star_temperature_k: teff,
            ..PlanetRecord::new("Kepler-22 b", 2011, "Transit")
        }
    }

    #[test]
    fn inside_both_windows() {
        assert!(is_habitable(&planet(Some(0.85), Some(5518.0))));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(is_habitable(&planet(Some(0.5), Some(7200.0))));
        assert!(is_habitable(&planet(Some(2.0), Some(3700.0))));
    }

    #[test]
    fn just_outside_bounds() {
        assert!(!is_habitable(&planet(Some(0.4999), Some(5000.0))));
        assert!(!is_habitable(&planet(Some(2.0001), Some(5000.0))));
        assert!(!is_habitable(&planet(Some(1.0), Some(3699.9))));
        assert!(!is_habitable(&planet(Some(1.0), Some(7200.1))));
    }

    #[test]
    fn missing_temperature_is_never_habitable() {
        for d in [0.5, 1.0, 2.0, 30.0] {
            assert!(!is_habitable(&planet(Some(d), None)));
        }
    }

    #[test]
    fn missing_distance_is_never_habitable() {
        assert!(!is_habitable(&planet(None, Some(5778.0))));
        assert!(!is_habitable(&planet(None, None)));
    }
}
