/// Data layer: archive access, normalized model, filtering and statistics.
///
/// Architecture:
/// ```text
///  NASA Exoplanet Archive (TAP sync, CSV)
///        │
///        ▼
///   ┌──────────┐
///   │ archive   │  ADQL query → HTTP → normalize → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<PlanetRecord>, method / year indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ filter    │  FilterCriteria (+ habitable) → visible records
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ stats     │  KPIs, timeline, HZ analysis, summary input
///   └──────────┘
/// ```

pub mod archive;
pub mod filter;
pub mod habitable;
pub mod model;
pub mod stats;
