/// Data layer: core types, loading, derivation, filtering and binning.
///
/// Architecture:
/// ```text
///  .csv / .dat / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ParticleTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  kinematics   │  pT, y, φ per particle → SpeciesBucket ×3
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  |y| < ymax → midrapidity pT
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ histogram  │  fixed / auto bin edges → Histogram
///   └───────────┘
/// ```

pub mod error;
pub mod filter;
pub mod histogram;
pub mod kinematics;
pub mod loader;
pub mod model;
