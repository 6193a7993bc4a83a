/// Data layer: core types, normalization, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (text cells, located columns)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ normalize   │  parse dates, runs, PA; derive Game Type → GameDataset
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterCriteria predicates → matching games
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
