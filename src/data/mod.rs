/// Data layer: core types, loading, classification, and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (dtypes declared at load time)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  ordered, typed, immutable columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  catalog  │  classify → numeric / categorical / ignored sets,
///   └──────────┘  per-chart eligibility
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  value counts, bins, quartiles, means, correlation
///   └──────────┘
/// ```
pub mod catalog;
pub mod loader;
pub mod model;
pub mod stats;
