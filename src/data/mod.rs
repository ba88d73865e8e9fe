/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordTable (normalized columns, cached)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordTable  │  Vec<Row>, column index, unique values
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply value-set predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ insights  │  counts, rate, groupings, trend, correlation
///   └──────────┘
/// ```
///
/// `pipeline::run_pipeline` ties filter and insights together as one pure
/// function; `export` serializes a view back to CSV.

pub mod export;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod model;
pub mod pipeline;
