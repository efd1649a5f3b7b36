/// Data layer: core types, loading, validation and result filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (named numeric columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  Table → Series (label, strictly increasing x)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ validate  │  integrity checks → Vec<Issue>
///   └──────────┘
/// ```
///
/// `writer` is the inverse of `loader` for CSV and Parquet; `filter` selects
/// which classified test points the viewer shows.

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod validate;
pub mod writer;
