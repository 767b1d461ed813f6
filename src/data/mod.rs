/// Data layer: core types, loading, facets, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json   (file or http)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse first sheet → Vec<SupplierRecord>
///   └──────────┘
///        │
///        ├──────────────► facets   distinct industries, "All" first
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria predicates → visible records
///   └──────────┘
///        ▲
///        │
///   ┌──────────┐
///   │  query    │  "/suppliers?industry=…&location=…&experience=…"
///   └──────────┘
/// ```

pub mod facets;
pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
