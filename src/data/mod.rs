/// Data layer: raw grids, loading, extraction and alignment.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawDataset (header, units, data rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  extract  │  asciitime → TimeSeries, named column → VariableSeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  align    │  overlay / sort / legend prefix, per (dataset, variable)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  pack     │  NaN-padded rectangular X / Y matrices
///   └──────────┘
/// ```

pub mod align;
pub mod catalog;
pub mod extract;
pub mod loader;
pub mod model;
pub mod pack;
pub mod timestamp;
