//! Data layer: specimen model and result-file loading.
//!
//! Architecture:
//! ```text
//!  {"class": ["f1", "f2", …]}     input_root/<name>/statistics_*.csv
//!        │                                 │
//!        └────────────┬────────────────────┘
//!                     ▼
//!               ┌──────────┐
//!               │  loader   │  discover file → filename metadata + ;-table
//!               └──────────┘
//!                     │
//!                     ▼
//!               ┌──────────┐
//!               │ Specimen  │  immutable, area normalized by volume
//!               └──────────┘
//!                     │
//!                     ▼
//!               ┌──────────┐
//!               │ exporters │  per-metric CSVs / PDF report
//!               └──────────┘
//! ```

pub mod loader;
pub mod model;
