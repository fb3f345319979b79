//! Output backends: per-metric CSV spreadsheets, chart rasters, and the
//! combined PDF report.

pub mod chart;
pub mod report;
pub mod spreadsheet;
