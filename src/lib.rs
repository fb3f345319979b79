pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod glossary;

pub use config::{ClassConfig, ClassGroup};
pub use data::loader::{load_specimens, LoadOptions};
pub use data::model::{Metric, MetricValue, Specimen};
pub use error::{Error, Result};
