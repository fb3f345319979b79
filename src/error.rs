use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// Error – every failure the pipeline can report
// ---------------------------------------------------------------------------

/// Loading one specimen is atomic: any variant raised while reading its
/// files aborts the whole generation run and names the specimen involved.
#[derive(Debug, Error)]
pub enum Error {
    /// No file starting with the method prefix exists in the specimen's
    /// data directory.
    #[error("specimen '{specimen}': no file starting with '{prefix}' under {}", .dir.display())]
    SpecimenFileNotFound {
        specimen: String,
        prefix: String,
        dir: PathBuf,
    },

    /// The result filename does not follow `<prefix>_<vol>_<surf>_s<a>_e<b>_…`.
    #[error("specimen '{specimen}': cannot parse metadata from '{file}': {reason}")]
    MetadataParse {
        specimen: String,
        file: String,
        reason: String,
    },

    /// The measurement table is missing a column, empty, or holds a
    /// non-numeric cell.
    #[error("specimen '{specimen}': bad measurement table '{file}': {reason}")]
    MeasurementParse {
        specimen: String,
        file: String,
        reason: String,
    },

    /// A metadata field is unusable for the requested operation
    /// (e.g. zero volume while area normalization is enabled).
    #[error("specimen '{specimen}': {field}")]
    MetadataMissing { specimen: String, field: String },

    /// The measurement series of one specimen differ in length.
    #[error(
        "specimen '{specimen}': series lengths differ \
         (area {area}, perimeter {perimeter}, width {width}, height {height})"
    )]
    SeriesLengthMismatch {
        specimen: String,
        area: usize,
        perimeter: usize,
        width: usize,
        height: usize,
    },

    /// Sequence export found specimens with different slice counts.
    #[error("metric '{metric}': specimen '{label}' has {got} slices, expected {expected}")]
    ShapeMismatch {
        metric: String,
        label: String,
        expected: usize,
        got: usize,
    },

    /// Metric name outside the supported set.
    #[error(
        "unsupported metric '{0}' (expected one of: Area, Circularity, Perimeter, \
         Volume, Surface, Width, Height, Length)"
    )]
    UnsupportedMetric(String),

    /// Failure producing an output artifact.
    #[error("writing {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Filesystem error with the offending path attached.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// PDF composition failure.
    #[error("pdf: {0}")]
    Pdf(#[from] printpdf::Error),

    /// Chart rasterization failure.
    #[error("chart: {0}")]
    Chart(String),
}

impl Error {
    /// Helper for wrapping `io::Error` with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
