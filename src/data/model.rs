use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Metric – the closed set of exportable quantities
// ---------------------------------------------------------------------------

/// A derived quantity computed from a specimen's raw measurements.
///
/// Scalar metrics yield one value per specimen; sequence metrics yield one
/// value per cross-section slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Area,
    Circularity,
    Perimeter,
    Volume,
    Surface,
    Width,
    Height,
    Length,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Area,
        Metric::Circularity,
        Metric::Perimeter,
        Metric::Volume,
        Metric::Surface,
        Metric::Width,
        Metric::Height,
        Metric::Length,
    ];

    /// Canonical display name, also used for output filenames.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Area => "Area",
            Metric::Circularity => "Circularity",
            Metric::Perimeter => "Perimeter",
            Metric::Volume => "Volume",
            Metric::Surface => "Surface",
            Metric::Width => "Width",
            Metric::Height => "Height",
            Metric::Length => "Length",
        }
    }

    /// Whether the metric is a per-slice sequence (as opposed to a scalar).
    pub fn is_series(&self) -> bool {
        matches!(self, Metric::Area | Metric::Circularity | Metric::Perimeter)
    }

    /// Parse a list of metric names, keeping the first occurrence of each
    /// metric and warning about repeats.
    pub fn parse_list(names: &[String]) -> Result<Vec<Metric>> {
        let mut metrics = Vec::with_capacity(names.len());
        for name in names {
            let metric: Metric = name.parse()?;
            if metrics.contains(&metric) {
                log::warn!("metric '{name}' requested more than once, keeping the first");
            } else {
                metrics.push(metric);
            }
        }
        Ok(metrics)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    /// Case-insensitive: `area`, `AREA` and `Area` all parse.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "area" => Ok(Metric::Area),
            "circularity" => Ok(Metric::Circularity),
            "perimeter" => Ok(Metric::Perimeter),
            "volume" => Ok(Metric::Volume),
            "surface" => Ok(Metric::Surface),
            "width" => Ok(Metric::Width),
            "height" => Ok(Metric::Height),
            "length" => Ok(Metric::Length),
            _ => Err(Error::UnsupportedMetric(s.to_string())),
        }
    }
}

/// The value of one metric for one specimen.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Scalar(f64),
    Series(Vec<f64>),
}

// ---------------------------------------------------------------------------
// SliceTable – raw measurement columns straight out of a result file
// ---------------------------------------------------------------------------

/// The four per-slice measurement columns of a result file, un-normalized,
/// in file row order.  Handed from the loader to `Specimen::new`.
#[derive(Debug, Clone, Default)]
pub struct SliceTable {
    pub area: Vec<f64>,
    pub perimeter: Vec<f64>,
    pub width: Vec<f64>,
    pub height: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Specimen – one biological sample, immutable once constructed
// ---------------------------------------------------------------------------

/// One specimen with filename-derived metadata and per-slice measurement
/// series.  The area series is volume-normalized at construction when
/// normalization is enabled; no field changes afterwards.
#[derive(Debug, Clone)]
pub struct Specimen {
    label: String,
    class_label: String,
    volume: f64,
    surface: f64,
    length: f64,
    area: Vec<f64>,
    perimeter: Vec<f64>,
    width: Vec<f64>,
    height: Vec<f64>,
}

impl Specimen {
    /// Validate the measurement table and build the specimen.
    ///
    /// With `normalize` set, every area value is divided by `volume`; a zero
    /// volume is then rejected so the division can never blow up.
    pub fn new(
        label: impl Into<String>,
        class_label: impl Into<String>,
        volume: f64,
        surface: f64,
        length: f64,
        table: SliceTable,
        normalize: bool,
    ) -> Result<Self> {
        let label = label.into();

        let n = table.area.len();
        if table.perimeter.len() != n || table.width.len() != n || table.height.len() != n {
            return Err(Error::SeriesLengthMismatch {
                specimen: label,
                area: table.area.len(),
                perimeter: table.perimeter.len(),
                width: table.width.len(),
                height: table.height.len(),
            });
        }

        let area = if normalize {
            if volume == 0.0 {
                return Err(Error::MetadataMissing {
                    specimen: label,
                    field: "volume is 0, cannot normalize the area series".into(),
                });
            }
            table.area.iter().map(|a| a / volume).collect()
        } else {
            table.area
        };

        Ok(Specimen {
            label,
            class_label: class_label.into(),
            volume,
            surface,
            length,
            area,
            perimeter: table.perimeter,
            width: table.width,
            height: table.height,
        })
    }

    // ---- accessors ----

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn surface(&self) -> f64 {
        self.surface
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Area per slice (divided by volume when normalization was on).
    pub fn area(&self) -> &[f64] {
        &self.area
    }

    pub fn perimeter(&self) -> &[f64] {
        &self.perimeter
    }

    pub fn width(&self) -> &[f64] {
        &self.width
    }

    pub fn height(&self) -> &[f64] {
        &self.height
    }

    /// Number of cross-section slices.
    pub fn slice_count(&self) -> usize {
        self.area.len()
    }

    // ---- derived metrics ----

    /// Per-slice shape regularity: `2·sqrt(area) / perimeter`.
    /// Uses the stored (possibly normalized) area series.
    pub fn circularity(&self) -> Vec<f64> {
        self.area
            .iter()
            .zip(&self.perimeter)
            .map(|(a, p)| 2.0 * a.sqrt() / p)
            .collect()
    }

    /// Dispatch a metric to its derivation.
    pub fn metric(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::Volume => MetricValue::Scalar(self.volume),
            Metric::Surface => MetricValue::Scalar(self.surface),
            Metric::Length => MetricValue::Scalar(self.length),
            Metric::Width => MetricValue::Scalar(series_max(&self.width)),
            Metric::Height => MetricValue::Scalar(series_max(&self.height)),
            Metric::Area => MetricValue::Series(self.area.clone()),
            Metric::Circularity => MetricValue::Series(self.circularity()),
            Metric::Perimeter => MetricValue::Series(self.perimeter.clone()),
        }
    }
}

fn series_max(series: &[f64]) -> f64 {
    series.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
