use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::data::model::{Metric, MetricValue, Specimen};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Spreadsheet export – one ;-delimited CSV per metric
// ---------------------------------------------------------------------------

/// Write one CSV per requested metric into `output_dir`, logging each file.
/// Files already written stay on disk if a later metric fails; the error
/// names the metric that stopped the run.
pub fn export_metrics(
    specimens: &[Specimen],
    metrics: &[Metric],
    output_dir: &Path,
) -> Result<()> {
    for &metric in metrics {
        let path = export_metric(specimens, metric, output_dir)?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

/// Write `output_dir/<Metric>.csv`, creating the directory (recursively) on
/// demand and overwriting any existing file.
pub fn export_metric(
    specimens: &[Specimen],
    metric: Metric,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;

    let rows = metric_rows(specimens, metric)?;
    let path = output_dir.join(format!("{}.csv", metric.name()));

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&path)
        .map_err(|e| out_err(&path, e))?;
    for row in &rows {
        writer.write_record(row).map_err(|e| out_err(&path, e))?;
    }
    writer.flush().map_err(|e| out_err(&path, e))?;

    Ok(path)
}

/// The rows of one metric's CSV, header first.  Pure so the table shape can
/// be asserted without touching the filesystem.
///
/// Scalar metrics: `[" ", name]` then one `[label, value]` row per specimen.
/// Sequence metrics: the specimen labels as header, then one row per slice
/// with every specimen's value for that slice.
pub fn metric_rows(specimens: &[Specimen], metric: Metric) -> Result<Vec<Vec<String>>> {
    if metric.is_series() {
        series_rows(specimens, metric)
    } else {
        Ok(scalar_rows(specimens, metric))
    }
}

fn scalar_rows(specimens: &[Specimen], metric: Metric) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(specimens.len() + 1);
    rows.push(vec![" ".to_string(), metric.name().to_string()]);
    for sp in specimens {
        let value = match sp.metric(metric) {
            MetricValue::Scalar(value) => value,
            MetricValue::Series(_) => unreachable!("{metric} dispatches to a scalar"),
        };
        rows.push(vec![sp.label().to_string(), format_value(value)]);
    }
    rows
}

fn series_rows(specimens: &[Specimen], metric: Metric) -> Result<Vec<Vec<String>>> {
    let mut columns: Vec<(&str, Vec<f64>)> = Vec::with_capacity(specimens.len());
    for sp in specimens {
        let series = match sp.metric(metric) {
            MetricValue::Series(series) => series,
            MetricValue::Scalar(_) => unreachable!("{metric} dispatches to a series"),
        };
        columns.push((sp.label(), series));
    }
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    // The first specimen fixes the row count; a ragged column is an error,
    // never silent truncation or padding.
    let expected = columns[0].1.len();
    for (label, series) in &columns {
        if series.len() != expected {
            return Err(Error::ShapeMismatch {
                metric: metric.name().to_string(),
                label: label.to_string(),
                expected,
                got: series.len(),
            });
        }
    }

    let mut rows = Vec::with_capacity(expected + 1);
    rows.push(columns.iter().map(|(label, _)| label.to_string()).collect());
    for i in 0..expected {
        rows.push(columns.iter().map(|(_, s)| format_value(s[i])).collect());
    }
    Ok(rows)
}

/// Shortest `Display` form: `10` rather than `10.0`.
fn format_value(value: f64) -> String {
    format!("{value}")
}

fn out_err(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::OutputWrite {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SliceTable;

    fn specimen(label: &str, volume: f64, area: &[f64]) -> Specimen {
        let n = area.len();
        Specimen::new(
            label,
            "A",
            volume,
            5.0,
            50.0,
            SliceTable {
                area: area.to_vec(),
                perimeter: vec![1.0; n],
                width: vec![4.0; n],
                height: vec![7.0; n],
            },
            false,
        )
        .unwrap()
    }

    #[test]
    fn scalar_rows_match_label_value_layout() {
        let specimens = vec![specimen("s1", 10.0, &[1.0]), specimen("s2", 20.0, &[1.0])];
        let rows = metric_rows(&specimens, Metric::Volume).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![" ".to_string(), "Volume".to_string()],
                vec!["s1".to_string(), "10".to_string()],
                vec!["s2".to_string(), "20".to_string()],
            ]
        );
    }

    #[test]
    fn series_rows_are_one_per_slice() {
        let specimens = vec![
            specimen("s1", 10.0, &[1.0, 2.0, 3.0]),
            specimen("s2", 20.0, &[4.0, 5.0, 6.0]),
        ];
        let rows = metric_rows(&specimens, Metric::Area).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(rows[1], vec!["1".to_string(), "4".to_string()]);
        assert_eq!(rows[3], vec!["3".to_string(), "6".to_string()]);
    }

    #[test]
    fn ragged_series_is_a_shape_error() {
        let specimens = vec![
            specimen("s1", 10.0, &[1.0, 2.0, 3.0]),
            specimen("s2", 20.0, &[4.0, 5.0]),
        ];
        let err = metric_rows(&specimens, Metric::Area).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch { expected: 3, got: 2, .. }
        ));
    }

    #[test]
    fn values_use_shortest_display_form() {
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(0.1), "0.1");
        assert_eq!(format_value(2.5), "2.5");
    }
}
