use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::color::generate_palette;
use crate::data::model::{Metric, MetricValue, Specimen};
use crate::error::{Error, Result};
use crate::glossary;

/// Raster size of every chart, in pixels.
pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 500;

// ---------------------------------------------------------------------------
// Chart data assembly (pure)
// ---------------------------------------------------------------------------

/// One specimen's line in a sequence chart.  The x positions are percentage
/// of sequence completion, derived from the specimen's own slice count, so
/// specimens with different slice counts still share the 0–100 axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// What a metric's chart shows, before any pixel is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// Sequence metric: one line per specimen.
    Lines(Vec<LabeledSeries>),
    /// Scalar metric: one `(label, value)` bar per specimen.
    Bars(Vec<(String, f64)>),
}

/// Shape a metric across all specimens into line or bar data.
pub fn assemble(specimens: &[Specimen], metric: Metric) -> ChartData {
    if metric.is_series() {
        let series = specimens
            .iter()
            .map(|sp| {
                let values = match sp.metric(metric) {
                    MetricValue::Series(v) => v,
                    MetricValue::Scalar(_) => unreachable!("{metric} dispatches to a series"),
                };
                let points = slice_percentages(values.len())
                    .into_iter()
                    .zip(values)
                    .collect();
                LabeledSeries {
                    label: sp.label().to_string(),
                    points,
                }
            })
            .collect();
        ChartData::Lines(series)
    } else {
        let bars = specimens
            .iter()
            .map(|sp| {
                let value = match sp.metric(metric) {
                    MetricValue::Scalar(v) => v,
                    MetricValue::Series(_) => unreachable!("{metric} dispatches to a scalar"),
                };
                (sp.label().to_string(), value)
            })
            .collect();
        ChartData::Bars(bars)
    }
}

/// Evenly spaced 0–100 positions by slice index; a single slice sits at 0.
pub fn slice_percentages(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| i as f64 * 100.0 / (n - 1) as f64)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Rasterization
// ---------------------------------------------------------------------------

/// A finished chart as a raw RGB8 buffer (row-major, 3 bytes per pixel).
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Render one metric's chart into an in-memory RGB buffer.
pub fn render(specimens: &[Specimen], metric: Metric) -> Result<RenderedChart> {
    let data = assemble(specimens, metric);
    let mut pixels = vec![255u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        match &data {
            ChartData::Lines(series) => draw_lines(&root, metric, series)?,
            ChartData::Bars(bars) => draw_bars(&root, metric, bars)?,
        }

        root.present().map_err(chart_err)?;
    }

    Ok(RenderedChart {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        pixels,
    })
}

fn draw_lines(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    metric: Metric,
    series: &[LabeledSeries],
) -> Result<()> {
    let y_max = padded_max(
        series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, y)| y)),
    );

    let mut chart = ChartBuilder::on(root)
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 55)
        .build_cartesian_2d(0.0..100.0, 0.0..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Number of slice (%)")
        .y_desc(glossary::unit_label(metric))
        .x_label_formatter(&|v: &f64| format!("{v:.0}%"))
        .label_style(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
        .draw()
        .map_err(chart_err)?;

    let palette = generate_palette(series.len());
    for (s, color) in series.iter().zip(palette) {
        chart
            .draw_series(LineSeries::new(
                s.points.iter().copied(),
                color.stroke_width(2),
            ))
            .map_err(chart_err)?
            .label(s.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerMiddle)
        .background_style(WHITE.mix(0.7))
        .border_style(BLACK.mix(0.3))
        .label_font(FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Normal))
        .draw()
        .map_err(chart_err)?;

    Ok(())
}

fn draw_bars(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    metric: Metric,
    bars: &[(String, f64)],
) -> Result<()> {
    if bars.is_empty() {
        return Ok(());
    }

    let labels: Vec<String> = bars.iter().map(|(label, _)| label.clone()).collect();
    let y_max = padded_max(bars.iter().map(|&(_, v)| v));

    let mut chart = ChartBuilder::on(root)
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 55)
        .build_cartesian_2d(labels[..].into_segmented(), 0.0..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Fishes")
        .y_desc(glossary::unit_label(metric))
        .x_labels(labels.len())
        .x_label_formatter(&|seg: &SegmentValue<&String>| match seg {
            SegmentValue::Exact(label) | SegmentValue::CenterOf(label) => label.to_string(),
            SegmentValue::Last => String::new(),
        })
        .label_style(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.filled())
                .margin(30)
                .data(bars.iter().map(|(label, value)| (label, *value))),
        )
        .map_err(chart_err)?;

    Ok(())
}

/// Upper y bound with 5% headroom; non-finite or non-positive data still
/// gets a drawable 0..1 range.
fn padded_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        1.0
    } else {
        max * 1.05
    }
}

fn chart_err(e: impl std::fmt::Display) -> Error {
    Error::Chart(e.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
