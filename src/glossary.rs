use crate::data::model::Metric;

// ---------------------------------------------------------------------------
// Metric glossary – immutable lookups for report text and axis labels
// ---------------------------------------------------------------------------

/// Narrative definition printed under a metric's heading in the report.
/// Metrics without an entry get no paragraph; the section goes straight to
/// the chart.
pub fn description(metric: Metric) -> Option<&'static str> {
    match metric {
        Metric::Area => Some("The Area inside the polygon defined by the Perimeter."),
        Metric::Perimeter => Some(
            "The Perimeter, calculated from the centres of the boundary pixels.",
        ),
        Metric::Circularity => Some(
            "Circularity = 2*sqrt(Area)/Perimeter, computed per slice on the \
             volume-normalized area. A value of 1 indicates a perfect circle; \
             elongated or irregular cross-sections score lower.",
        ),
        Metric::Volume
        | Metric::Surface
        | Metric::Width
        | Metric::Height
        | Metric::Length => None,
    }
}

/// Y-axis caption for a metric's chart.  Area is plotted volume-normalized,
/// so its unit is the ratio rather than a raw area.
pub fn unit_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Area => "SliceArea/FishVol",
        other => other.name(),
    }
}
