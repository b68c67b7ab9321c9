//! Chart renderers.
//!
//! Every renderer is a free function taking the dataset by reference and
//! returning an owned [`ChartArtifact`]: a finished SVG document. Renderers
//! work on the first [`ROW_CAP`] rows and never modify the caller's data.
//!
//! | Renderer | Required columns |
//! |----------|------------------|
//! | [`time_series`] | `Timestamp` + one numeric field |
//! | [`area_plot`] | `Timestamp`, `GHI`, `DNI`, `DHI` |
//! | [`cleaning_impact`] | `Timestamp`, `Cleaning`, `ModA`, `ModB` |
//! | [`correlation_analysis`] | `GHI`, `DNI`, `DHI`, `TModA`, `TModB` |
//! | [`wind_analysis`] | wind speed + direction |
//! | [`temperature_analysis`] | `RH`, `TModA`, `TModB`, `GHI`, `DNI` |
//! | [`histogram_grid`] | `GHI`, `DNI`, `DHI`, `WS`, `TModA`, `TModB` |

mod area;
mod cleaning;
mod correlation;
mod generic;
mod histogram;
pub mod palette;
mod panels;
mod temperature;
mod time_series;
mod wind;

pub use area::area_plot;
pub use cleaning::{cleaning_flags, cleaning_impact, cleaning_periods};
pub use correlation::{
    CORRELATION_FIELDS, CorrelationAnalysis, correlation_analysis, correlation_heatmap,
    scatter_matrix,
};
pub use generic::{box_plot, histogram, line_plot, scatter_plot};
pub use histogram::{
    HISTOGRAM_BINS, HISTOGRAM_FIELDS, HistogramBin, gaussian_kde, histogram_bins, histogram_grid,
};
pub use temperature::temperature_analysis;
pub use time_series::{time_series, time_series_of};
pub use wind::{polar_to_cartesian, wind_analysis, wind_rose};

use crate::error::{EdaError, Result};
use crate::utils::head_rows;
use chrono::DateTime;
use plotters::coord::Shift;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// Rows considered by every renderer.
pub const ROW_CAP: usize = 1000;

pub(crate) const FONT: &str = "sans-serif";

/// A rendered chart. Owned by whoever asked for it; nothing keeps a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartArtifact {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Complete SVG document.
    pub svg: String,
}

impl ChartArtifact {
    /// File-name friendly version of the title.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        for c in self.title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') && !slug.is_empty() {
                slug.push('_');
            }
        }
        let trimmed = slug.trim_end_matches('_');
        if trimmed.is_empty() {
            "chart".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Write the SVG document to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.svg)?;
        Ok(())
    }
}

pub(crate) type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Draw into an in-memory SVG document of the given size.
pub(crate) fn render_svg<F>(title: &str, size: (u32, u32), draw: F) -> Result<ChartArtifact>
where
    F: FnOnce(&Canvas<'_>) -> anyhow::Result<()>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| EdaError::RenderFailed(e.to_string()))?;
        draw(&root).map_err(|e| EdaError::RenderFailed(format!("{title}: {e:#}")))?;
        root.present()
            .map_err(|e| EdaError::RenderFailed(e.to_string()))?;
    }

    Ok(ChartArtifact {
        title: title.to_string(),
        width: size.0,
        height: size.1,
        svg,
    })
}

/// The renderer's local copy of the dataset.
pub(crate) fn working_copy(df: &DataFrame) -> DataFrame {
    head_rows(df, ROW_CAP)
}

/// Axis range covering `[lo, hi]` with a little headroom.
pub(crate) fn padded_range(lo: f64, hi: f64) -> Range<f64> {
    if !(lo.is_finite() && hi.is_finite()) {
        return 0.0..1.0;
    }
    if hi <= lo {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Axis range of a time axis in epoch milliseconds.
pub(crate) fn time_range(lo: i64, hi: i64) -> Range<f64> {
    if hi <= lo {
        // one hour either side of a single instant
        return (lo as f64 - 3_600_000.0)..(hi as f64 + 3_600_000.0);
    }
    lo as f64..hi as f64
}

/// Tick label for an epoch-millisecond coordinate, `YYYY-MM-DD`.
pub(crate) fn format_date(ms: f64) -> String {
    DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Tick label for an epoch-millisecond coordinate with time of day.
pub(crate) fn format_datetime(ms: f64) -> String {
    DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_svg_produces_document() {
        let artifact = render_svg("Blank", (200, 100), |_| Ok(())).unwrap();
        assert!(artifact.svg.contains("<svg"));
        assert_eq!((artifact.width, artifact.height), (200, 100));
    }

    #[test]
    fn test_render_svg_reports_failure() {
        let err = render_svg("Broken", (10, 10), |_| Err(anyhow::anyhow!("no data"))).unwrap_err();
        assert_eq!(err.error_code(), "RENDER_FAILED");
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn test_slug() {
        let artifact = ChartArtifact {
            title: "Benin Area Plot".to_string(),
            width: 1,
            height: 1,
            svg: String::new(),
        };
        assert_eq!(artifact.slug(), "benin_area_plot");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(1_628_467_260_000.0), "2021-08-09");
        assert_eq!(format_datetime(1_628_467_260_000.0), "08-09 00:01");
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(0.0, 10.0), -0.5..10.5);
        assert_eq!(padded_range(2.0, 2.0), 1.0..3.0);
    }
}
