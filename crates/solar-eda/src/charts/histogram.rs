//! Binned distributions and the histogram grid.

use super::palette::SKY_BLUE;
use super::panels::draw_histogram;
use super::{ChartArtifact, render_svg, working_copy};
use crate::error::Result;
use crate::types::columns::{DHI, DNI, GHI, TMOD_A, TMOD_B, WS};
use crate::utils::{column_f64, finite_range, require_columns};
use polars::prelude::{ChunkVar, DataFrame, Float64Chunked, NewChunkedArray};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fields of the histogram grid, in panel order.
pub const HISTOGRAM_FIELDS: [&str; 6] = [GHI, DNI, DHI, WS, TMOD_A, TMOD_B];

pub const HISTOGRAM_BINS: usize = 30;

/// One equal-width bin. The last bin of a histogram is closed on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split the finite values into `bins` equal-width bins over their range.
///
/// A constant sample is binned over `value ± 0.5`. Returns no bins for an
/// empty sample.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some((mut lo, mut hi)) = finite_range(values.iter().copied()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in values.iter().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Gaussian kernel density of `values` evaluated at each point of `grid`.
///
/// Bandwidth follows Scott's rule, `σ · n^(-1/5)`. Returns an empty vector
/// when the sample has fewer than two values or no spread.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Vec<f64> {
    let sample: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = sample.len();
    let std = Float64Chunked::from_slice("sample".into(), &sample).std(1);
    let Some(std) = std.filter(|s| *s > 0.0) else {
        return Vec::new();
    };

    let bandwidth = std * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * PI).sqrt());

    grid.iter()
        .map(|&x| {
            sample
                .iter()
                .map(|&xi| {
                    let z = (x - xi) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

/// Grid of 2 × 3 histograms with KDE overlays.
pub fn histogram_grid(df: &DataFrame) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &HISTOGRAM_FIELDS)?;

    let samples: Vec<(&str, Vec<f64>)> = HISTOGRAM_FIELDS
        .iter()
        .map(|&field| Ok((field, column_f64(&df, field)?.into_iter().flatten().collect())))
        .collect::<Result<_>>()?;

    render_svg("Histograms", (1500, 1000), |root| {
        for (panel, (field, values)) in root.split_evenly((2, 3)).iter().zip(&samples) {
            draw_histogram(
                panel,
                &format!("Histogram of {field}"),
                field,
                "Frequency",
                values,
                HISTOGRAM_BINS,
                SKY_BLUE,
            )?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_histogram_bins_cover_every_value() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = histogram_bins(&values, 5);

        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        // the maximum lands in the closed last bin
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn test_histogram_bins_constant_sample() {
        let bins = histogram_bins(&[3.0, 3.0, 3.0], 2);
        assert_eq!(bins[0].start, 2.5);
        assert_eq!(bins[1].end, 3.5);
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn test_histogram_bins_empty() {
        assert!(histogram_bins(&[], 30).is_empty());
        assert!(histogram_bins(&[f64::NAN], 30).is_empty());
    }

    #[test]
    fn test_gaussian_kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 7.0];
        let grid: Vec<f64> = (0..=5000).map(|i| -20.0 + i as f64 * 0.01).collect();
        let density = gaussian_kde(&values, &grid);

        let area: f64 = density.iter().sum::<f64>() * 0.01;
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn test_gaussian_kde_degenerate() {
        assert!(gaussian_kde(&[5.0, 5.0], &[5.0]).is_empty());
        assert!(gaussian_kde(&[5.0], &[5.0]).is_empty());
    }

    #[test]
    fn test_histogram_grid_requires_fields() {
        let df = df!["GHI" => [1.0, 2.0]].unwrap();
        let err = histogram_grid(&df).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_histogram_grid_renders() {
        let df = df![
            "GHI" => [1.0, 2.0, 3.0, 4.0],
            "DNI" => [2.0, 2.0, 2.0, 2.0],
            "DHI" => [Some(1.0), None, Some(3.0), Some(0.5)],
            "WS" => [0.1, 0.5, 0.9, 1.3],
            "TModA" => [20.0, 21.0, 25.0, 30.0],
            "TModB" => [19.0, 20.0, 24.0, 28.0],
        ]
        .unwrap();

        let chart = histogram_grid(&df).unwrap();
        assert_eq!(chart.title, "Histograms");
        assert!(chart.svg.contains("Histogram of TModB"));
    }
}
