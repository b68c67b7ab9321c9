//! Correlation heatmap and pairwise scatter matrix.

use super::palette::{MISSING_GRAY, SKY_BLUE, STEEL_BLUE, coolwarm, normalize};
use super::panels::{draw_colorbar, draw_histogram, draw_scatter, label_style};
use super::{ChartArtifact, FONT, render_svg, working_copy};
use crate::analysis::{CorrelationMatrix, correlation_matrix};
use crate::error::Result;
use crate::types::columns::{DHI, DNI, GHI, TMOD_A, TMOD_B};
use crate::utils::{column_f64, paired_points, require_columns};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use polars::prelude::DataFrame;

/// Solar radiation and module temperature fields.
pub const CORRELATION_FIELDS: [&str; 5] = [GHI, DNI, DHI, TMOD_A, TMOD_B];

const HEATMAP_TITLE: &str = "Correlation Heatmap: Solar Radiation and Temperature Measures";
const PAIR_PLOT_TITLE: &str = "Pair Plot: Solar Radiation and Temperature Measures";

/// Output of the correlation mode.
#[derive(Debug, Clone)]
pub struct CorrelationAnalysis {
    pub matrix: CorrelationMatrix,
    pub heatmap: ChartArtifact,
    /// Rendered alongside the heatmap but not shown by the dashboard.
    pub scatter_matrix: ChartArtifact,
}

/// Correlation matrix of [`CORRELATION_FIELDS`] with its heatmap and pair plot.
pub fn correlation_analysis(df: &DataFrame) -> Result<CorrelationAnalysis> {
    let df = working_copy(df);
    require_columns(&df, &CORRELATION_FIELDS)?;

    let matrix = correlation_matrix(&df, &CORRELATION_FIELDS)?;
    let heatmap = correlation_heatmap(&matrix)?;
    let scatter_matrix = scatter_matrix(&df, &CORRELATION_FIELDS)?;

    Ok(CorrelationAnalysis {
        matrix,
        heatmap,
        scatter_matrix,
    })
}

/// Annotated heatmap of a correlation matrix on a fixed −1..1 diverging scale.
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Result<ChartArtifact> {
    let n = matrix.labels.len().max(1) as i32;
    let (width, height) = (1000u32, 800u32);

    render_svg(HEATMAP_TITLE, (width, height), |root| {
        let body = root.titled(HEATMAP_TITLE, (FONT, 22))?;

        let (left, top) = (110, 30);
        let cell = ((width as i32 - left - 200) / n).min((height as i32 - top - 130) / n);

        for (i, row) in matrix.values.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let x0 = left + j as i32 * cell;
                let y0 = top + i as i32 * cell;
                let fill = value.map_or(MISSING_GRAY, |v| coolwarm(normalize(v, -1.0, 1.0)));
                body.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], fill.filled()))?;
                body.draw(&Rectangle::new(
                    [(x0, y0), (x0 + cell, y0 + cell)],
                    WHITE.stroke_width(1),
                ))?;

                if let Some(v) = value {
                    let ink: &'static RGBColor = if v.abs() > 0.6 { &WHITE } else { &BLACK };
                    body.draw(&Text::new(
                        format!("{v:.2}"),
                        (x0 + cell / 2, y0 + cell / 2),
                        label_style(16, HPos::Center, VPos::Center).color(ink),
                    ))?;
                }
            }
        }

        for (k, label) in matrix.labels.iter().enumerate() {
            let centre = k as i32 * cell + cell / 2;
            body.draw(&Text::new(
                label.clone(),
                (left - 10, top + centre),
                label_style(15, HPos::Right, VPos::Center),
            ))?;
            body.draw(&Text::new(
                label.clone(),
                (left + centre, top + n * cell + 12),
                label_style(15, HPos::Center, VPos::Top),
            ))?;
        }

        draw_colorbar(
            &body,
            (left + n * cell + 40, top),
            (24, n * cell),
            coolwarm,
            (-1.0, 1.0),
            None,
        )?;
        Ok(())
    })
}

enum PairCell<'a> {
    Diagonal(&'a str, Vec<f64>),
    Pair(&'a str, &'a str, Vec<(f64, f64)>),
}

/// Pairwise scatter plots of `fields`, with histograms on the diagonal.
pub fn scatter_matrix(df: &DataFrame, fields: &[&str]) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, fields)?;

    let n = fields.len().max(1);
    let mut cells = Vec::with_capacity(n * n);
    for &row in fields {
        for &col in fields {
            cells.push(if row == col {
                PairCell::Diagonal(col, column_f64(&df, col)?.into_iter().flatten().collect())
            } else {
                PairCell::Pair(col, row, paired_points(&df, col, row)?)
            });
        }
    }

    let side = 300 * n as u32;
    render_svg(PAIR_PLOT_TITLE, (side, side + 40), |root| {
        let body = root.titled(PAIR_PLOT_TITLE, (FONT, 26))?;

        for (area, cell) in body.split_evenly((n, n)).iter().zip(&cells) {
            match cell {
                PairCell::Diagonal(field, values) => {
                    draw_histogram(area, "", field, "Count", values, 20, SKY_BLUE)?
                }
                PairCell::Pair(x, y, points) => draw_scatter(area, "", x, y, points, STEEL_BLUE)?,
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample() -> DataFrame {
        df![
            "GHI" => [0.0, 100.0, 400.0, 800.0, 600.0],
            "DNI" => [0.0, 80.0, 350.0, 700.0, 500.0],
            "DHI" => [0.0, 30.0, 90.0, 120.0, 110.0],
            "TModA" => [20.0, 25.0, 35.0, 50.0, 45.0],
            "TModB" => [19.0, 24.0, 33.0, 47.0, 44.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_correlation_analysis() {
        let analysis = correlation_analysis(&sample()).unwrap();

        assert_eq!(analysis.matrix.labels, CORRELATION_FIELDS.to_vec());
        assert!((analysis.matrix.get("TModA", "TModA").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(analysis.heatmap.title, HEATMAP_TITLE);
        assert!(analysis.heatmap.svg.contains("1.00"));
        assert_eq!(analysis.scatter_matrix.title, PAIR_PLOT_TITLE);
    }

    #[test]
    fn test_heatmap_handles_undefined_coefficients() {
        let matrix = CorrelationMatrix {
            labels: vec!["GHI".to_string(), "DNI".to_string()],
            values: vec![vec![Some(1.0), None], vec![None, Some(1.0)]],
        };
        assert!(correlation_heatmap(&matrix).is_ok());
    }

    #[test]
    fn test_correlation_analysis_missing_field() {
        let df = sample().drop("TModB").unwrap();
        let err = correlation_analysis(&df).unwrap_err();
        assert!(err.to_string().contains("TModB"));
    }
}
