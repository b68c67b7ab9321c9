//! Single-panel charts over arbitrary columns.

use super::histogram::HISTOGRAM_BINS;
use super::palette::{SKY_BLUE, STEEL_BLUE, categorical};
use super::panels::{draw_histogram, draw_scatter};
use super::{ChartArtifact, FONT, format_date, padded_range, render_svg, working_copy};
use crate::analysis::iqr_bounds;
use crate::error::{EdaError, Result};
use crate::utils::{
    column_f64, column_present_f64, finite_range, is_numeric_dtype, paired_points,
    require_columns, time_points,
};
use plotters::prelude::*;
use polars::prelude::{ChunkQuantile, DataFrame};

const SIZE: (u32, u32) = (1200, 600);

/// Line through `(x, y)` ordered by `x`. A non-numeric `x` is read as timestamps.
pub fn line_plot(df: &DataFrame, x: &str, y: &str, title: &str) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[x, y])?;

    let temporal = !is_numeric_dtype(df.column(x)?.dtype());
    let mut points = if temporal {
        time_points(&df, x, y)?
            .into_iter()
            .map(|(t, v)| (t as f64, v))
            .collect()
    } else {
        paired_points(&df, x, y)?
    };
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (x_lo, x_hi) = finite_range(points.iter().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = finite_range(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));

    render_svg(title, SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 22))
            .margin(15)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 45)
            .build_cartesian_2d(padded_range(x_lo, x_hi), padded_range(y_lo, y_hi))?;

        let date_label = |v: &f64| format_date(*v);
        let plain_label = |v: &f64| format!("{v}");
        let formatter: &dyn Fn(&f64) -> String =
            if temporal { &date_label } else { &plain_label };

        chart
            .configure_mesh()
            .x_label_formatter(formatter)
            .x_desc(x)
            .y_desc(y)
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            categorical(0).stroke_width(2),
        ))?;
        Ok(())
    })
}

/// Scatter of `y` against `x`.
pub fn scatter_plot(df: &DataFrame, x: &str, y: &str, title: &str) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[x, y])?;
    let points = paired_points(&df, x, y)?;

    render_svg(title, SIZE, |root| draw_scatter(root, title, x, y, &points, categorical(0)))
}

/// Horizontal box plot of one column with 1.5 × IQR whiskers.
pub fn box_plot(df: &DataFrame, column: &str, title: &str) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[column])?;

    let values = column_present_f64(&df, column)?;
    let bounds = iqr_bounds(&values)?.ok_or_else(|| EdaError::NoValidValues(column.to_string()))?;
    let mid = values.median().unwrap_or(bounds.q1);

    let present: Vec<f64> = values.into_iter().flatten().collect();
    let inside = present.iter().copied().filter(|v| !bounds.is_outlier(*v));
    let (whisker_lo, whisker_hi) = finite_range(inside).unwrap_or((bounds.q1, bounds.q3));
    let outliers: Vec<f64> = present
        .iter()
        .copied()
        .filter(|v| bounds.is_outlier(*v))
        .collect();
    let (x_lo, x_hi) = finite_range(present.iter().copied()).unwrap_or((0.0, 1.0));

    render_svg(title, SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 22))
            .margin(15)
            .set_label_area_size(LabelAreaPosition::Bottom, 45)
            .build_cartesian_2d(padded_range(x_lo, x_hi), 0.0..1.0)?;

        chart
            .configure_mesh()
            .disable_y_axis()
            .disable_y_mesh()
            .x_desc(column)
            .draw()?;

        let (top, bottom, centre) = (0.7, 0.3, 0.5);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(bounds.q1, bottom), (bounds.q3, top)],
            SKY_BLUE.mix(0.8).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(bounds.q1, bottom), (bounds.q3, top)],
            STEEL_BLUE.stroke_width(2),
        )))?;

        let whiskers = [
            vec![(mid, bottom), (mid, top)],
            vec![(whisker_lo, centre), (bounds.q1, centre)],
            vec![(bounds.q3, centre), (whisker_hi, centre)],
            vec![(whisker_lo, 0.4), (whisker_lo, 0.6)],
            vec![(whisker_hi, 0.4), (whisker_hi, 0.6)],
        ];
        for segment in whiskers {
            chart.draw_series(LineSeries::new(segment, STEEL_BLUE.stroke_width(2)))?;
        }

        chart.draw_series(
            outliers
                .iter()
                .map(|&v| Circle::new((v, centre), 4, STEEL_BLUE.stroke_width(1))),
        )?;
        Ok(())
    })
}

/// Histogram of one column with a KDE overlay.
pub fn histogram(df: &DataFrame, column: &str, title: &str) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[column])?;

    let values: Vec<f64> = column_f64(&df, column)?.into_iter().flatten().collect();
    if values.is_empty() {
        return Err(EdaError::NoValidValues(column.to_string()));
    }

    render_svg(title, SIZE, |root| {
        draw_histogram(root, title, "Value", "Count", &values, HISTOGRAM_BINS, SKY_BLUE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample() -> DataFrame {
        df![
            "Timestamp" => ["2021-08-09 00:03", "2021-08-09 00:01", "2021-08-09 00:02"],
            "GHI" => [3.0, 1.0, 2.0],
            "WS" => [0.4, 1.8, 0.9],
        ]
        .unwrap()
    }

    #[test]
    fn test_line_plot_over_time() {
        let chart = line_plot(&sample(), "Timestamp", "GHI", "GHI over time").unwrap();
        assert!(chart.svg.contains("2021-08-09"));
    }

    #[test]
    fn test_line_and_scatter_over_numeric_axis() {
        assert!(line_plot(&sample(), "WS", "GHI", "GHI by wind").is_ok());
        let chart = scatter_plot(&sample(), "WS", "GHI", "GHI vs WS").unwrap();
        assert_eq!(chart.title, "GHI vs WS");
    }

    #[test]
    fn test_box_plot() {
        let df = df!["GHI" => [1.0, 2.0, 3.0, 4.0, 100.0]].unwrap();
        assert!(box_plot(&df, "GHI", "GHI spread").is_ok());

        let empty = df!["GHI" => [None::<f64>, None]].unwrap();
        assert_eq!(
            box_plot(&empty, "GHI", "GHI spread").unwrap_err().error_code(),
            "NO_VALID_VALUES"
        );
    }

    #[test]
    fn test_histogram() {
        let chart = histogram(&sample(), "WS", "Wind speed").unwrap();
        assert!(chart.svg.contains("Wind speed"));
        assert!(histogram(&sample(), "RH", "Humidity").is_err());
    }
}
