use super::palette::categorical;
use super::{ChartArtifact, FONT, format_datetime, padded_range, render_svg, time_range, working_copy};
use crate::error::{EdaError, Result};
use crate::types::columns::TIMESTAMP;
use crate::utils::{finite_range, numeric_column_names, require_columns, time_points};
use plotters::prelude::*;
use polars::prelude::DataFrame;

/// Line chart of the first measurement field against `Timestamp`.
///
/// The plotted field is the first numeric column other than `Timestamp`,
/// which for the standard layout is `GHI`.
pub fn time_series(df: &DataFrame, label: &str) -> Result<ChartArtifact> {
    require_columns(df, &[TIMESTAMP])?;
    let field = numeric_column_names(df)
        .into_iter()
        .find(|name| name != TIMESTAMP)
        .ok_or_else(|| EdaError::ColumnNotFound("numeric measurement field".to_string()))?;
    time_series_of(df, &field, label)
}

/// Line chart of `field` against `Timestamp`, in row order.
pub fn time_series_of(df: &DataFrame, field: &str, label: &str) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[TIMESTAMP, field])?;

    let points = time_points(&df, TIMESTAMP, field)?;
    let title = format!("{label} Time Series");

    let (t_lo, t_hi) = points
        .iter()
        .fold(None, |acc: Option<(i64, i64)>, &(t, _)| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
        .unwrap_or((0, 0));
    let (y_lo, y_hi) = finite_range(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));

    render_svg(&title, (1200, 700), |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, (FONT, 24))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(time_range(t_lo, t_hi), padded_range(y_lo, y_hi))?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|v| format_datetime(*v))
            .x_desc(TIMESTAMP)
            .y_desc("Values")
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|&(t, v)| (t as f64, v)),
                categorical(0).stroke_width(2),
            ))?
            .label(field)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], categorical(0)));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    })
}
