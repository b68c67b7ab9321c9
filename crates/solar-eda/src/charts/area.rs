use super::palette::{DARK_GREEN, LIGHT_BLUE, LIGHT_CORAL, LIGHT_GREEN, PURE_BLUE, PURE_RED};
use super::{ChartArtifact, FONT, format_date, padded_range, render_svg, time_range, working_copy};
use crate::error::Result;
use crate::types::columns::{DHI, DNI, GHI, TIMESTAMP};
use crate::utils::{column_f64, column_millis, finite_range, require_columns};
use plotters::prelude::*;
use polars::prelude::DataFrame;

const AREA_FIELDS: [(&str, RGBColor, RGBColor); 3] = [
    (GHI, LIGHT_BLUE, PURE_BLUE),
    (DNI, LIGHT_CORAL, PURE_RED),
    (DHI, LIGHT_GREEN, DARK_GREEN),
];

/// Shaded irradiance areas over time.
///
/// Rows are ordered by `Timestamp` (stable) and rows without a timestamp are
/// left out. Each of `GHI`, `DNI` and `DHI` gets a translucent fill down to
/// zero and a solid border line.
pub fn area_plot(df: &DataFrame, title: &str) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[TIMESTAMP, GHI, DNI, DHI])?;

    let times = column_millis(&df, TIMESTAMP)?;
    let mut order: Vec<(usize, i64)> = times
        .iter()
        .enumerate()
        .filter_map(|(i, t)| Some((i, (*t)?)))
        .collect();
    order.sort_by_key(|&(_, t)| t);

    let mut series = Vec::with_capacity(AREA_FIELDS.len());
    for (field, fill, line) in AREA_FIELDS {
        let values = column_f64(&df, field)?;
        let points: Vec<(f64, f64)> = order
            .iter()
            .filter_map(|&(i, t)| Some((t as f64, values[i]?)))
            .collect();
        series.push((field, fill, line, points));
    }

    let t_lo = order.first().map(|o| o.1).unwrap_or(0);
    let t_hi = order.last().map(|o| o.1).unwrap_or(0);
    let (y_lo, y_hi) = finite_range(
        series
            .iter()
            .flat_map(|s| s.3.iter().map(|p| p.1))
            .chain(std::iter::once(0.0)),
    )
    .unwrap_or((0.0, 1.0));

    render_svg(title, (1000, 600), |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .build_cartesian_2d(time_range(t_lo, t_hi), padded_range(y_lo, y_hi))?;

        chart
            .configure_mesh()
            .x_labels(6)
            .x_label_formatter(&|v| format_date(*v))
            .x_desc(TIMESTAMP)
            .y_desc("Values")
            .draw()?;

        for (field, fill, line, points) in &series {
            let fill = *fill;
            chart
                .draw_series(
                    AreaSeries::new(points.iter().copied(), 0.0, fill.mix(0.4))
                        .border_style(line.mix(0.8).stroke_width(2)),
                )?
                .label(*field)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    })
}
