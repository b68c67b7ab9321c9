//! Module readings split into the periods between cleaning events.

use super::palette::categorical;
use super::{
    Canvas, ChartArtifact, FONT, format_datetime, padded_range, render_svg, time_range,
    working_copy,
};
use crate::error::{EdaError, Result};
use crate::types::columns::{CLEANING, MOD_A, MOD_B, TIMESTAMP};
use crate::utils::{
    column_f64, column_millis, finite_range, is_numeric_dtype, parse_boolean_string,
    require_columns,
};
use plotters::prelude::*;
use polars::prelude::*;

/// Read a cleaning flag column as booleans.
///
/// Accepted encodings: a boolean column, a numeric column holding only 0 and
/// 1, or strings such as `true`/`false`/`yes`/`no`. Missing entries and any
/// other value fail with [`EdaError::InvalidFlag`].
pub fn cleaning_flags(series: &Series) -> Result<Vec<bool>> {
    let column = series.name().to_string();
    let invalid = |reason: String| EdaError::InvalidFlag {
        column: column.clone(),
        reason,
    };

    if series.null_count() > 0 {
        return Err(invalid(format!("{} missing values", series.null_count())));
    }

    match series.dtype() {
        DataType::Boolean => Ok(series.bool()?.into_iter().flatten().collect()),
        dtype if is_numeric_dtype(dtype) => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(x) if x == 0.0 => Ok(false),
                Some(x) if x == 1.0 => Ok(true),
                other => Err(invalid(format!("row {row} holds {other:?}, expected 0 or 1"))),
            })
            .collect(),
        DataType::String => series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                let v = v.unwrap_or_default();
                parse_boolean_string(v)
                    .ok_or_else(|| invalid(format!("row {row} holds '{v}', expected a boolean")))
            })
            .collect(),
        other => Err(invalid(format!("unsupported type {other}"))),
    }
}

/// Period index of every row: the number of `false → true` transitions seen
/// so far. The first period is 0.
pub fn cleaning_periods(flags: &[bool]) -> Vec<usize> {
    let mut period = 0;
    flags
        .iter()
        .enumerate()
        .map(|(i, &flag)| {
            if i > 0 && flag && !flags[i - 1] {
                period += 1;
            }
            period
        })
        .collect()
}

type PeriodLine = (usize, Vec<(f64, f64)>);

/// Two stacked panels (`ModA`, `ModB`) with one line per cleaning period.
pub fn cleaning_impact(df: &DataFrame) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[TIMESTAMP, CLEANING, MOD_A, MOD_B])?;

    let flags = cleaning_flags(df.column(CLEANING)?.as_materialized_series())?;
    let periods = cleaning_periods(&flags);
    let times = column_millis(&df, TIMESTAMP)?;

    let (t_lo, t_hi) = times
        .iter()
        .flatten()
        .fold(None, |acc: Option<(i64, i64)>, &t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
        .unwrap_or((0, 0));

    let mut panels = Vec::with_capacity(2);
    for field in [MOD_A, MOD_B] {
        let values = column_f64(&df, field)?;
        let period_count = periods.last().map_or(0, |p| p + 1);
        let mut lines: Vec<PeriodLine> = (0..period_count).map(|p| (p, Vec::new())).collect();
        for (row, &period) in periods.iter().enumerate() {
            if let (Some(t), Some(v)) = (times[row], values[row]) {
                lines[period].1.push((t as f64, v));
            }
        }
        panels.push((field, lines));
    }

    tracing::debug!(
        "Cleaning impact: {} rows over {} periods",
        flags.len(),
        periods.last().map_or(0, |p| p + 1)
    );

    render_svg("Impact of Cleaning", (1400, 1000), |root| {
        for (area, (field, lines)) in root.split_evenly((2, 1)).iter().zip(&panels) {
            draw_periods(area, field, lines, (t_lo, t_hi))?;
        }
        Ok(())
    })
}

fn draw_periods(
    area: &Canvas<'_>,
    field: &str,
    lines: &[PeriodLine],
    (t_lo, t_hi): (i64, i64),
) -> anyhow::Result<()> {
    let (y_lo, y_hi) =
        finite_range(lines.iter().flat_map(|l| l.1.iter().map(|p| p.1))).unwrap_or((0.0, 1.0));

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Impact of Cleaning on {field} Readings Over Time"), (FONT, 20))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(time_range(t_lo, t_hi), padded_range(y_lo, y_hi))?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|v| format_datetime(*v))
        .x_desc(TIMESTAMP)
        .y_desc(field)
        .draw()?;

    for (period, points) in lines {
        let color = categorical(*period);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(format!("Period {period}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cleaning_periods() {
        let flags = [false, false, true, false, true];
        assert_eq!(cleaning_periods(&flags), vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn test_cleaning_periods_leading_true_and_runs() {
        assert_eq!(cleaning_periods(&[true, true, false, true, true]), vec![0, 0, 0, 1, 1]);
        assert!(cleaning_periods(&[]).is_empty());
    }

    #[test]
    fn test_cleaning_flags_encodings() {
        let numeric = Series::new("Cleaning".into(), &[0i64, 1, 0]);
        assert_eq!(cleaning_flags(&numeric).unwrap(), vec![false, true, false]);

        let strings = Series::new("Cleaning".into(), &["True", "no", "1"]);
        assert_eq!(cleaning_flags(&strings).unwrap(), vec![true, false, true]);

        let booleans = Series::new("Cleaning".into(), &[true, false]);
        assert_eq!(cleaning_flags(&booleans).unwrap(), vec![true, false]);
    }

    #[test]
    fn test_cleaning_flags_rejects_other_values() {
        let numeric = Series::new("Cleaning".into(), &[0.0, 0.5]);
        assert!(matches!(
            cleaning_flags(&numeric),
            Err(EdaError::InvalidFlag { ref column, .. }) if column == "Cleaning"
        ));

        let strings = Series::new("Cleaning".into(), &["yes", "sometimes"]);
        assert!(cleaning_flags(&strings).is_err());

        let missing = Series::new("Cleaning".into(), &[Some(1i64), None]);
        assert_eq!(cleaning_flags(&missing).unwrap_err().error_code(), "INVALID_FLAG");
    }

    #[test]
    fn test_cleaning_impact_renders_one_line_per_period() {
        let df = df![
            "Timestamp" => [
                "2021-08-09 00:01", "2021-08-09 00:02", "2021-08-09 00:03",
                "2021-08-09 00:04", "2021-08-09 00:05",
            ],
            "Cleaning" => [0i64, 0, 1, 0, 1],
            "ModA" => [1.0, 2.0, 3.0, 4.0, 5.0],
            "ModB" => [1.5, 2.5, 3.5, 4.5, 5.5],
        ]
        .unwrap();

        let chart = cleaning_impact(&df).unwrap();

        assert!(chart.svg.contains("Period 2"));
        assert!(!chart.svg.contains("Period 3"));
        assert!(chart.svg.contains("Impact of Cleaning on ModB Readings Over Time"));
    }
}
