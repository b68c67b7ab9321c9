//! Polar wind speed and direction scatter.

use super::palette::{GRID_GRAY, normalize, viridis};
use super::panels::{draw_colorbar, label_style};
use super::{ChartArtifact, FONT, render_svg, working_copy};
use crate::error::Result;
use crate::types::columns::{WD, WS};
use crate::utils::{finite_range, paired_points, require_columns};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use polars::prelude::DataFrame;

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Project a compass bearing in degrees and a radius onto the plane.
///
/// 0° points up (North) and angles grow clockwise, so 90° lies on the
/// positive x axis.
pub fn polar_to_cartesian(direction_deg: f64, radius: f64) -> (f64, f64) {
    let theta = direction_deg.to_radians();
    (radius * theta.sin(), radius * theta.cos())
}

/// Wind rose over the standard `WS` and `WD` fields.
pub fn wind_rose(df: &DataFrame) -> Result<ChartArtifact> {
    wind_analysis(df, WS, WD, "Wind Speed and Direction Analysis")
}

/// Polar scatter with angle = direction, radius = speed and color = speed.
pub fn wind_analysis(
    df: &DataFrame,
    speed_col: &str,
    direction_col: &str,
    title: &str,
) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[speed_col, direction_col])?;

    let samples = paired_points(&df, direction_col, speed_col)?;
    let (lo, hi) = finite_range(samples.iter().map(|s| s.1)).unwrap_or((0.0, 1.0));
    let outer = if hi > 0.0 { hi } else { 1.0 };
    let limit = outer * 1.15;

    render_svg(title, (1000, 850), |root| {
        let (plot_area, bar_area) = root.split_horizontally(850);

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(title, (FONT, 24))
            .margin(20)
            .build_cartesian_2d(-limit..limit, -limit..limit)?;

        for k in 1..=4 {
            let r = outer * k as f64 / 4.0;
            chart.draw_series(LineSeries::new(
                (0..=72).map(|step| polar_to_cartesian(step as f64 * 5.0, r)),
                GRID_GRAY,
            ))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("{r:.1}"),
                polar_to_cartesian(22.5, r),
                label_style(11, HPos::Left, VPos::Bottom),
            )))?;
        }

        for (i, label) in COMPASS.iter().enumerate() {
            let bearing = i as f64 * 45.0;
            chart.draw_series(LineSeries::new(
                [(0.0, 0.0), polar_to_cartesian(bearing, outer)],
                GRID_GRAY,
            ))?;
            chart.draw_series(std::iter::once(Text::new(
                *label,
                polar_to_cartesian(bearing, outer * 1.08),
                label_style(15, HPos::Center, VPos::Center),
            )))?;
        }

        chart.draw_series(samples.iter().map(|&(direction, speed)| {
            let color = viridis(normalize(speed, lo, hi));
            Circle::new(polar_to_cartesian(direction, speed), 4, color.mix(0.75).filled())
        }))?;

        draw_colorbar(
            &bar_area,
            (50, 100),
            (24, 620),
            viridis,
            (lo, hi),
            Some("Wind Speed (m/s)"),
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_polar_projection_is_north_clockwise() {
        assert!(close(polar_to_cartesian(0.0, 2.0), (0.0, 2.0)));
        assert!(close(polar_to_cartesian(90.0, 2.0), (2.0, 0.0)));
        assert!(close(polar_to_cartesian(180.0, 1.0), (0.0, -1.0)));
        assert!(close(polar_to_cartesian(270.0, 1.0), (-1.0, 0.0)));
    }

    #[test]
    fn test_wind_rose_renders() {
        let df = df![
            "WS" => [Some(0.5), Some(2.0), None, Some(4.5)],
            "WD" => [Some(10.0), Some(200.0), Some(90.0), None],
        ]
        .unwrap();

        let chart = wind_rose(&df).unwrap();

        assert_eq!(chart.title, "Wind Speed and Direction Analysis");
        assert!(chart.svg.contains("Wind Speed (m/s)"));
    }

    #[test]
    fn test_wind_analysis_custom_columns() {
        let df = df!["Speed" => [1.0, 2.0], "Bearing" => [0.0, 180.0]].unwrap();
        assert!(wind_analysis(&df, "Speed", "Bearing", "Gusts").is_ok());
        assert!(wind_analysis(&df, "WS", "WD", "Gusts").is_err());
    }
}
