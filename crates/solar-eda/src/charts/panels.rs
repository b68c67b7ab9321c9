//! Panel drawers shared by the single-chart and grid renderers.

use super::histogram::{HistogramBin, gaussian_kde, histogram_bins};
use super::palette::{GRID_GRAY, STEEL_BLUE};
use super::{Canvas, FONT, padded_range};
use crate::utils::finite_range;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Text style anchored at the given position.
pub(crate) fn label_style(size: i32, h: HPos, v: VPos) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(Pos::new(h, v))
}

/// Scatter of `(x, y)` points with axis descriptions.
pub(crate) fn draw_scatter(
    area: &Canvas<'_>,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[(f64, f64)],
    color: RGBColor,
) -> anyhow::Result<()> {
    let (x_lo, x_hi) = finite_range(points.iter().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = finite_range(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));

    let mut builder = ChartBuilder::on(area);
    if !caption.is_empty() {
        builder.caption(caption, (FONT, 18));
    }
    let mut chart = builder
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(padded_range(x_lo, x_hi), padded_range(y_lo, y_hi))?;

    chart
        .configure_mesh()
        .light_line_style(GRID_GRAY.mix(0.3))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.7).filled())),
    )?;

    Ok(())
}

/// Histogram with equal-width bins and, when the sample allows one, a KDE
/// curve scaled to the bar heights.
pub(crate) fn draw_histogram(
    area: &Canvas<'_>,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    values: &[f64],
    bins: usize,
    color: RGBColor,
) -> anyhow::Result<()> {
    let counts = histogram_bins(values, bins);
    let (x_lo, x_hi) = match (counts.first(), counts.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => (0.0, 1.0),
    };
    let max_count = counts.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;

    let mut builder = ChartBuilder::on(area);
    if !caption.is_empty() {
        builder.caption(caption, (FONT, 18));
    }
    let mut chart = builder
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_lo..x_hi, 0.0..max_count * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(GRID_GRAY.mix(0.3))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(counts.iter().map(|b| bar(b, color.mix(0.8).filled())))?;
    chart.draw_series(counts.iter().map(|b| bar(b, STEEL_BLUE.stroke_width(1))))?;

    if let Some(width) = counts.first().map(|b| b.end - b.start) {
        let steps = 200;
        let grid: Vec<f64> = (0..=steps)
            .map(|i| x_lo + (x_hi - x_lo) * i as f64 / steps as f64)
            .collect();
        let density = gaussian_kde(values, &grid);
        if !density.is_empty() {
            let scale = values.len() as f64 * width;
            chart.draw_series(LineSeries::new(
                grid.iter().zip(&density).map(|(&x, &d)| (x, d * scale)),
                STEEL_BLUE.stroke_width(2),
            ))?;
        }
    }

    Ok(())
}

/// Vertical color bar drawn in pixel coordinates of `area`, highest value on
/// top, with five tick labels and an optional heading.
pub(crate) fn draw_colorbar(
    area: &Canvas<'_>,
    (x, y): (i32, i32),
    (w, h): (i32, i32),
    scale: fn(f64) -> RGBColor,
    (lo, hi): (f64, f64),
    heading: Option<&str>,
) -> anyhow::Result<()> {
    let h = h.max(2);
    for i in 0..h {
        let t = 1.0 - i as f64 / (h - 1) as f64;
        area.draw(&Rectangle::new([(x, y + i), (x + w, y + i + 1)], scale(t).filled()))?;
    }
    area.draw(&Rectangle::new([(x, y), (x + w, y + h)], BLACK.stroke_width(1)))?;

    for k in 0..5 {
        let frac = k as f64 / 4.0;
        let ty = y + h - (frac * h as f64).round() as i32;
        area.draw(&PathElement::new(vec![(x + w, ty), (x + w + 5, ty)], BLACK))?;
        area.draw(&Text::new(
            format!("{:.2}", lo + (hi - lo) * frac),
            (x + w + 8, ty),
            label_style(13, HPos::Left, VPos::Center),
        ))?;
    }

    if let Some(heading) = heading {
        area.draw(&Text::new(
            heading.to_string(),
            (x + w / 2, y - 14),
            label_style(14, HPos::Center, VPos::Center),
        ))?;
    }
    Ok(())
}

fn bar(bin: &HistogramBin, style: ShapeStyle) -> Rectangle<(f64, f64)> {
    Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], style)
}
