use super::palette::STEEL_BLUE;
use super::panels::draw_scatter;
use super::{ChartArtifact, render_svg, working_copy};
use crate::error::Result;
use crate::types::columns::{DNI, GHI, RH, TMOD_A, TMOD_B};
use crate::utils::{paired_points, require_columns};
use polars::prelude::DataFrame;

/// (field, y axis description), in panel order.
const PANELS: [(&str, &str); 4] = [
    (TMOD_A, "Temperature (TModA)"),
    (TMOD_B, "Temperature (TModB)"),
    (GHI, "Global Horizontal Irradiance (GHI)"),
    (DNI, "Direct Normal Irradiance (DNI)"),
];

/// 2 × 2 grid of relative humidity against module temperatures and irradiance.
pub fn temperature_analysis(df: &DataFrame) -> Result<ChartArtifact> {
    let df = working_copy(df);
    require_columns(&df, &[RH, TMOD_A, TMOD_B, GHI, DNI])?;

    let panels = PANELS
        .iter()
        .map(|&(field, y_desc)| Ok((field, y_desc, paired_points(&df, RH, field)?)))
        .collect::<Result<Vec<_>>>()?;

    render_svg("Temperature Analysis", (1600, 1000), |root| {
        for (area, (field, y_desc, points)) in root.split_evenly((2, 2)).iter().zip(&panels) {
            draw_scatter(
                area,
                &format!("Relative Humidity vs {field}"),
                "Relative Humidity (%)",
                y_desc,
                points,
                STEEL_BLUE,
            )?;
        }
        Ok(())
    })
}
