//! IQR outlier detection.

use crate::error::Result;
use crate::types::FieldCountReport;
use crate::utils::{column_present_f64, numeric_column_names, quantile};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tukey fence multiplier.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Quartiles and the derived fences of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether a value lies strictly outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Compute the IQR fences of the present values, or `None` when there are none.
pub fn iqr_bounds(values: &Float64Chunked) -> Result<Option<IqrBounds>> {
    let (Some(q1), Some(q3)) = (quantile(values, 0.25)?, quantile(values, 0.75)?) else {
        return Ok(None);
    };
    let iqr = q3 - q1;
    Ok(Some(IqrBounds {
        q1,
        q3,
        lower: q1 - IQR_MULTIPLIER * iqr,
        upper: q3 + IQR_MULTIPLIER * iqr,
    }))
}

/// Count the values of one column that fall outside its IQR fences.
pub fn count_outliers(values: &Float64Chunked) -> Result<usize> {
    let Some(bounds) = iqr_bounds(values)? else {
        return Ok(0);
    };
    let outside = values.lt(bounds.lower) | values.gt(bounds.upper);
    Ok(outside.sum().unwrap_or(0) as usize)
}

/// Outlier count for every numeric column.
///
/// Each column is tested on its own; columns without outliers are reported
/// with a count of zero.
pub fn outlier_report(df: &DataFrame) -> Result<FieldCountReport> {
    let mut report = FieldCountReport::default();
    for name in numeric_column_names(df) {
        let count = count_outliers(&column_present_f64(df, &name)?)?;
        debug!("Column '{}': {} outliers", name, count);
        report.push(name, count);
    }
    Ok(report)
}
