//! Shared helpers for the analyses and renderers.
//!
//! Column access, numeric extraction and the small amount of order
//! statistics every module needs live here so the behaviour (null handling,
//! quantile interpolation) stays identical across reports and charts.

use crate::error::{EdaError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Names of all numeric columns, in column order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| is_numeric_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect()
}

// =============================================================================
// Column Access
// =============================================================================

/// Fail with [`EdaError::ColumnNotFound`] for the first missing column.
pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    let present = df.get_column_names();
    for &name in columns {
        if !present.iter().any(|c| c.as_str() == name) {
            return Err(EdaError::ColumnNotFound(name.to_string()));
        }
    }
    Ok(())
}

/// Whether the DataFrame has a column with this name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Keep at most `cap` leading rows.
pub fn head_rows(df: &DataFrame, cap: usize) -> DataFrame {
    if df.height() > cap {
        df.head(Some(cap))
    } else {
        df.clone()
    }
}

/// Read a column as `f64` values. NaN is reported as missing.
pub fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))?;
    series_f64(column.as_materialized_series())
}

/// Read a Series as `f64` values. NaN is reported as missing.
pub fn series_f64(series: &Series) -> Result<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Read a datetime column as milliseconds since the Unix epoch.
pub fn column_millis(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df
        .column(name)
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))?;
    let series = column.as_materialized_series();
    let millis = match series.dtype() {
        DataType::Datetime(TimeUnit::Milliseconds, _) => series.cast(&DataType::Int64)?,
        DataType::Datetime(_, _) | DataType::Date => series
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            .cast(&DataType::Int64)?,
        _ => crate::cleaner::parse_timestamps(series)?.cast(&DataType::Int64)?,
    };
    Ok(millis.i64()?.into_iter().collect())
}

/// Paired (x, y) points for two columns, skipping rows where either is missing.
pub fn paired_points(df: &DataFrame, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    let xs = column_f64(df, x)?;
    let ys = column_f64(df, y)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect())
}

/// Paired (timestamp millis, value) points, skipping rows where either is missing.
pub fn time_points(df: &DataFrame, time: &str, value: &str) -> Result<Vec<(i64, f64)>> {
    let ts = column_millis(df, time)?;
    let ys = column_f64(df, value)?;
    Ok(ts
        .into_iter()
        .zip(ys)
        .filter_map(|(t, v)| Some((t?, v?)))
        .collect())
}

// =============================================================================
// Order Statistics
// =============================================================================

/// Read a Series as `Float64`, with NaN turned into null.
///
/// Aggregations (`median`, `quantile`, `std`) on the result skip missing
/// values the same way the reports count them.
pub fn present_f64(series: &Series) -> Result<Float64Chunked> {
    let casted = series.cast(&DataType::Float64)?;
    let values = casted.f64()?;
    let nan = values.is_nan();
    Ok(values.set(&nan, None)?.with_name(series.name().clone()))
}

/// [`present_f64`] of a named column.
pub fn column_present_f64(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))?;
    present_f64(column.as_materialized_series())
}

/// Linear-interpolated quantile of the present values.
pub fn quantile(values: &Float64Chunked, q: f64) -> Result<Option<f64>> {
    Ok(values.quantile(q, QuantileMethod::Linear)?)
}

/// Smallest and largest finite value.
pub fn finite_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// =============================================================================
// Boolean Detection Utilities
// =============================================================================

/// Common boolean true representations.
pub const BOOLEAN_TRUE_VALUES: [&str; 4] = ["true", "t", "yes", "1"];

/// Common boolean false representations.
pub const BOOLEAN_FALSE_VALUES: [&str; 4] = ["false", "f", "no", "0"];

/// Parse a string as a boolean flag.
pub fn parse_boolean_string(s: &str) -> Option<bool> {
    let lower = s.trim().to_ascii_lowercase();
    if BOOLEAN_TRUE_VALUES.contains(&lower.as_str()) {
        Some(true)
    } else if BOOLEAN_FALSE_VALUES.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
