//! Statistical imputation methods.
//!
//! Median fill for numeric columns and mode fill for timestamp columns.

use crate::error::Result;
use crate::utils::{column_present_f64, is_float_dtype};
use chrono::Utc;
use polars::prelude::*;
use tracing::{debug, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing values of a numeric column with the column's median.
    ///
    /// Integer columns become `Float64` when anything is filled; float columns
    /// keep their width. Columns with no missing values, or with no values at
    /// all, are left untouched.
    ///
    /// Returns the number of values filled.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let values = column_present_f64(df, col_name)?;
        let missing = values.null_count();
        if missing == 0 {
            return Ok(0);
        }

        let Some(median_val) = values.median() else {
            debug!("Column '{}' has no values to compute a median from", col_name);
            return Ok(0);
        };

        let dtype = df.column(col_name)?.dtype().clone();
        let mut filled = values.fill_null_with_values(median_val)?.into_series();
        if is_float_dtype(&dtype) {
            filled = filled.cast(&dtype)?;
        }
        df.replace(col_name, filled)?;
        processing_steps.push(format!(
            "Filled '{}' with median: {:.2}",
            col_name, median_val
        ));

        Ok(missing)
    }

    /// Fill missing values of a `Datetime(ms)` column with its most frequent value.
    ///
    /// Ties go to the earliest timestamp. When every value is missing the
    /// current wall-clock time is used instead.
    ///
    /// Returns the number of values filled.
    pub fn apply_timestamp_mode(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let millis = series.cast(&DataType::Int64)?;

        let missing = millis.null_count();
        if missing == 0 {
            return Ok(0);
        }

        let fill_value = match timestamp_mode(&millis)? {
            Some(mode) => {
                processing_steps.push(format!(
                    "Filled {} missing '{}' values with the most common timestamp",
                    missing, col_name
                ));
                mode
            }
            None => {
                warn!(
                    "Every '{}' value is missing; filling with the current time",
                    col_name
                );
                processing_steps.push(format!(
                    "Filled {} missing '{}' values with the current time",
                    missing, col_name
                ));
                Utc::now().timestamp_millis()
            }
        };

        let filled = millis
            .i64()?
            .fill_null_with_values(fill_value)?
            .into_series()
            .cast(series.dtype())?;
        df.replace(col_name, filled)?;

        Ok(missing)
    }
}

/// Most frequent present value of an Int64 series; the smallest wins a tie.
fn timestamp_mode(millis: &Series) -> Result<Option<i64>> {
    let name = millis.name().clone();
    let modes = DataFrame::new(vec![millis.clone().into_column()])?
        .lazy()
        .select([col(name.clone()).drop_nulls().mode().min()])
        .collect()?;
    Ok(modes
        .column(name.as_str())?
        .as_materialized_series()
        .i64()?
        .get(0))
}
