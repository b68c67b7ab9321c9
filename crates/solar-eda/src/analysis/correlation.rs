//! Pairwise Pearson correlation.

use crate::error::Result;
use crate::utils::{column_present_f64, require_columns};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Square correlation matrix with labels.
///
/// `values[i][j]` is `None` when fewer than two complete pairs exist or one
/// of the columns is constant over those pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two labelled fields.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.values[i][j]
    }
}

/// Pearson correlation of two columns over rows where both are present.
pub fn pearson(xs: &Float64Chunked, ys: &Float64Chunked) -> Result<Option<f64>> {
    let complete = xs.is_not_null() & ys.is_not_null();
    let (xs, ys) = (xs.filter(&complete)?, ys.filter(&complete)?);
    if xs.len() < 2 {
        return Ok(None);
    }

    // a constant column yields NaN
    Ok(cov::pearson_corr(&xs, &ys)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0)))
}

/// Correlation matrix over the given fields.
pub fn correlation_matrix(df: &DataFrame, fields: &[&str]) -> Result<CorrelationMatrix> {
    require_columns(df, fields)?;

    let columns: Vec<Float64Chunked> = fields
        .iter()
        .map(|f| column_present_f64(df, f))
        .collect::<Result<_>>()?;

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i], &columns[j])?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: fields.iter().map(|f| f.to_string()).collect(),
        values,
    })
}
