//! Descriptive statistics and per-field count reports.

use crate::error::Result;
use crate::types::{ColumnSummary, FieldCountReport, SummaryStatistics};
use crate::utils::{
    column_present_f64, is_float_dtype, numeric_column_names, present_f64, quantile,
};
use polars::prelude::*;

/// count/mean/std/min/quartiles/max for every numeric column.
pub fn summary_statistics(df: &DataFrame) -> Result<SummaryStatistics> {
    let mut stats = SummaryStatistics::default();

    for name in numeric_column_names(df) {
        let values = column_present_f64(df, &name)?;

        stats.columns.push(ColumnSummary {
            count: values.len() - values.null_count(),
            mean: values.mean(),
            std: values.std(1).filter(|s| s.is_finite()),
            min: values.min(),
            q25: quantile(&values, 0.25)?,
            median: quantile(&values, 0.5)?,
            q75: quantile(&values, 0.75)?,
            max: values.max(),
            name,
        });
    }

    Ok(stats)
}

/// Number of missing entries per column, only for columns that have any.
///
/// NaN in a float column counts as missing.
pub fn missing_value_report(df: &DataFrame) -> Result<FieldCountReport> {
    let mut report = FieldCountReport::default();

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let missing = if is_float_dtype(series.dtype()) {
            present_f64(series)?.null_count()
        } else {
            series.null_count()
        };

        if missing > 0 {
            report.push(series.name().to_string(), missing);
        }
    }

    Ok(report)
}

/// Number of values below zero per numeric column, omitting columns with none.
pub fn negative_value_report(df: &DataFrame) -> Result<FieldCountReport> {
    let mut report = FieldCountReport::default();

    for name in numeric_column_names(df) {
        let negatives = column_present_f64(df, &name)?.lt(0.0).sum().unwrap_or(0) as usize;
        if negatives > 0 {
            report.push(name, negatives);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df![
            "GHI" => [Some(-1.0), Some(0.0), None, Some(4.0), Some(-2.0)],
            "DNI" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
            "Comments" => [None::<&str>, None, Some("rain"), None, None],
        ]
        .unwrap()
    }

    #[test]
    fn test_summary_statistics() {
        let stats = summary_statistics(&sample()).unwrap();

        assert_eq!(stats.columns.len(), 2);
        let dni = stats.column("DNI").unwrap();
        assert_eq!(dni.count, 5);
        assert_eq!(dni.mean, Some(3.0));
        assert!((dni.std.unwrap() - 1.5811388).abs() < 1e-6);
        assert_eq!(dni.min, Some(1.0));
        assert_eq!(dni.q25, Some(2.0));
        assert_eq!(dni.median, Some(3.0));
        assert_eq!(dni.q75, Some(4.0));
        assert_eq!(dni.max, Some(5.0));

        let ghi = stats.column("GHI").unwrap();
        assert_eq!(ghi.count, 4);
        assert!(stats.column("Comments").is_none());
    }

    #[test]
    fn test_missing_value_report() {
        let report = missing_value_report(&sample()).unwrap();

        let mut expected = FieldCountReport::default();
        expected.push("GHI", 1);
        expected.push("Comments", 4);
        assert_eq!(report, expected);
    }

    #[test]
    fn test_missing_value_report_counts_nan() {
        let df = df!["RH" => [1.0, f64::NAN, 3.0]].unwrap();
        assert_eq!(missing_value_report(&df).unwrap().get("RH"), Some(1));
    }

    #[test]
    fn test_negative_value_report_omits_zero_counts() {
        let report = negative_value_report(&sample()).unwrap();

        assert_eq!(report.get("GHI"), Some(2));
        assert_eq!(report.get("DNI"), None);
        assert!(report.entries.iter().all(|e| e.count > 0));
    }

    #[test]
    fn test_reports_do_not_mutate_input() {
        let df = sample();
        let before = df.clone();
        let _ = summary_statistics(&df).unwrap();
        let _ = missing_value_report(&df).unwrap();
        let _ = negative_value_report(&df).unwrap();
        assert!(df.equals_missing(&before));
    }
}
