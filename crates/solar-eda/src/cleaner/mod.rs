//! Dataset cleaning.
//!
//! Brings a raw upload into the shape every analysis assumes:
//! - Infinite and NaN values become missing
//! - `Timestamp` is parsed, imputed with its mode and used as the row order
//! - Numeric columns are imputed with their median
//! - Exact duplicate rows are removed, keeping the first occurrence
//!
//! Columns that do not exist are skipped silently.

mod sanitizers;
mod timestamps;

pub use timestamps::{parse_timestamp_str, parse_timestamps};

use crate::error::{Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::types::columns;
use crate::utils::{has_column, numeric_column_names};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a cleaning pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub infinities_replaced: usize,
    pub nans_replaced: usize,
    pub timestamps_imputed: usize,
    pub values_imputed: usize,
    pub duplicates_removed: usize,
    /// Human readable description of every step taken.
    pub actions: Vec<String>,
}

/// Data cleaner for solar sensor datasets.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean a dataset.
    pub fn clean(df: DataFrame) -> Result<DataFrame> {
        Self::clean_with_summary(df).map(|(df, _)| df)
    }

    /// Clean a dataset and report what changed.
    pub fn clean_with_summary(df: DataFrame) -> Result<(DataFrame, CleaningSummary)> {
        let mut df = df;
        let mut summary = CleaningSummary {
            rows_before: df.height(),
            ..Default::default()
        };

        // 1. Infinities and NaN become missing
        let non_finite = sanitizers::replace_infinities(&mut df).context("Replacing infinities")?;
        summary.infinities_replaced = non_finite.infinite;
        summary.nans_replaced = non_finite.nan;
        if non_finite.infinite > 0 {
            summary.actions.push(format!(
                "Replaced {} infinite values with missing",
                non_finite.infinite
            ));
        }
        if non_finite.nan > 0 {
            summary
                .actions
                .push(format!("Replaced {} NaN values with missing", non_finite.nan));
        }

        // 2. Timestamp parsing, mode imputation and ordering
        if has_column(&df, columns::TIMESTAMP) {
            let parsed = parse_timestamps(
                df.column(columns::TIMESTAMP)?.as_materialized_series(),
            )
            .context("Parsing timestamps")?;
            df.replace(columns::TIMESTAMP, parsed)?;

            summary.timestamps_imputed = StatisticalImputer::apply_timestamp_mode(
                &mut df,
                columns::TIMESTAMP,
                &mut summary.actions,
            )?;

            df = sanitizers::sort_rows_by(&df, columns::TIMESTAMP)?;
            debug!("Ordered {} rows by {}", df.height(), columns::TIMESTAMP);
        }

        // 3. Median imputation for numeric columns
        for col_name in numeric_column_names(&df) {
            summary.values_imputed +=
                StatisticalImputer::apply_numeric_median(&mut df, &col_name, &mut summary.actions)
                    .context(format!("Imputing '{}'", col_name))?;
        }

        // 4. Duplicate rows
        let (deduped, removed) = sanitizers::drop_duplicate_rows(&df)?;
        df = deduped;
        summary.duplicates_removed = removed;
        if removed > 0 {
            summary
                .actions
                .push(format!("Removed {} duplicate rows", removed));
        }

        summary.rows_after = df.height();
        info!(
            "Cleaned dataset: {} -> {} rows, {} values imputed, {} duplicates removed",
            summary.rows_before, summary.rows_after, summary.values_imputed, removed
        );

        Ok((df, summary))
    }
}

/// Clean a dataset. Shorthand for [`DataCleaner::clean`].
pub fn clean_data(df: DataFrame) -> Result<DataFrame> {
    DataCleaner::clean(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::missing_value_report;
    use crate::utils::{column_f64, column_millis};

    fn raw_frame() -> DataFrame {
        df![
            "Timestamp" => [
                Some("2021-08-09 00:03"),
                Some("2021-08-09 00:01"),
                Some("bad value"),
                Some("2021-08-09 00:01"),
                None,
            ],
            "GHI" => [Some(1.0), Some(f64::INFINITY), Some(3.0), Some(f64::INFINITY), None],
            "WS" => [Some(0.5), Some(0.5), None, Some(0.5), Some(2.5)],
        ]
        .unwrap()
    }

    #[test]
    fn test_clean_fills_everything() {
        let (df, summary) = DataCleaner::clean_with_summary(raw_frame()).unwrap();

        assert!(missing_value_report(&df).unwrap().is_empty());
        assert_eq!(summary.infinities_replaced, 2);
        assert_eq!(summary.timestamps_imputed, 2);
        assert_eq!(
            df.column("Timestamp").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
    }

    #[test]
    fn test_clean_orders_by_timestamp_and_drops_duplicates() {
        let (df, summary) = DataCleaner::clean_with_summary(raw_frame()).unwrap();

        // Four rows share 00:01 after imputation; the second and fourth input
        // rows become identical once GHI is imputed and collapse to one.
        let millis = column_millis(&df, "Timestamp").unwrap();
        let mut sorted = millis.clone();
        sorted.sort();
        assert_eq!(millis, sorted);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn test_clean_uses_median_after_infinity_removal() {
        let df = DataCleaner::clean(raw_frame()).unwrap();
        let ghi = column_f64(&df, "GHI").unwrap();
        // present GHI values are 1.0 and 3.0 -> median 2.0
        assert!(ghi.iter().all(|v| matches!(v, Some(x) if *x == 1.0 || *x == 2.0 || *x == 3.0)));
    }

    #[test]
    fn test_clean_without_timestamp() {
        let df = df!["GHI" => [Some(1.0), None, Some(5.0)]].unwrap();
        let cleaned = clean_data(df).unwrap();
        assert_eq!(
            column_f64(&cleaned, "GHI").unwrap(),
            vec![Some(1.0), Some(3.0), Some(5.0)]
        );
    }

    #[test]
    fn test_clean_reports_nan_separately() {
        let df = df![
            "RH" => [Some(40.0), Some(f64::NAN), Some(f64::INFINITY), Some(60.0)],
            "WS" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
        ]
        .unwrap();

        let (cleaned, summary) = DataCleaner::clean_with_summary(df).unwrap();

        assert_eq!(summary.infinities_replaced, 1);
        assert_eq!(summary.nans_replaced, 1);
        assert_eq!(summary.values_imputed, 2);
        assert_eq!(
            column_f64(&cleaned, "RH").unwrap(),
            vec![Some(40.0), Some(50.0), Some(50.0), Some(60.0)]
        );
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = DataCleaner::clean(raw_frame()).unwrap();
        let twice = DataCleaner::clean(once.clone()).unwrap();
        assert!(once.equals_missing(&twice));
    }
}
