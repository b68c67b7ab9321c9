//! Value-level sanitization: infinities, row ordering and duplicate rows.

use crate::error::Result;
use crate::utils::is_float_dtype;
use polars::prelude::*;
use tracing::debug;

/// Values nulled by [`replace_infinities`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NonFiniteCounts {
    pub infinite: usize,
    pub nan: usize,
}

/// Replace +/- infinity and NaN in every float column with null.
///
/// Columns keep their float width.
pub(crate) fn replace_infinities(df: &mut DataFrame) -> Result<NonFiniteCounts> {
    let float_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| is_float_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();

    let mut counts = NonFiniteCounts::default();

    for col_name in &float_columns {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let casted = series.cast(&DataType::Float64)?;
        let values = casted.f64()?;

        let infinite = values.is_infinite();
        let nan = values.is_nan();
        let n_infinite = infinite.sum().unwrap_or(0) as usize;
        let n_nan = nan.sum().unwrap_or(0) as usize;
        if n_infinite == 0 && n_nan == 0 {
            continue;
        }

        let cleaned = values
            .set(&(infinite | nan), None)?
            .into_series()
            .cast(series.dtype())?;
        df.replace(col_name, cleaned)?;
        counts.infinite += n_infinite;
        counts.nan += n_nan;
    }

    if counts.infinite > 0 || counts.nan > 0 {
        debug!(
            "Replaced {} infinite and {} NaN values with null",
            counts.infinite, counts.nan
        );
    }

    Ok(counts)
}

/// Stable-sort rows by one column.
pub(crate) fn sort_rows_by(df: &DataFrame, column: &str) -> Result<DataFrame> {
    Ok(df.sort(
        [column],
        SortMultipleOptions::default().with_maintain_order(true),
    )?)
}

/// Remove rows whose every field equals an earlier row, keeping the first.
///
/// Returns the deduplicated DataFrame and the number of rows dropped.
pub(crate) fn drop_duplicate_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let deduped = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = df.height() - deduped.height();
    Ok((deduped, removed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_replace_infinities() {
        let mut df = df![
            "GHI" => [1.0, f64::INFINITY, f64::NEG_INFINITY, 4.0],
            "WS" => [1i64, 2, 3, 4],
        ]
        .unwrap();

        let counts = replace_infinities(&mut df).unwrap();

        assert_eq!(counts, NonFiniteCounts { infinite: 2, nan: 0 });
        assert_eq!(df.column("GHI").unwrap().null_count(), 2);
        assert_eq!(df.column("WS").unwrap().null_count(), 0);
    }

    #[test]
    fn test_replace_infinities_counts_nan_and_keeps_width() {
        let mut df = df![
            "TModA" => [Some(1.5f32), Some(f32::NAN), Some(f32::INFINITY), None],
        ]
        .unwrap();

        let counts = replace_infinities(&mut df).unwrap();

        assert_eq!(counts, NonFiniteCounts { infinite: 1, nan: 1 });
        let column = df.column("TModA").unwrap();
        assert_eq!(column.dtype(), &DataType::Float32);
        assert_eq!(column.null_count(), 3);
        assert_eq!(f64_values(&df, "TModA")[0], Some(1.5));
    }

    #[test]
    fn test_drop_duplicate_rows_keeps_first() {
        let df = df![
            "GHI" => [1.0, 2.0, 1.0, 3.0],
            "RH" => ["a", "b", "a", "c"],
        ]
        .unwrap();

        let (deduped, dropped) = drop_duplicate_rows(&df).unwrap();

        assert_eq!(dropped, 1);
        assert_eq!(deduped.height(), 3);
        assert_eq!(
            f64_values(&deduped, "GHI"),
            vec![Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_rows_differing_in_one_field_are_kept() {
        let df = df![
            "GHI" => [1.0, 1.0],
            "DNI" => [Some(2.0), None],
        ]
        .unwrap();

        let (_, dropped) = drop_duplicate_rows(&df).unwrap();
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_signed_zeros_are_duplicates() {
        let df = df!["GHI" => [0.0, -0.0], "DNI" => [1.0, 1.0]].unwrap();

        let (deduped, dropped) = drop_duplicate_rows(&df).unwrap();

        assert_eq!(dropped, 1);
        assert_eq!(deduped.height(), 1);
    }

    #[test]
    fn test_sort_rows_by_is_stable() {
        let df = df![
            "key" => [5i64, 1, 5, 0],
            "v" => [10, 20, 30, 40],
        ]
        .unwrap();
        let sorted = sort_rows_by(&df, "key").unwrap();
        assert_eq!(
            f64_values(&sorted, "v"),
            vec![Some(40.0), Some(20.0), Some(10.0), Some(30.0)]
        );
    }
}
