//! Timestamp parsing with coercion of unparseable values to null.

use crate::error::Result;
use crate::utils::is_datetime_dtype;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Datetime layouts seen in sensor exports, tried in order.
const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Parse one timestamp string to milliseconds since the Unix epoch (UTC).
pub fn parse_timestamp_str(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp_millis())
    })
}

/// Convert a Series to `Datetime(ms)`, turning unparseable values into nulls.
///
/// Existing datetime and date columns are cast; anything else is read as
/// text and parsed value by value.
pub fn parse_timestamps(series: &Series) -> Result<Series> {
    let target = DataType::Datetime(TimeUnit::Milliseconds, None);
    if is_datetime_dtype(series.dtype()) {
        return Ok(series.cast(&target)?);
    }

    let text = series.cast(&DataType::String)?;
    let millis: Vec<Option<i64>> = text
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_timestamp_str))
        .collect();

    Ok(Series::new(series.name().clone(), millis).cast(&target)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_layouts() {
        let expected = Some(1_628_467_260_000);
        assert_eq!(parse_timestamp_str("2021-08-09 00:01"), expected);
        assert_eq!(parse_timestamp_str("2021-08-09T00:01:00"), expected);
        assert_eq!(parse_timestamp_str("2021-08-09 00:01:00.000"), expected);
        assert_eq!(parse_timestamp_str("2021-08-09T00:01:00Z"), expected);
        assert_eq!(parse_timestamp_str("2021-08-09"), Some(1_628_467_200_000));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_timestamp_str("not a date"), None);
        assert_eq!(parse_timestamp_str(""), None);
        assert_eq!(parse_timestamp_str("2021-13-45 99:99"), None);
    }

    #[test]
    fn test_parse_series_coerces() {
        let series = Series::new(
            "Timestamp".into(),
            &[Some("2021-08-09 00:01"), Some("garbage"), None],
        );
        let parsed = parse_timestamps(&series).unwrap();
        assert_eq!(
            parsed.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(parsed.null_count(), 2);
        assert_eq!(parsed.name().as_str(), "Timestamp");
    }
}
