//! CSV loading from uploaded bytes.

use crate::error::{EdaError, Result};
use crate::utils::head_rows;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Rows scanned for schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Parse CSV bytes with a header row.
///
/// Tries standard parsing with quote handling, then parsing without an
/// explicit quote character, then parsing of a pre-cleaned copy (collapsed
/// doubled quotes, blank lines removed). The error of the last strategy is
/// reported when all three fail.
pub fn read_csv_bytes(name: &str, bytes: &[u8]) -> Result<DataFrame> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(EdaError::EmptyUpload(name.to_string()));
    }

    let quoted = CsvParseOptions::default().with_quote_char(Some(b'"'));
    match parse(bytes, Some(quoted)) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading of '{}' failed: {}", name, e),
    }

    let unquoted = CsvParseOptions::default().with_quote_char(None);
    match parse(bytes, Some(unquoted)) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading '{}' without quotes failed: {}", name, e),
    }

    let cleaned = clean_csv_content(&String::from_utf8_lossy(bytes));
    parse(cleaned.as_bytes(), None).map_err(|e| EdaError::CsvParse {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn parse(bytes: &[u8], parse_options: Option<CsvParseOptions>) -> PolarsResult<DataFrame> {
    let mut options = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true);
    if let Some(parse_options) = parse_options {
        options = options.with_parse_options(parse_options);
    }
    options.into_reader_with_file_handle(Cursor::new(bytes)).finish()
}

/// Parse an upload and keep its first `row_cap` rows.
///
/// Returns the capped dataset and the number of rows parsed before capping.
/// A header without data rows loads as an empty dataset.
pub fn load_upload(name: &str, bytes: &[u8], row_cap: usize) -> Result<(DataFrame, usize)> {
    let df = read_csv_bytes(name, bytes)?;
    let parsed = df.height();
    Ok((head_rows(&df, row_cap), parsed))
}

fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Timestamp,GHI,DNI,Comments\n\
                          2021-08-09 00:01,-1.2,-0.2,\n\
                          2021-08-09 00:02,-1.1,-0.2,\n";

    #[test]
    fn test_read_csv_bytes() {
        let df = read_csv_bytes("benin.csv", SAMPLE.as_bytes()).unwrap();
        assert_eq!(df.shape(), (2, 4));
        assert_eq!(df.column("GHI").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_load_upload_caps_rows() {
        let mut csv = String::from("GHI,DNI\n");
        for i in 0..25 {
            csv.push_str(&format!("{i},{}\n", i * 2));
        }

        let (df, parsed) = load_upload("big.csv", csv.as_bytes(), 10).unwrap();

        assert_eq!(parsed, 25);
        assert_eq!(df.height(), 10);
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        assert!(matches!(
            load_upload("empty.csv", b"", 1000),
            Err(EdaError::EmptyUpload(_))
        ));
    }

    #[test]
    fn test_header_only_upload_has_no_rows() {
        let (df, parsed) = load_upload("header.csv", b"GHI,DNI\n", 1000).unwrap();

        assert_eq!(parsed, 0);
        assert_eq!(df.shape(), (0, 2));
    }

    #[test]
    fn test_clean_csv_content() {
        assert_eq!(clean_csv_content("a,b\n\n1,\"\"x\"\"\n"), "a,b\n1,\"x\"");
    }
}
