//! Shared data types for analysis results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names of the solar sensor datasets.
pub mod columns {
    pub const TIMESTAMP: &str = "Timestamp";
    pub const GHI: &str = "GHI";
    pub const DNI: &str = "DNI";
    pub const DHI: &str = "DHI";
    pub const MOD_A: &str = "ModA";
    pub const MOD_B: &str = "ModB";
    pub const TMOD_A: &str = "TModA";
    pub const TMOD_B: &str = "TModB";
    pub const WS: &str = "WS";
    pub const WS_GUST: &str = "WSgust";
    pub const WD: &str = "WD";
    pub const RH: &str = "RH";
    pub const CLEANING: &str = "Cleaning";
}

// ============================================================================
// Per-field counts
// ============================================================================

/// A count attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCount {
    pub field: String,
    pub count: usize,
}

/// Mapping from field name to a count, in dataset column order.
///
/// Produced by the missing-value, outlier and negative-value reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCountReport {
    pub entries: Vec<FieldCount>,
}

impl FieldCountReport {
    pub fn push(&mut self, field: impl Into<String>, count: usize) {
        self.entries.push(FieldCount {
            field: field.into(),
            count,
        });
    }

    /// Count for a field, if the field is in the report.
    pub fn get(&self, field: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.count)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.field.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl fmt::Display for FieldCountReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "(none)");
        }
        let width = self
            .entries
            .iter()
            .map(|e| e.field.len())
            .max()
            .unwrap_or(0);
        for entry in &self.entries {
            writeln!(f, "{:<width$}  {}", entry.field, entry.count)?;
        }
        Ok(())
    }
}

// ============================================================================
// Descriptive statistics
// ============================================================================

/// Descriptive statistics of one numeric column.
///
/// Statistics are `None` when the column has too few values to define them
/// (no values at all, or a single value for `std`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Per-field count/mean/std/min/quartiles/max table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryStatistics {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

const STAT_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

fn stat_value(summary: &ColumnSummary, row: usize) -> Option<f64> {
    match row {
        0 => Some(summary.count as f64),
        1 => summary.mean,
        2 => summary.std,
        3 => summary.min,
        4 => summary.q25,
        5 => summary.median,
        6 => summary.q75,
        _ => summary.max,
    }
}

/// Renders like a describe() table: one row per statistic, one column per field.
impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "(no numeric columns)");
        }
        let width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max(12);

        write!(f, "{:<6}", "")?;
        for column in &self.columns {
            write!(f, " {:>width$}", column.name)?;
        }
        writeln!(f)?;

        for (row, label) in STAT_ROWS.iter().enumerate() {
            write!(f, "{:<6}", label)?;
            for column in &self.columns {
                match stat_value(column, row) {
                    Some(v) => write!(f, " {:>width$.6}", v)?,
                    None => write!(f, " {:>width$}", "NaN")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
