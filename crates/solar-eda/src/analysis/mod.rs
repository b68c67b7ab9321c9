//! Statistical analyses over a dataset.
//!
//! Every function is pure: it reads the DataFrame and returns a fresh result
//! without modifying its input.

mod correlation;
mod outliers;
mod reports;

pub use correlation::{CorrelationMatrix, correlation_matrix, pearson};
pub use outliers::{IQR_MULTIPLIER, IqrBounds, count_outliers, iqr_bounds, outlier_report};
pub use reports::{missing_value_report, negative_value_report, summary_statistics};
