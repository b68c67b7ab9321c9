//! Missing value imputation.
//!
//! - `statistical`: median (numeric) and mode (timestamp) fills

pub mod statistical;

pub use statistical::StatisticalImputer;
