//! Solar Data Exploratory Analysis Library
//!
//! Exploratory analysis of solar-irradiance sensor exports (irradiance, module
//! temperatures, wind, humidity and panel cleaning events) built on Polars,
//! with charts rendered to SVG by Plotters.
//!
//! # Overview
//!
//! - **Cleaning**: infinity removal, timestamp parsing and mode imputation,
//!   median imputation of numeric fields, duplicate removal
//! - **Analyses**: summary statistics, missing/negative value counts, IQR
//!   outlier counts, Pearson correlation
//! - **Charts**: time series, irradiance area plot, cleaning impact,
//!   correlation heatmap, wind rose, temperature grid, histogram grid
//! - **Dashboard**: a session state machine that loads an upload, caches it
//!   by content hash and runs one analysis per selection
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use solar_eda::{AnalysisMode, AnalysisOutput, DashboardConfig, DashboardShell};
//!
//! let mut shell = DashboardShell::new(DashboardConfig::default())?;
//! shell.upload_file("data/benin-malanville.csv")?;
//!
//! match shell.select(AnalysisMode::WindAnalysis) {
//!     AnalysisOutput::Chart { chart } => chart.write_to("wind.svg")?,
//!     AnalysisOutput::Error { message, .. } => eprintln!("{message}"),
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! The analyses and renderers can also be used directly on a DataFrame:
//!
//! ```rust,ignore
//! use solar_eda::{DataCleaner, charts, outlier_report};
//!
//! let df = DataCleaner::clean(raw)?;
//! let outliers = outlier_report(&df)?;
//! let heatmap = charts::correlation_analysis(&df)?.heatmap;
//! ```

pub mod analysis;
pub mod charts;
pub mod cleaner;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod imputers;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{
    CorrelationMatrix, IqrBounds, correlation_matrix, iqr_bounds, missing_value_report,
    negative_value_report, outlier_report, summary_statistics,
};
pub use charts::{ChartArtifact, CorrelationAnalysis, ROW_CAP};
pub use cleaner::{CleaningSummary, DataCleaner, clean_data};
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder};
pub use dashboard::{
    AnalysisMode, AnalysisOutput, DashboardShell, LoadedUpload, Session, SessionState,
    UPLOAD_PROMPT, UploadCache,
};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use types::{ColumnSummary, FieldCount, FieldCountReport, SummaryStatistics};
