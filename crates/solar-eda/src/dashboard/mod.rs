//! Dashboard shell.
//!
//! Holds the session state machine behind the interactive front ends:
//!
//! ```text
//!   ┌──────────────────┐   upload ok    ┌──────────────────┐
//!   │  AwaitingUpload  │ ─────────────► │  Ready(Session)  │ ◄─┐
//!   └──────────────────┘                └──────────────────┘   │ upload ok
//!     select → Prompt                     select → one result ─┘
//! ```
//!
//! A failed upload leaves the state as it was. Selecting a mode never fails:
//! errors from the analysis are returned as [`AnalysisOutput::Error`].

mod cache;
mod loader;
mod mode;

pub use cache::{LoadedUpload, UploadCache, content_digest};
pub use loader::{load_upload, read_csv_bytes};
pub use mode::AnalysisMode;

use crate::analysis::{
    missing_value_report, negative_value_report, outlier_report, summary_statistics,
};
use crate::charts::{
    ChartArtifact, area_plot, cleaning_impact, correlation_analysis, histogram_grid,
    temperature_analysis, time_series, wind_rose,
};
use crate::cleaner::{CleaningSummary, DataCleaner};
use crate::config::DashboardConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::types::{FieldCountReport, SummaryStatistics};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shown when a mode is selected before any upload.
pub const UPLOAD_PROMPT: &str = "Please upload a CSV file to get started.";

// ============================================================================
// SESSION
// ============================================================================

/// The dataset of one upload as held by the shell.
#[derive(Debug, Clone)]
pub struct Session {
    upload: Arc<LoadedUpload>,
    working: DataFrame,
    cleaning: Option<CleaningSummary>,
}

impl Session {
    pub fn name(&self) -> &str {
        &self.upload.name
    }

    /// Dataset every mode runs on: the upload truncated to the row cap,
    /// cleaned when the shell is configured to.
    pub fn data(&self) -> &DataFrame {
        &self.working
    }

    /// Rows in the file before truncation.
    pub fn rows_parsed(&self) -> usize {
        self.upload.rows_parsed
    }

    /// Present when uploads are cleaned.
    pub fn cleaning_summary(&self) -> Option<&CleaningSummary> {
        self.cleaning.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    AwaitingUpload,
    Ready(Session),
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Result of selecting a mode.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisOutput {
    Prompt { message: String },
    Summary { statistics: SummaryStatistics },
    Counts { report: FieldCountReport },
    Chart { chart: ChartArtifact },
    Error { code: String, message: String },
}

impl AnalysisOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    fn from_error(err: &EdaError) -> Self {
        Self::Error {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// SHELL
// ============================================================================

/// One user's dashboard: configuration, upload cache and session state.
#[derive(Debug)]
pub struct DashboardShell {
    config: DashboardConfig,
    cache: Arc<UploadCache>,
    state: SessionState,
}

impl DashboardShell {
    /// Shell with its own upload cache.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let cache = Arc::new(UploadCache::new(config.cache_capacity));
        Self::with_cache(config, cache)
    }

    /// Shell sharing an existing upload cache.
    pub fn with_cache(config: DashboardConfig, cache: Arc<UploadCache>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache,
            state: SessionState::AwaitingUpload,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<UploadCache> {
        &self.cache
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Ready(session) => Some(session),
            SessionState::AwaitingUpload => None,
        }
    }

    /// Load an upload and make it the session dataset.
    ///
    /// On failure the previous state, including any earlier dataset, is kept.
    pub fn upload(&mut self, name: &str, bytes: &[u8]) -> Result<&Session> {
        let upload = self
            .cache
            .get_or_load(name, bytes, self.config.row_cap)
            .context(format!("Loading '{name}'"))?;

        let (working, cleaning) = if self.config.clean_uploads {
            let (df, summary) = DataCleaner::clean_with_summary(upload.raw.clone())?;
            (df, Some(summary))
        } else {
            (upload.raw.clone(), None)
        };

        info!(
            "Loaded '{}': {} rows parsed, {} kept",
            name,
            upload.rows_parsed,
            working.height()
        );

        self.state = SessionState::Ready(Session {
            upload,
            working,
            cleaning,
        });
        self.session().ok_or(EdaError::NoDataLoaded)
    }

    /// Read a file from disk and upload it under its file name.
    pub fn upload_file(&mut self, path: impl AsRef<Path>) -> Result<&Session> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(EdaError::from)
            .context(format!("Reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.upload(&name, &bytes)
    }

    /// Run one mode against the session dataset.
    pub fn select(&self, mode: AnalysisMode) -> AnalysisOutput {
        let Some(session) = self.session() else {
            debug!("'{}' selected before upload", mode);
            return AnalysisOutput::Prompt {
                message: UPLOAD_PROMPT.to_string(),
            };
        };

        match self.dispatch(mode, session) {
            Ok(output) => output,
            Err(err) => {
                warn!("{} failed: {}", mode, err);
                AnalysisOutput::from_error(&err)
            }
        }
    }

    fn dispatch(&self, mode: AnalysisMode, session: &Session) -> Result<AnalysisOutput> {
        let df = session.data();
        let site = &self.config.site_name;

        let chart = |chart: ChartArtifact| AnalysisOutput::Chart { chart };
        let counts = |report: FieldCountReport| AnalysisOutput::Counts { report };

        Ok(match mode {
            AnalysisMode::SummaryStatistics => AnalysisOutput::Summary {
                statistics: summary_statistics(df)?,
            },
            AnalysisMode::MissingValues => counts(missing_value_report(df)?),
            AnalysisMode::Outliers => counts(outlier_report(df)?),
            AnalysisMode::NegativeValues => counts(negative_value_report(df)?),
            AnalysisMode::TimeSeriesPlot => chart(time_series(df, site)?),
            AnalysisMode::AreaPlot => chart(area_plot(df, &format!("{site} Area Plot"))?),
            AnalysisMode::ImpactOfCleaning => chart(cleaning_impact(df)?),
            AnalysisMode::CorrelationAnalysis => chart(correlation_analysis(df)?.heatmap),
            AnalysisMode::WindAnalysis => chart(wind_rose(df)?),
            AnalysisMode::TemperatureAnalysis => chart(temperature_analysis(df)?),
            AnalysisMode::Histograms => chart(histogram_grid(df)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Timestamp,GHI,DNI,DHI,Cleaning\n\
                       2021-08-09 00:02,-1.0,0.0,,0\n\
                       2021-08-09 00:01,2.0,1.0,0.5,1\n\
                       2021-08-09 00:01,2.0,1.0,0.5,1\n";

    fn shell() -> DashboardShell {
        DashboardShell::new(DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_select_before_upload_prompts() {
        let shell = shell();
        for mode in AnalysisMode::ALL {
            match shell.select(mode) {
                AnalysisOutput::Prompt { message } => assert_eq!(message, UPLOAD_PROMPT),
                other => panic!("expected prompt, got {other:?}"),
            }
        }
        assert!(!shell.is_ready());
    }

    #[test]
    fn test_upload_is_analysed_as_parsed() {
        let mut shell = shell();
        let session = shell.upload("benin.csv", CSV.as_bytes()).unwrap();

        assert_eq!(session.name(), "benin.csv");
        assert_eq!(session.data().height(), 3);
        assert!(session.cleaning_summary().is_none());

        match shell.select(AnalysisMode::MissingValues) {
            AnalysisOutput::Counts { report } => assert_eq!(report.get("DHI"), Some(1)),
            other => panic!("expected counts, got {other:?}"),
        }
    }

    #[test]
    fn test_cleaning_shell_cleans_upload() {
        let config = DashboardConfig::builder().clean_uploads(true).build().unwrap();
        let mut shell = DashboardShell::new(config).unwrap();
        let session = shell.upload("benin.csv", CSV.as_bytes()).unwrap();

        assert_eq!(session.data().height(), 2);
        assert_eq!(session.cleaning_summary().unwrap().duplicates_removed, 1);

        match shell.select(AnalysisMode::MissingValues) {
            AnalysisOutput::Counts { report } => assert!(report.is_empty()),
            other => panic!("expected counts, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_cleaning_flag_is_not_filled() {
        let csv = "Timestamp,ModA,ModB,Cleaning\n\
                   2021-08-09 00:01,1.0,1.5,0\n\
                   2021-08-09 00:02,2.0,2.5,1\n\
                   2021-08-09 00:03,3.0,3.5,\n\
                   2021-08-09 00:04,4.0,4.5,0\n";
        let mut shell = shell();
        shell.upload("flags.csv", csv.as_bytes()).unwrap();

        match shell.select(AnalysisMode::ImpactOfCleaning) {
            AnalysisOutput::Error { code, .. } => assert_eq!(code, "INVALID_FLAG"),
            other => panic!("expected error, got {other:?}"),
        }
        match shell.select(AnalysisMode::SummaryStatistics) {
            AnalysisOutput::Summary { statistics } => {
                assert_eq!(statistics.column("Cleaning").unwrap().count, 3);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_column_becomes_error_output() {
        let mut shell = shell();
        shell.upload("benin.csv", CSV.as_bytes()).unwrap();

        match shell.select(AnalysisMode::WindAnalysis) {
            AnalysisOutput::Error { code, message } => {
                assert_eq!(code, "COLUMN_NOT_FOUND");
                assert!(message.contains("WS"));
            }
            other => panic!("expected error, got {other:?}"),
        }
        // the session survives the failure
        assert!(shell.is_ready());
    }

    #[test]
    fn test_failed_upload_keeps_previous_dataset() {
        let mut shell = shell();
        shell.upload("benin.csv", CSV.as_bytes()).unwrap();

        assert!(shell.upload("empty.csv", b"").is_err());
        assert_eq!(shell.session().unwrap().name(), "benin.csv");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DashboardConfig {
            row_cap: 0,
            ..Default::default()
        };
        assert_eq!(
            DashboardShell::new(config).unwrap_err().error_code(),
            "INVALID_CONFIG"
        );
    }
}
