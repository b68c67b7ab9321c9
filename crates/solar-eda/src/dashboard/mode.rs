use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The analyses a user can pick from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    SummaryStatistics,
    MissingValues,
    Outliers,
    NegativeValues,
    TimeSeriesPlot,
    AreaPlot,
    ImpactOfCleaning,
    CorrelationAnalysis,
    WindAnalysis,
    TemperatureAnalysis,
    Histograms,
}

impl AnalysisMode {
    /// Every mode, in menu order.
    pub const ALL: [AnalysisMode; 11] = [
        Self::SummaryStatistics,
        Self::MissingValues,
        Self::Outliers,
        Self::NegativeValues,
        Self::TimeSeriesPlot,
        Self::AreaPlot,
        Self::ImpactOfCleaning,
        Self::CorrelationAnalysis,
        Self::WindAnalysis,
        Self::TemperatureAnalysis,
        Self::Histograms,
    ];

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SummaryStatistics => "Summary Statistics",
            Self::MissingValues => "Missing Values",
            Self::Outliers => "Outliers",
            Self::NegativeValues => "Negative Values",
            Self::TimeSeriesPlot => "Time Series Plot",
            Self::AreaPlot => "Area Plot",
            Self::ImpactOfCleaning => "Impact of Cleaning",
            Self::CorrelationAnalysis => "Correlation Analysis",
            Self::WindAnalysis => "Wind Analysis",
            Self::TemperatureAnalysis => "Temperature Analysis",
            Self::Histograms => "Histograms",
        }
    }

    /// Section heading shown above the result.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::WindAnalysis => "Wind Speed and Direction Analysis",
            other => other.label(),
        }
    }

    /// Lower-case, dash separated form of the label.
    pub fn slug(&self) -> String {
        self.label().to_ascii_lowercase().replace(' ', "-")
    }

    /// Whether the mode produces a chart rather than a table.
    pub fn is_chart(&self) -> bool {
        !matches!(
            self,
            Self::SummaryStatistics | Self::MissingValues | Self::Outliers | Self::NegativeValues
        )
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    /// Accepts the label or its kebab-case form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.slug() == wanted)
            .ok_or_else(|| format!("Unknown analysis mode: '{}'", s.trim()))
    }
}
