//! Error types for the solar EDA toolkit.
//!
//! Every analysis and renderer returns [`EdaError`]. The dashboard shell turns
//! these into displayable messages, so errors are serializable as a
//! `{ code, message }` pair.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for analyses, renderers and the dashboard shell.
#[derive(Error, Debug)]
pub enum EdaError {
    /// Column required by an analysis was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// An analysis was requested before any file was uploaded.
    #[error("No data loaded")]
    NoDataLoaded,

    /// A flag column holds values that are not a clean boolean encoding.
    #[error("Column '{column}' is not a boolean flag: {reason}")]
    InvalidFlag { column: String, reason: String },

    /// No valid values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The uploaded file contained no bytes.
    #[error("Upload '{0}' is empty")]
    EmptyUpload(String),

    /// Every CSV loading strategy failed.
    #[error("Failed to parse CSV '{name}': {reason}")]
    CsvParse { name: String, reason: String },

    /// Chart drawing failed.
    #[error("Failed to render chart: {0}")]
    RenderFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used by the shell when displaying failures.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::InvalidFlag { .. } => "INVALID_FLAG",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyUpload(_) => "EMPTY_UPLOAD",
            Self::CsvParse { .. } => "CSV_PARSE_ERROR",
            Self::RenderFailed(_) => "RENDER_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(EdaError::NoDataLoaded.error_code(), "NO_DATA_LOADED");
        assert_eq!(
            EdaError::ColumnNotFound("GHI".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = EdaError::ColumnNotFound("TModA".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("TModA"));
    }

    #[test]
    fn test_with_context() {
        let error = EdaError::ColumnNotFound("RH".to_string()).with_context("Temperature Analysis");
        assert!(error.to_string().contains("Temperature Analysis"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
