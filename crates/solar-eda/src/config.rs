//! Configuration for the dashboard shell.
//!
//! Uses the builder pattern, mirroring how the analyses are invoked from the
//! CLI: every field has a sensible default so `DashboardConfig::default()`
//! reproduces the stock dashboard.

use serde::{Deserialize, Serialize};

/// Number of data rows kept from an upload.
pub const DEFAULT_ROW_CAP: usize = 1000;

/// Number of parsed uploads kept in the upload cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Site label used in chart titles.
pub const DEFAULT_SITE_NAME: &str = "Benin";

/// Configuration for [`crate::DashboardShell`].
///
/// # Example
///
/// ```rust,ignore
/// use solar_eda::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .row_cap(500)
///     .site_name("Togo")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Maximum number of data rows kept after parsing an upload.
    /// Default: 1000
    pub row_cap: usize,

    /// Maximum number of distinct uploads held by the upload cache.
    /// The least recently used upload is evicted first.
    /// Default: 8
    pub cache_capacity: usize,

    /// Whether uploads are cleaned before analyses run on them.
    /// When off, every mode sees the upload exactly as parsed.
    /// Default: false
    pub clean_uploads: bool,

    /// Site label used in chart titles ("{site} Time Series").
    /// Default: "Benin"
    pub site_name: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            row_cap: DEFAULT_ROW_CAP,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            clean_uploads: false,
            site_name: DEFAULT_SITE_NAME.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.row_cap == 0 {
            return Err(ConfigValidationError::InvalidRowCap(self.row_cap));
        }

        if self.cache_capacity == 0 {
            return Err(ConfigValidationError::InvalidCacheCapacity(
                self.cache_capacity,
            ));
        }

        if self.site_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptySiteName);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid row cap: {0} (must be at least 1)")]
    InvalidRowCap(usize),

    #[error("Invalid cache capacity: {0} (must be at least 1)")]
    InvalidCacheCapacity(usize),

    #[error("Site name must not be empty")]
    EmptySiteName,
}

impl From<ConfigValidationError> for crate::EdaError {
    fn from(e: ConfigValidationError) -> Self {
        crate::EdaError::InvalidConfig(e.to_string())
    }
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    row_cap: Option<usize>,
    cache_capacity: Option<usize>,
    clean_uploads: Option<bool>,
    site_name: Option<String>,
}

impl DashboardConfigBuilder {
    /// Set how many data rows are kept from each upload.
    pub fn row_cap(mut self, rows: usize) -> Self {
        self.row_cap = Some(rows);
        self
    }

    /// Set how many parsed uploads the cache keeps.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Enable or disable cleaning of uploads before analysis.
    pub fn clean_uploads(mut self, clean: bool) -> Self {
        self.clean_uploads = Some(clean);
        self
    }

    /// Set the site label used in chart titles.
    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            row_cap: self.row_cap.unwrap_or(defaults.row_cap),
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
            clean_uploads: self.clean_uploads.unwrap_or(defaults.clean_uploads),
            site_name: self.site_name.unwrap_or(defaults.site_name),
        };

        config.validate()?;
        Ok(config)
    }
}
