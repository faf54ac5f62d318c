//! Configuration for the dashboard pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic controller setup.

use serde::{Deserialize, Serialize};

/// Default analytics service endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default timeout for upstream requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of bootstrap resamples requested for the Monte Carlo view.
pub const DEFAULT_MONTE_CARLO_SIMULATIONS: u32 = 1000;

/// Configuration for the fetch controller and its upstream client.
///
/// Use [`DashboardConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use statdash::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .base_url("http://analytics.internal:8000/api")
///     .timeout_secs(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the analytics service, without a trailing slash.
    /// Default: "http://localhost:8000/api"
    pub base_url: String,

    /// Request timeout in seconds.
    /// Default: 30
    pub timeout_secs: u64,

    /// Whether an upstream failure substitutes the view's fallback dataset.
    /// When false, the view moves to `Failed` instead of `Degraded`.
    /// Default: true
    pub use_fallback: bool,

    /// Number of resamples requested from the Monte Carlo endpoint when the
    /// request does not name one.
    /// Default: 1000
    pub monte_carlo_simulations: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_fallback: true,
            monte_carlo_simulations: DEFAULT_MONTE_CARLO_SIMULATIONS,
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
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout(self.timeout_secs));
        }

        if self.monte_carlo_simulations == 0 {
            return Err(ConfigValidationError::InvalidSimulationCount(
                self.monte_carlo_simulations,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid base URL '{0}' (must start with http:// or https://)")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout: {0}s (must be at least 1)")]
    InvalidTimeout(u64),

    #[error("Invalid Monte Carlo simulation count: {0} (must be at least 1)")]
    InvalidSimulationCount(u32),
}

impl From<ConfigValidationError> for crate::error::DashboardError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::DashboardError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    use_fallback: Option<bool>,
    monte_carlo_simulations: Option<u32>,
}

impl DashboardConfigBuilder {
    /// Set the analytics service base URL.
    ///
    /// A trailing slash is stripped so paths can be appended directly.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let url: String = base_url.into();
        self.base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Enable or disable fallback substitution on upstream failure.
    pub fn use_fallback(mut self, use_fallback: bool) -> Self {
        self.use_fallback = Some(use_fallback);
        self
    }

    /// Set the default Monte Carlo resample count.
    pub fn monte_carlo_simulations(mut self, n: u32) -> Self {
        self.monte_carlo_simulations = Some(n);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DashboardConfig` or an error if validation fails.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let config = DashboardConfig {
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            use_fallback: self.use_fallback.unwrap_or(true),
            monte_carlo_simulations: self
                .monte_carlo_simulations
                .unwrap_or(DEFAULT_MONTE_CARLO_SIMULATIONS),
        };

        config.validate()?;
        Ok(config)
    }
}
