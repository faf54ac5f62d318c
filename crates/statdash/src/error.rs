//! Error types for the dashboard data pipeline.
//!
//! Geometry and domain errors are contract violations and surface directly.
//! Upstream failures are recoverable: the fetch controller swaps in the
//! fallback dataset for the view. Malformed results are reported inline and
//! never substituted.
//!
//! Errors are serializable so a host UI can show them as `{code, message}`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the dashboard pipeline.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// No finite values were available to compute an axis domain.
    #[error("Cannot compute a scale domain from an empty value set")]
    EmptyDomain,

    /// The box body would have a negative pixel height.
    #[error("Degenerate box: scaled q1 ({q1_px}) lies above scaled q3 ({q3_px})")]
    DegenerateBox { q1_px: f64, q3_px: f64 },

    /// The analytics service answered with a failure status.
    #[error("Upstream request failed with status {status}: {message}")]
    UpstreamRequest { status: u16, message: String },

    /// The analytics service answered, but the payload has the wrong shape.
    #[error("Malformed {view} result: {reason}")]
    MalformedResult { view: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (e.g., a spawned task failed).
    #[error("Internal error: {0}")]
    Internal(String),

    /// HTTP transport error.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a [`DashboardError::MalformedResult`].
    pub fn malformed(view: impl Into<String>, reason: impl Into<String>) -> Self {
        DashboardError::MalformedResult {
            view: view.into(),
            reason: reason.into(),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDomain => "EMPTY_DOMAIN",
            Self::DegenerateBox { .. } => "DEGENERATE_BOX",
            Self::UpstreamRequest { .. } => "UPSTREAM_REQUEST_FAILED",
            Self::MalformedResult { .. } => "MALFORMED_RESULT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Http(_) => "HTTP_REQUEST_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error comes from talking to the analytics service.
    ///
    /// These are the failures that put a view into degraded mode.
    pub fn is_upstream_failure(&self) -> bool {
        match self {
            Self::UpstreamRequest { .. } | Self::Http(_) => true,
            Self::WithContext { source, .. } => source.is_upstream_failure(),
            _ => false,
        }
    }

    /// Check if this error means the service answered with a bad shape.
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::MalformedResult { .. } => true,
            Self::WithContext { source, .. } => source.is_malformed(),
            _ => false,
        }
    }
}

impl Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

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

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashboardError::Json(e).with_context(context))
    }
}
