//! Access to the analytics service.
//!
//! The fetch controller only depends on the [`AnalyticsService`] trait, which
//! turns a [`ViewRequest`] into the raw JSON body of the response. Decoding
//! into typed results happens in the controller.
//!
//! # Implementing a New Service
//!
//! ```rust,ignore
//! use statdash::upstream::{AnalyticsService, ViewRequest};
//!
//! struct CachedService { /* ... */ }
//!
//! impl AnalyticsService for CachedService {
//!     async fn fetch(&self, request: &ViewRequest) -> statdash::Result<serde_json::Value> {
//!         // look up or forward the request
//!     }
//!
//!     fn name(&self) -> &str {
//!         "cached"
//!     }
//! }
//! ```

mod http;
mod request;

pub use http::HttpAnalyticsClient;
pub use request::{DistributionFamily, Endpoint, Method, ViewRequest};

use crate::error::{DashboardError, Result};
use serde_json::Value;
use std::future::Future;

/// Source of raw statistical results.
///
/// Implementations must be `Send + Sync`; one instance serves every view.
///
/// # Error Handling
///
/// Transport failures and non-success statuses should come back as
/// [`DashboardError::Http`] or [`DashboardError::UpstreamRequest`] so the
/// controller recognises them as upstream failures and switches the view
/// to its fallback dataset.
pub trait AnalyticsService: Send + Sync {
    /// Issue exactly one request for `request` and return the response body.
    fn fetch(&self, request: &ViewRequest) -> impl Future<Output = Result<Value>> + Send;

    /// Service name for logging.
    fn name(&self) -> &str;
}

/// A service that is never reachable.
///
/// Every view it serves ends up in degraded mode; used for offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineService;

impl AnalyticsService for OfflineService {
    async fn fetch(&self, request: &ViewRequest) -> Result<Value> {
        Err(DashboardError::UpstreamRequest {
            status: 503,
            message: format!("offline: {} not requested", request.kind()),
        })
    }

    fn name(&self) -> &str {
        "offline"
    }
}
