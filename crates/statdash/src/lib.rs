//! Statistical Dashboard Data Pipeline
//!
//! Turns the raw results of a statistics service into chart-ready data for
//! a browser dashboard.
//!
//! # Overview
//!
//! - **Result types**: typed, shape-checked decodings of every service response
//! - **Chart assembly**: index-aligned records for Recharts-style series charts
//! - **Scale domains**: padded y-axis domains and linear pixel scales
//! - **Box geometry**: whisker, cap, body and median coordinates per category
//! - **Heat cells**: sign-based hue and magnitude-based alpha for matrices
//! - **Fallback datasets**: static substitutes shown when the service is down
//! - **Fetch controller**: per-view state with stale-response discarding
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use statdash::{ChartModel, DashboardConfig, ResultFetchController, ViewKind};
//! use statdash::upstream::{DistributionFamily, HttpAnalyticsClient, ViewRequest};
//!
//! let config = DashboardConfig::builder()
//!     .base_url("http://localhost:8000/api")
//!     .build()?;
//! let controller = ResultFetchController::builder(HttpAnalyticsClient::new(config.clone())?)
//!     .config(config)
//!     .build()?;
//!
//! controller
//!     .load(ViewRequest::Distribution {
//!         column: "Avg_Daily_Usage_Hours".into(),
//!         family: DistributionFamily::Norm,
//!     })
//!     .await;
//!
//! if let Some(data) = controller.state(ViewKind::Distribution).data() {
//!     let model = ChartModel::build(data)?;
//!     println!("{}", serde_json::to_string_pretty(&model)?);
//! }
//! ```
//!
//! # Degraded Mode
//!
//! When the service is unreachable, views switch to the datasets of a
//! [`FallbackCatalog`] and report [`ViewState::Degraded`]. Malformed
//! responses are never substituted; they surface as [`ViewState::Failed`]
//! with an inline [`ErrorReport`].

pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod fallback;
pub mod types;
pub mod upstream;

// Re-exports for convenient access
pub use chart::{
    BoxPlotChart, ChartModel, DistributionChart, Domain, HeatCellStyle, HeatmapChart,
    LinearScale, PcaChart, box_geometry, heat_cell_style, padded_domain,
};
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder};
pub use controller::{
    DataSource, ErrorReport, RequestTicket, Resolution, ResultFetchController,
    ResultFetchControllerBuilder, ViewSnapshot, ViewState,
};
pub use error::{DashboardError, Result, ResultExt};
pub use fallback::FallbackCatalog;
pub use types::{
    AssociationMatrix, BoxPlotGroup, DatasetSummary, DistributionStats, DistributionSummary,
    FiveNumberSummary, GiniResult, MonteCarloResult, PcaResult, RegressionSummary, Series,
    TTestResult, ViewData, ViewKind,
};
pub use upstream::{AnalyticsService, HttpAnalyticsClient, OfflineService, ViewRequest};
