//! Per-view state exposed to hosts.

use crate::error::DashboardError;
use crate::types::{ViewData, ViewKind};
use crate::upstream::ViewRequest;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where the data on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Decoded from the analytics service's response.
    Live,
    /// Substituted from the fallback catalog after an upstream failure.
    Fallback,
}

/// A resolved result, as it was when it was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub generation: u64,
    pub request: ViewRequest,
    pub data: ViewData,
    pub source: DataSource,
    pub received_at: DateTime<Utc>,
}

/// Inline error shown in place of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
}

impl From<&DashboardError> for ErrorReport {
    fn from(err: &DashboardError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Lifecycle of one view.
///
/// `Idle -> Loading -> {Ready | Degraded | Failed}`; any new request moves
/// the view back to `Loading`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        generation: u64,
        request: ViewRequest,
    },
    Ready(ViewSnapshot),
    Degraded {
        snapshot: ViewSnapshot,
        /// The upstream failure that triggered the substitution.
        cause: ErrorReport,
    },
    Failed {
        generation: u64,
        request: ViewRequest,
        error: ErrorReport,
    },
}

impl ViewState {
    /// Generation this state belongs to; `0` while idle.
    pub fn generation(&self) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Loading { generation, .. } | Self::Failed { generation, .. } => *generation,
            Self::Ready(snapshot) | Self::Degraded { snapshot, .. } => snapshot.generation,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn snapshot(&self) -> Option<&ViewSnapshot> {
        match self {
            Self::Ready(snapshot) | Self::Degraded { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// Data currently displayed, live or substituted.
    pub fn data(&self) -> Option<&ViewData> {
        self.snapshot().map(|s| &s.data)
    }

    pub fn error(&self) -> Option<&ErrorReport> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn resolution(&self) -> Option<Resolution> {
        match self {
            Self::Ready(_) => Some(Resolution::Ready),
            Self::Degraded { .. } => Some(Resolution::Degraded),
            Self::Failed { .. } => Some(Resolution::Failed),
            Self::Idle | Self::Loading { .. } => None,
        }
    }
}

/// Handle for one issued request.
///
/// Only the controller creates tickets; completing a ticket whose generation
/// has been superseded is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    pub(super) kind: ViewKind,
    pub(super) generation: u64,
    pub(super) request: ViewRequest,
}

impl RequestTicket {
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &ViewRequest {
        &self.request
    }
}

/// What completing a request did to its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Ready,
    Degraded,
    Failed,
    /// A newer request for the same view was issued; the outcome was dropped.
    Discarded,
}
