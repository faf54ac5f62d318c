//! Fetch controller: one state machine per view.
//!
//! Each view moves `Idle -> Loading -> {Ready | Degraded | Failed}`. Every
//! request bumps the view's generation counter and carries it on its
//! [`RequestTicket`]; when a response arrives for a generation that is no
//! longer current it is dropped, so the most recently issued request always
//! decides what the view shows. The underlying HTTP request is not
//! cancelled.
//!
//! # Example
//!
//! ```rust,ignore
//! use statdash::{ResultFetchController, ViewKind};
//! use statdash::upstream::{HttpAnalyticsClient, ViewRequest};
//!
//! let client = HttpAnalyticsClient::new(config.clone())?;
//! let controller = ResultFetchController::builder(client)
//!     .config(config)
//!     .on_change(|kind, state| println!("{kind}: {:?}", state.resolution()))
//!     .build()?;
//!
//! controller.load(ViewRequest::Gini).await;
//! let state = controller.state(ViewKind::Gini);
//! ```

mod state;

pub use state::{DataSource, ErrorReport, RequestTicket, Resolution, ViewSnapshot, ViewState};

use crate::config::{ConfigValidationError, DashboardConfig};
use crate::error::Result;
use crate::fallback::FallbackCatalog;
use crate::types::{ViewData, ViewKind};
use crate::upstream::{AnalyticsService, ViewRequest};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

type ChangeCallback = dyn Fn(ViewKind, &ViewState) + Send + Sync;

#[derive(Debug, Default)]
struct ViewSlot {
    generation: u64,
    state: ViewState,
}

/// Drives every view of the dashboard against one analytics service.
pub struct ResultFetchController<S> {
    service: S,
    config: DashboardConfig,
    fallback: Arc<FallbackCatalog>,
    on_change: Option<Arc<ChangeCallback>>,
    views: Mutex<HashMap<ViewKind, ViewSlot>>,
}

static_assertions::assert_impl_all!(ResultFetchController<crate::upstream::OfflineService>: Send, Sync);

impl<S: AnalyticsService> ResultFetchController<S> {
    pub fn builder(service: S) -> ResultFetchControllerBuilder<S> {
        ResultFetchControllerBuilder {
            service,
            config: None,
            fallback: None,
            on_change: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn fallback(&self) -> &FallbackCatalog {
        &self.fallback
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Current state of `kind`.
    pub fn state(&self, kind: ViewKind) -> ViewState {
        self.views
            .lock()
            .get(&kind)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    /// Latest generation issued for `kind`; `0` before the first request.
    pub fn generation(&self, kind: ViewKind) -> u64 {
        self.views.lock().get(&kind).map_or(0, |slot| slot.generation)
    }

    /// Start a request: the view enters `Loading` under a new generation.
    ///
    /// Any ticket issued earlier for the same view becomes stale.
    pub fn begin(&self, request: ViewRequest) -> RequestTicket {
        let kind = request.kind();
        let (ticket, state) = {
            let mut views = self.views.lock();
            let slot = views.entry(kind).or_default();
            slot.generation += 1;
            slot.state = ViewState::Loading {
                generation: slot.generation,
                request: request.clone(),
            };
            let ticket = RequestTicket {
                kind,
                generation: slot.generation,
                request,
            };
            (ticket, slot.state.clone())
        };

        debug!(view = %kind, generation = ticket.generation, "Issuing request");
        self.notify(kind, &state);
        ticket
    }

    /// Apply the outcome of a request.
    ///
    /// Live results are decoded and shape-checked. Upstream failures switch
    /// to the view's fallback dataset when one exists and fallback is
    /// enabled; every other failure moves the view to `Failed`. Outcomes for
    /// a superseded ticket change nothing and return
    /// [`Resolution::Discarded`].
    pub fn complete(&self, ticket: &RequestTicket, outcome: Result<Value>) -> Resolution {
        let kind = ticket.kind;
        let next = self.resolve(ticket, outcome);

        {
            let mut views = self.views.lock();
            let slot = views.entry(kind).or_default();
            if slot.generation != ticket.generation {
                debug!(
                    view = %kind,
                    stale = ticket.generation,
                    current = slot.generation,
                    "Discarding stale response"
                );
                return Resolution::Discarded;
            }
            slot.state = next.clone();
        }

        self.notify(kind, &next);
        next.resolution().unwrap_or(Resolution::Discarded)
    }

    /// Issue `request`, wait for the service and apply the outcome.
    pub async fn load(&self, request: ViewRequest) -> Resolution {
        let ticket = self.begin(request);
        let outcome = self.service.fetch(ticket.request()).await;
        self.complete(&ticket, outcome)
    }

    fn resolve(&self, ticket: &RequestTicket, outcome: Result<Value>) -> ViewState {
        let kind = ticket.kind;
        let snapshot = |data: ViewData, source: DataSource| ViewSnapshot {
            generation: ticket.generation,
            request: ticket.request.clone(),
            data,
            source,
            received_at: Utc::now(),
        };

        let err = match outcome.and_then(|body| ViewData::decode(kind, body)) {
            Ok(data) => {
                info!(view = %kind, generation = ticket.generation, service = self.service.name(), "View ready");
                return ViewState::Ready(snapshot(data, DataSource::Live));
            }
            Err(err) => err,
        };

        if err.is_upstream_failure()
            && self.config.use_fallback
            && let Some(data) = self.fallback.for_view(kind)
        {
            warn!(view = %kind, error = %err, "Analytics service unavailable, showing fallback data");
            return ViewState::Degraded {
                snapshot: snapshot(data, DataSource::Fallback),
                cause: ErrorReport::from(&err),
            };
        }

        warn!(view = %kind, code = err.error_code(), error = %err, "View failed");
        ViewState::Failed {
            generation: ticket.generation,
            request: ticket.request.clone(),
            error: ErrorReport::from(&err),
        }
    }

    fn notify(&self, kind: ViewKind, state: &ViewState) {
        if let Some(callback) = &self.on_change {
            callback(kind, state);
        }
    }
}

/// Builder for [`ResultFetchController`].
pub struct ResultFetchControllerBuilder<S> {
    service: S,
    config: Option<DashboardConfig>,
    fallback: Option<Arc<FallbackCatalog>>,
    on_change: Option<Arc<ChangeCallback>>,
}

impl<S: AnalyticsService> ResultFetchControllerBuilder<S> {
    pub fn config(mut self, config: DashboardConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the built-in fallback datasets.
    pub fn fallback(mut self, catalog: Arc<FallbackCatalog>) -> Self {
        self.fallback = Some(catalog);
        self
    }

    /// Called after every state transition, outside the state lock.
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(ViewKind, &ViewState) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    /// Build the controller.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<ResultFetchController<S>, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(ResultFetchController {
            service: self.service,
            config,
            fallback: self.fallback.unwrap_or_else(FallbackCatalog::shared),
            on_change: self.on_change,
            views: Mutex::new(HashMap::new()),
        })
    }
}
