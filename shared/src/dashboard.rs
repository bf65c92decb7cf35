//! Dashboard view state
//!
//! Owns the top-level UI state (active tab, batch list, KPI snapshot,
//! selection, filters) and decides which requests to issue. It performs no
//! I/O: every transition that needs the network returns a [`Command`] and the
//! caller reports the outcome back.
//!
//! Overview fetches are tagged with a monotonically increasing [`RequestId`].
//! Only the most recently issued request may update state, so a superseded
//! response landing late is dropped instead of overwriting fresher data.

use crate::messages::{Batch, Kpis};
use crate::query::{BatchQuery, StatusFilter};

/// Sequence number of an overview fetch
pub type RequestId = u64;

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    BatchRelease,
    QualityEvents,
    Reports,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::BatchRelease, Tab::QualityEvents, Tab::Reports]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::BatchRelease => "Batch Release",
            Tab::QualityEvents => "Quality Events",
            Tab::Reports => "Reports",
        }
    }
}

/// Lifecycle of the overview data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// First fetch outstanding
    Loading,
    /// At least one fetch succeeded
    Loaded,
    /// Every fetch so far failed
    Error,
}

/// Batches and KPIs, fetched together
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub batches: Vec<Batch>,
    pub kpis: Kpis,
}

/// Side effects requested by a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch `GET /api/batches` and `GET /api/kpis` together
    FetchOverview { request: RequestId, query: BatchQuery },
}

/// Outcome of applying an overview response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    /// Fetch failed; prior data kept
    Failed,
    /// A newer request was issued since
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    active_tab: Tab,
    batches: Vec<Batch>,
    kpis: Option<Kpis>,
    selected: Option<Batch>,
    query: BatchQuery,
    load: LoadState,
    last_issued: RequestId,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn kpis(&self) -> Option<&Kpis> {
        self.kpis.as_ref()
    }

    pub fn selected(&self) -> Option<&Batch> {
        self.selected.as_ref()
    }

    pub fn search(&self) -> &str {
        &self.query.search
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.query.status
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    /// True until the first overview fetch settles
    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Idle | LoadState::Loading)
    }

    /// Id of the most recently issued overview request
    pub fn latest_request(&self) -> RequestId {
        self.last_issued
    }

    /// Initial fetch
    pub fn mount(&mut self) -> Command {
        self.fetch_overview()
    }

    /// Every change triggers a fetch; no debounce.
    pub fn set_search(&mut self, search: impl Into<String>) -> Option<Command> {
        let search = search.into();
        if search == self.query.search {
            return None;
        }
        self.query.search = search;
        Some(self.fetch_overview())
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) -> Option<Command> {
        if status == self.query.status {
            return None;
        }
        self.query.status = status;
        Some(self.fetch_overview())
    }

    /// Issue a new overview request, superseding any in flight.
    pub fn fetch_overview(&mut self) -> Command {
        self.last_issued += 1;
        if self.load == LoadState::Idle {
            self.load = LoadState::Loading;
        }
        Command::FetchOverview {
            request: self.last_issued,
            query: self.query.clone(),
        }
    }

    /// Apply the outcome of an overview request.
    pub fn overview_loaded<E>(&mut self, request: RequestId, result: Result<Overview, E>) -> Applied {
        if request != self.last_issued {
            return Applied::Stale;
        }

        match result {
            Ok(overview) => {
                self.batches = overview.batches;
                self.kpis = Some(overview.kpis);
                self.load = LoadState::Loaded;
                Applied::Updated
            }
            Err(_) => {
                if self.load == LoadState::Loading {
                    self.load = LoadState::Error;
                }
                Applied::Failed
            }
        }
    }

    pub fn select_batch(&mut self, batch: Batch) {
        self.selected = Some(batch);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Switching tabs always drops the selection.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.selected = None;
    }

    /// Outcome of `POST /api/batches/{id}/release`. On success the panel
    /// closes and the overview is fetched once; on failure nothing changes.
    pub fn release_finished(&mut self, ok: bool) -> Option<Command> {
        if !ok {
            return None;
        }
        self.selected = None;
        Some(self.fetch_overview())
    }
}
