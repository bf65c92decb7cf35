//! Release Backend Client Abstraction Layer
//!
//! This module provides the interface the dashboard uses to reach the
//! release backend. All business logic (storage, KPI computation, report
//! aggregation) lives behind these calls; the client performs no local
//! transformation.

mod http;

pub use http::HttpClient;

use async_trait::async_trait;
use batch_release_shared::{
    Batch, BatchQuery, Kpis, Overview, QualityEvent, ReleaseRequest, ReportData,
};

/// Error types for backend client operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReleaseClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for release backend clients
#[async_trait(?Send)]
pub trait ReleaseApi {
    /// `GET /api/batches`, filtered server-side
    async fn list_batches(&self, query: &BatchQuery) -> Result<Vec<Batch>, ReleaseClientError>;

    /// `GET /api/kpis`
    async fn get_kpis(&self) -> Result<Kpis, ReleaseClientError>;

    /// `POST /api/batches/{id}/release`; any non-2xx is an error
    async fn release_batch(&self, request: &ReleaseRequest) -> Result<(), ReleaseClientError>;

    /// `GET /api/quality-events`
    async fn quality_events(&self) -> Result<Vec<QualityEvent>, ReleaseClientError>;

    /// `GET /api/reports/summary`
    async fn report_summary(&self) -> Result<ReportData, ReleaseClientError>;

    /// Batches and KPIs together; either failing fails both.
    async fn overview(&self, query: &BatchQuery) -> Result<Overview, ReleaseClientError> {
        let (batches, kpis) = futures::join!(self.list_batches(query), self.get_kpis());
        Ok(Overview {
            batches: batches?,
            kpis: kpis?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batch_release_shared::{Applied, BatchStatus, Command, DashboardState, StatusFilter};
    use futures::executor::block_on;
    use std::cell::Cell;

    fn batch(id: &str) -> Batch {
        Batch {
            batch_id: id.to_string(),
            drug_name: "Stelara".to_string(),
            batch_name: format!("Lot {id}"),
            status: BatchStatus::Pending,
            temp_actual: 37.0,
            temp_check: true,
            purity_actual: 99.0,
            purity_check: true,
            manufactured_date: "2024-03-05".to_string(),
            expiry_date: "2026-03-05".to_string(),
            cycle_time_hours: 40.0,
            last_updated: "2024-03-07T14:05:09".to_string(),
            exceptions: None,
            signed_by: None,
        }
    }

    #[derive(Default)]
    struct MockApi {
        fail_batches: bool,
        fail_kpis: bool,
        fail_release: bool,
        batch_calls: Cell<usize>,
        kpi_calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl ReleaseApi for MockApi {
        async fn list_batches(&self, _query: &BatchQuery) -> Result<Vec<Batch>, ReleaseClientError> {
            self.batch_calls.set(self.batch_calls.get() + 1);
            if self.fail_batches {
                return Err(ReleaseClientError::RequestFailed("HTTP 500".into()));
            }
            Ok(vec![batch("B-001"), batch("B-002")])
        }

        async fn get_kpis(&self) -> Result<Kpis, ReleaseClientError> {
            self.kpi_calls.set(self.kpi_calls.get() + 1);
            if self.fail_kpis {
                return Err(ReleaseClientError::ConnectionFailed("refused".into()));
            }
            Ok(Kpis {
                total_batches: 2,
                pending_count: 2,
                ..Kpis::default()
            })
        }

        async fn release_batch(&self, _request: &ReleaseRequest) -> Result<(), ReleaseClientError> {
            if self.fail_release {
                return Err(ReleaseClientError::RequestFailed("Batch is already Released".into()));
            }
            Ok(())
        }

        async fn quality_events(&self) -> Result<Vec<QualityEvent>, ReleaseClientError> {
            Ok(Vec::new())
        }

        async fn report_summary(&self) -> Result<ReportData, ReleaseClientError> {
            Err(ReleaseClientError::InvalidResponse("unused".into()))
        }
    }

    /// Run a fetch command against the mock and apply its result
    fn run(api: &MockApi, state: &mut DashboardState, command: Command) -> Applied {
        let Command::FetchOverview { request, query } = command;
        let result = block_on(api.overview(&query));
        state.overview_loaded(request, result)
    }

    #[test]
    fn test_overview_fails_when_kpis_fail() {
        let api = MockApi { fail_kpis: true, ..MockApi::default() };

        let result = block_on(api.overview(&BatchQuery::new("", StatusFilter::All)));

        assert!(matches!(result, Err(ReleaseClientError::ConnectionFailed(_))));
        // Both requests are still issued
        assert_eq!(api.batch_calls.get(), 1);
        assert_eq!(api.kpi_calls.get(), 1);
    }

    #[test]
    fn test_overview_fails_when_batches_fail() {
        let api = MockApi { fail_batches: true, ..MockApi::default() };

        let result = block_on(api.overview(&BatchQuery::new("", StatusFilter::All)));

        assert!(matches!(result, Err(ReleaseClientError::RequestFailed(_))));
    }

    #[test]
    fn test_failed_overview_keeps_prior_data() {
        let api = MockApi::default();
        let mut state = DashboardState::new();
        let mount = state.mount();
        assert_eq!(run(&api, &mut state, mount), Applied::Updated);

        let failing = MockApi { fail_kpis: true, ..MockApi::default() };
        let refresh = state.set_search("B-").unwrap();
        assert_eq!(run(&failing, &mut state, refresh), Applied::Failed);

        assert_eq!(state.batches().len(), 2);
        assert_eq!(state.kpis().map(|k| k.total_batches), Some(2));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_successful_release_closes_panel_and_refetches_once() {
        let api = MockApi::default();
        let mut state = DashboardState::new();
        let mount = state.mount();
        run(&api, &mut state, mount);
        state.select_batch(batch("B-001"));

        let ok = block_on(api.release_batch(&ReleaseRequest::new("B-001", "J. Doe"))).is_ok();
        let refetch = state.release_finished(ok).unwrap();

        assert!(state.selected().is_none());
        assert_eq!(run(&api, &mut state, refetch), Applied::Updated);
        assert_eq!(api.batch_calls.get(), 2);
        assert_eq!(api.kpi_calls.get(), 2);
    }

    #[test]
    fn test_failed_release_keeps_panel_open() {
        let api = MockApi { fail_release: true, ..MockApi::default() };
        let mut state = DashboardState::new();
        state.select_batch(batch("B-001"));

        let ok = block_on(api.release_batch(&ReleaseRequest::new("B-001", "J. Doe"))).is_ok();

        assert!(state.release_finished(ok).is_none());
        assert_eq!(state.selected().map(|b| b.batch_id.as_str()), Some("B-001"));
    }
}
