//! Global State Management
//!
//! This module owns the dashboard state signal and runs the commands its
//! transitions return. Transitions themselves live in
//! [`batch_release_shared::DashboardState`]; this is the I/O half.

use leptos::*;
use batch_release_shared::{Applied, Command, DashboardState, ReleaseRequest};

use crate::client::{HttpClient, ReleaseApi, ReleaseClientError};

/// Global application state
#[derive(Clone)]
pub struct AppState {
    /// Tab, batches, KPIs, selection and filters
    pub dashboard: RwSignal<DashboardState>,

    client: HttpClient,
}

impl AppState {
    /// Create a new app state talking to the page origin
    pub fn new() -> Self {
        Self::with_client(HttpClient::from_window())
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self {
            dashboard: create_rw_signal(DashboardState::new()),
            client,
        }
    }

    /// The backend client, for views that fetch their own data
    pub fn client(&self) -> HttpClient {
        self.client.clone()
    }

    /// Apply a transition and run whatever it asks for.
    pub fn dispatch(&self, transition: impl FnOnce(&mut DashboardState) -> Option<Command>) {
        if let Some(command) = self.dashboard.try_update(transition).flatten() {
            self.run(command);
        }
    }

    /// Execute a command in the background
    pub fn run(&self, command: Command) {
        match command {
            Command::FetchOverview { request, query } => {
                let dashboard = self.dashboard;
                let client = self.client.clone();

                spawn_local(async move {
                    let result = client.overview(&query).await;
                    if let Err(e) = &result {
                        tracing::error!(request, error = %e, "Failed to load batches and KPIs");
                    }

                    // The signal is gone once the app unmounts.
                    let applied = dashboard.try_update(|d| d.overview_loaded(request, result));
                    if applied == Some(Applied::Stale) {
                        tracing::debug!(request, "Discarded superseded overview response");
                    }
                });
            }
        }
    }

    /// Post a release sign-off and refresh on success
    pub async fn release(
        &self,
        batch_id: String,
        signed_by: String,
    ) -> Result<(), ReleaseClientError> {
        let request = ReleaseRequest::new(batch_id, signed_by);
        let result = self.client.release_batch(&request).await;

        match &result {
            Ok(()) => tracing::info!(
                batch_id = %request.batch_id,
                signed_by = %request.signed_by,
                "Batch released"
            ),
            Err(e) => tracing::error!(batch_id = %request.batch_id, error = %e, "Release failed"),
        }

        let ok = result.is_ok();
        self.dispatch(|d| d.release_finished(ok));
        result
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The state provided by [`crate::App`]
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}
