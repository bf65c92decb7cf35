//! Root Application Component
//!
//! This module contains the main App component that sets up:
//! - Global state provider
//! - Header with tab navigation
//! - The initial overview fetch

use leptos::*;
use leptos_meta::*;
use batch_release_shared::Tab;

use crate::components::common::Header;
use crate::components::quality::QualityEvents;
use crate::components::release::BatchReleaseView;
use crate::components::reports::Reports;
use crate::state::AppState;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Initialize global state
    let app_state = AppState::new();
    provide_context(app_state.clone());

    // Initial fetch of batches and KPIs
    {
        let app_state = app_state.clone();
        create_effect(move |prev_run: Option<()>| {
            // Only run once
            if prev_run.is_none() {
                app_state.dispatch(|d| Some(d.mount()));
            }
        });
    }

    let dashboard = app_state.dashboard;
    let active_tab = create_memo(move |_| dashboard.with(|d| d.active_tab()));

    view! {
        <Title text="Batch Release" />
        <div class="min-h-screen flex flex-col bg-slate-50 text-slate-800">
            <Header />
            <main class="flex-1 overflow-auto">
                {move || match active_tab.get() {
                    Tab::BatchRelease => view! { <BatchReleaseView /> }.into_view(),
                    Tab::QualityEvents => view! { <QualityEvents /> }.into_view(),
                    Tab::Reports => view! { <Reports /> }.into_view(),
                }}
            </main>
        </div>
    }
}
