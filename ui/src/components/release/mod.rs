//! Batch Release View
//!
//! KPI strip, search/status toolbar, batch table and the review panel for
//! the selected batch.

mod batch_panel;
mod batch_table;
mod kpi_strip;

pub use batch_panel::BatchPanel;
pub use batch_table::{BatchTable, StatusBadge};
pub use kpi_strip::KpiStrip;

use leptos::*;
use batch_release_shared::{Batch, StatusFilter};

use crate::components::common::SearchIcon;
use crate::state::use_app_state;

#[component]
pub fn BatchReleaseView() -> impl IntoView {
    let app_state = use_app_state();
    let dashboard = app_state.dashboard;

    // Slices, so unrelated updates don't rebuild the table or the panel
    let loading = create_memo(move |_| dashboard.with(|d| d.is_loading()));
    let batches = create_memo(move |_| dashboard.with(|d| d.batches().to_vec()));
    let kpis = create_memo(move |_| dashboard.with(|d| d.kpis().cloned()));
    let selected = create_memo(move |_| dashboard.with(|d| d.selected().cloned()));
    let search = create_memo(move |_| dashboard.with(|d| d.search().to_string()));
    let status_filter = create_memo(move |_| dashboard.with(|d| d.status_filter()));
    let selected_id = Signal::derive(move || selected.with(|s| s.as_ref().map(|b| b.batch_id.clone())));

    let on_search = {
        let app_state = app_state.clone();
        move |e: ev::Event| {
            let value = event_target_value(&e);
            app_state.dispatch(|d| d.set_search(value));
        }
    };

    let on_status = {
        let app_state = app_state.clone();
        move |e: ev::Event| {
            let status = StatusFilter::parse(&event_target_value(&e));
            app_state.dispatch(|d| d.set_status_filter(status));
        }
    };

    let on_select = {
        let app_state = app_state.clone();
        move |batch: Batch| {
            app_state.dispatch(|d| {
                d.select_batch(batch);
                None
            })
        }
    };

    let on_close = Callback::new(move |_: ()| {
        app_state.dispatch(|d| {
            d.clear_selection();
            None
        })
    });

    view! {
        <div class="flex h-full">
            <div class="flex-1 overflow-auto p-6 space-y-6">
                <KpiStrip kpis loading />

                // Toolbar
                <div class="flex items-center gap-3">
                    <div class="relative flex-1 max-w-md">
                        <SearchIcon class="w-4 h-4 absolute left-3 top-1/2 -translate-y-1/2 text-slate-400" />
                        <input
                            type="text"
                            class="w-full pl-9 pr-3 py-2 rounded-md border border-slate-300 bg-white text-sm"
                            placeholder="Search batches..."
                            prop:value=move || search.get()
                            on:input=on_search
                        />
                    </div>
                    <select
                        class="px-3 py-2 rounded-md border border-slate-300 bg-white text-sm"
                        prop:value=move || status_filter.get().value()
                        on:change=on_status
                    >
                        {StatusFilter::options()
                            .into_iter()
                            .map(|(filter, label)| view! {
                                <option value=filter.value()>{label}</option>
                            })
                            .collect_view()}
                    </select>
                </div>

                <BatchTable batches loading selected_id on_select />
            </div>

            {move || selected.get().map(|batch| view! {
                <BatchPanel batch on_close />
            })}
        </div>
    }
}
