//! Batch Table Component
//!
//! Pure rendering of the batch list. Compliance lights come straight from
//! the backend's `temp_check` / `purity_check` flags.

use leptos::*;
use batch_release_shared::{format, Batch, BatchStatus};

/// Clickable batch rows with loading and empty states
#[component]
pub fn BatchTable(
    batches: Memo<Vec<Batch>>,
    loading: Memo<bool>,
    #[prop(into)] selected_id: Signal<Option<String>>,
    #[prop(into)] on_select: Callback<Batch>,
) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl border border-slate-200 overflow-hidden shadow-sm">
            {move || {
                if loading.get() {
                    view! {
                        <div class="py-16 text-center text-slate-500">"Loading batch data..."</div>
                    }.into_view()
                } else if batches.with(|b| b.is_empty()) {
                    view! {
                        <div class="py-16 text-center text-slate-500">"No batches found"</div>
                    }.into_view()
                } else {
                    view! {
                        <table class="w-full text-sm">
                            <thead class="bg-slate-100 text-left text-xs uppercase text-slate-500">
                                <tr>
                                    <th class="px-4 py-3">"Batch ID"</th>
                                    <th class="px-4 py-3">"Drug"</th>
                                    <th class="px-4 py-3">"Status"</th>
                                    <th class="px-4 py-3">"Temp Check (37°C ± 0.5°C)"</th>
                                    <th class="px-4 py-3">"Purity Check (>98%)"</th>
                                    <th class="px-4 py-3">"Cycle Time"</th>
                                    <th class="px-4 py-3">"Manufactured"</th>
                                    <th class="px-4 py-3">"Last Updated"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || batches.get()
                                    key=|batch| batch.batch_id.clone()
                                    children=move |batch| view! {
                                        <BatchRow batch selected_id on_select />
                                    }
                                />
                            </tbody>
                        </table>
                    }.into_view()
                }
            }}
        </div>
    }
}

#[component]
fn BatchRow(
    batch: Batch,
    selected_id: Signal<Option<String>>,
    on_select: Callback<Batch>,
) -> impl IntoView {
    let id = batch.batch_id.clone();
    let is_selected = move || selected_id.with(|s| s.as_deref() == Some(id.as_str()));
    let row = batch.clone();

    view! {
        <tr
            class=move || {
                if is_selected() {
                    "border-t border-slate-100 cursor-pointer bg-blue-50"
                } else {
                    "border-t border-slate-100 cursor-pointer hover:bg-slate-50"
                }
            }
            on:click=move |_| on_select.call(row.clone())
        >
            <td class="px-4 py-3 font-mono font-medium text-blue-700">{batch.batch_id.clone()}</td>
            <td class="px-4 py-3">{batch.drug_name.clone()}</td>
            <td class="px-4 py-3"><StatusBadge status=batch.status /></td>
            <td class="px-4 py-3">
                <TrafficLight pass=batch.temp_check value=format::temperature(batch.temp_actual, 1) />
            </td>
            <td class="px-4 py-3">
                <TrafficLight pass=batch.purity_check value=format::purity(batch.purity_actual, 1) />
            </td>
            <td class="px-4 py-3">{format::hours_short(batch.cycle_time_hours)}</td>
            <td class="px-4 py-3">{format::date(&batch.manufactured_date)}</td>
            <td class="px-4 py-3 text-slate-500">{format::date_time(&batch.last_updated)}</td>
        </tr>
    }
}

/// Status pill
#[component]
pub fn StatusBadge(status: BatchStatus) -> impl IntoView {
    view! {
        <span class=format!("px-2 py-0.5 rounded-full text-xs font-semibold {}", status.badge_class())>
            {status.label()}
        </span>
    }
}

/// Pass/fail dot with the measured value
#[component]
fn TrafficLight(pass: bool, value: String) -> impl IntoView {
    let dot = if pass { "bg-green-600" } else { "bg-red-600" };
    let text = if pass { "text-slate-700" } else { "text-red-700 font-semibold" };

    view! {
        <div class="flex items-center gap-2">
            <span class=format!("w-2.5 h-2.5 rounded-full {dot}") />
            <span class=text>{value}</span>
        </div>
    }
}
