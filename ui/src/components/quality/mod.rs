//! Quality Events Component
//!
//! Batches the backend reports with a temperature excursion or purity
//! failure, filtered client-side by event type.

use leptos::*;
use batch_release_shared::{
    format, purity_minimum_caption, temperature_target_caption, EventFilter, EventSummary,
    QualityEvent,
};

use crate::client::ReleaseApi;
use crate::components::common::{AlertTriangleIcon, FlaskIcon, ThermometerIcon};
use crate::components::release::StatusBadge;
use crate::state::use_app_state;

#[component]
pub fn QualityEvents() -> impl IntoView {
    let client = use_app_state().client();
    let (events, set_events) = create_signal(Vec::<QualityEvent>::new());
    let (loading, set_loading) = create_signal(true);
    let (filter, set_filter) = create_signal(EventFilter::All);

    // Fetch events on mount
    create_effect(move |_| {
        let client = client.clone();
        spawn_local(async move {
            match client.quality_events().await {
                Ok(data) => set_events.set(data),
                Err(e) => tracing::error!(error = %e, "Failed to load quality events"),
            }
            set_loading.set(false);
        });
    });

    let summary = create_memo(move |_| events.with(|e| EventSummary::from_events(e)));
    let filtered = create_memo(move |_| {
        let filter = filter.get();
        events.with(|e| filter.apply(e).into_iter().cloned().collect::<Vec<_>>())
    });

    view! {
        <Show
            when=move || !loading.get()
            fallback=|| view! {
                <div class="py-16 text-center text-slate-500">"Loading quality events..."</div>
            }
        >
            <div class="p-6 space-y-6">
                // Header
                <div class="flex items-center justify-between">
                    <div>
                        <h2 class="text-2xl font-bold text-slate-900">"Quality Events"</h2>
                        <p class="text-slate-500 mt-1">"Batches with temperature excursions or purity failures"</p>
                    </div>
                    <select
                        class="px-3 py-2 rounded-md border border-slate-300 bg-white text-sm"
                        prop:value=move || filter.get().value()
                        on:change=move |e| set_filter.set(EventFilter::parse(&event_target_value(&e)))
                    >
                        {EventFilter::all()
                            .iter()
                            .map(|f| view! { <option value=f.value()>{f.label()}</option> })
                            .collect_view()}
                    </select>
                </div>

                // Summary over the unfiltered list
                <div class="grid grid-cols-3 gap-4">
                    <SummaryCard label="Total Events" value=Signal::derive(move || summary.get().total)>
                        <AlertTriangleIcon class="w-5 h-5 text-red-700" />
                    </SummaryCard>
                    <SummaryCard label="Temp Excursions" value=Signal::derive(move || summary.get().temperature_excursions)>
                        <ThermometerIcon class="w-5 h-5 text-amber-600" />
                    </SummaryCard>
                    <SummaryCard label="Purity Failures" value=Signal::derive(move || summary.get().purity_failures)>
                        <FlaskIcon class="w-5 h-5 text-purple-700" />
                    </SummaryCard>
                </div>

                <div class="bg-white rounded-xl border border-slate-200 overflow-hidden shadow-sm">
                    <table class="w-full text-sm">
                        <thead class="bg-slate-100 text-left text-xs uppercase text-slate-500">
                            <tr>
                                <th class="px-4 py-3">"Batch ID"</th>
                                <th class="px-4 py-3">"Batch Name"</th>
                                <th class="px-4 py-3">"Event Type"</th>
                                <th class="px-4 py-3">"Severity"</th>
                                <th class="px-4 py-3">"Details"</th>
                                <th class="px-4 py-3">"Status"</th>
                                <th class="px-4 py-3">"Date"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || filtered.get()
                                key=|event| event.batch_id.clone()
                                children=|event| view! { <EventRow event /> }
                            />
                        </tbody>
                    </table>
                    <Show when=move || filtered.with(|f| f.is_empty())>
                        <div class="py-12 text-center text-slate-500">"No quality events matching the filter"</div>
                    </Show>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn SummaryCard(label: &'static str, value: Signal<usize>, children: Children) -> impl IntoView {
    view! {
        <div class="flex items-center gap-3 bg-white rounded-xl border border-slate-200 px-4 py-3 shadow-sm">
            {children()}
            <div>
                <div class="text-2xl font-bold text-slate-900">{move || value.get()}</div>
                <div class="text-xs text-slate-500">{label}</div>
            </div>
        </div>
    }
}

#[component]
fn EventRow(event: QualityEvent) -> impl IntoView {
    view! {
        <tr class="border-t border-slate-100">
            <td class="px-4 py-3 font-mono font-medium text-blue-700">{event.batch_id.clone()}</td>
            <td class="px-4 py-3">{event.batch_name.clone()}</td>
            <td class="px-4 py-3">
                <div class="flex items-center gap-1.5">
                    {(!event.temp_check).then(|| view! { <ThermometerIcon class="w-3.5 h-3.5 text-amber-600" /> })}
                    {(!event.purity_check).then(|| view! { <FlaskIcon class="w-3.5 h-3.5 text-purple-700" /> })}
                    <span>{event.event_type.clone()}</span>
                </div>
            </td>
            <td class="px-4 py-3">
                <span class=format!("px-2 py-0.5 rounded text-xs font-semibold {}", event.severity.badge_class())>
                    {event.severity.label()}
                </span>
            </td>
            <td class="px-4 py-3 text-xs text-red-700 space-y-0.5">
                {(!event.temp_check).then(|| view! {
                    <div>
                        {format!(
                            "Temp: {} ({})",
                            format::temperature(event.temp_actual, 2),
                            temperature_target_caption()
                        )}
                    </div>
                })}
                {(!event.purity_check).then(|| view! {
                    <div>
                        {format!(
                            "Purity: {} ({})",
                            format::purity(event.purity_actual, 2),
                            purity_minimum_caption()
                        )}
                    </div>
                })}
            </td>
            <td class="px-4 py-3"><StatusBadge status=event.status /></td>
            <td class="px-4 py-3 text-slate-500">{format::date(&event.last_updated)}</td>
        </tr>
    }
}
