//! Batch Review Panel
//!
//! Review-by-exception for the selected batch plus the digital sign-off
//! workflow. Exceptions are derived for display with
//! [`classify_exceptions`]; the backend's check flags stay authoritative.

use leptos::*;
use batch_release_shared::{
    classify_exceptions, confirmation_prompt, exception_warning, format, Batch,
    BatchException, BatchStatus, SignOff, SignOffStep,
};

use crate::components::common::{
    AlertTriangleIcon, CheckCircleIcon, CloseIcon, ShieldIcon, XCircleIcon,
};
use crate::state::use_app_state;

/// Side panel for one batch
#[component]
pub fn BatchPanel(
    batch: Batch,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let exceptions = classify_exceptions(&batch.measurements());
    let exception_count = exceptions.len();

    view! {
        <aside class="w-[28rem] shrink-0 bg-white border-l border-slate-200 flex flex-col overflow-hidden">
            // Header
            <div class="flex items-start justify-between px-6 py-4 border-b border-slate-200">
                <div>
                    <h3 class="text-lg font-semibold text-slate-900">"Batch Review"</h3>
                    <span class="font-mono text-sm text-blue-700">{batch.batch_id.clone()}</span>
                </div>
                <button
                    class="p-1 rounded hover:bg-slate-100 text-slate-500"
                    on:click=move |_| on_close.call(())
                >
                    <CloseIcon class="w-4 h-4" />
                </button>
            </div>

            <div class="flex-1 overflow-auto px-6 py-4 space-y-6">
                <BatchInfo batch=batch.clone() />
                <QualityChecks batch=batch.clone() />

                {(!exceptions.is_empty()).then(|| view! { <ExceptionList exceptions /> })}

                {batch.all_checks_pass().then(|| view! {
                    <div class="flex items-center gap-3 rounded-lg bg-green-50 border border-green-200 p-3 text-sm text-green-800">
                        <CheckCircleIcon class="w-5 h-5 text-green-700" />
                        <span>"All quality checks passed. Batch is ready for release."</span>
                    </div>
                })}

                {match batch.status {
                    BatchStatus::Pending => view! {
                        <SignOffSection batch_id=batch.batch_id.clone() exception_count />
                    }.into_view(),
                    BatchStatus::Released => view! {
                        <div class="flex items-center gap-3 rounded-lg bg-green-50 border border-green-200 p-3">
                            <CheckCircleIcon class="w-5 h-5 text-green-700" />
                            <div>
                                <div class="text-sm text-green-800">
                                    {match &batch.signed_by {
                                        Some(name) => format!("Batch released by {name}"),
                                        None => "Batch released".to_string(),
                                    }}
                                </div>
                                <div class="text-xs text-slate-500 mt-0.5">
                                    {format::date_time(&batch.last_updated)}
                                </div>
                            </div>
                        </div>
                    }.into_view(),
                    BatchStatus::Rejected => view! {
                        <div class="flex items-center gap-3 rounded-lg bg-red-50 border border-red-200 p-3">
                            <XCircleIcon class="w-5 h-5 text-red-700" />
                            <div>
                                <div class="text-sm font-bold text-red-700">"Batch Rejected"</div>
                                <div class="text-xs text-slate-500 mt-0.5">
                                    {format::date_time(&batch.last_updated)}
                                </div>
                            </div>
                        </div>
                    }.into_view(),
                }}
            </div>
        </aside>
    }
}

#[component]
fn BatchInfo(batch: Batch) -> impl IntoView {
    let rows = [
        ("Drug", batch.drug_name),
        ("Batch Name", batch.batch_name),
        ("Manufactured", format::date(&batch.manufactured_date)),
        ("Expiry", format::date(&batch.expiry_date)),
        ("Cycle Time", format::hours_long(batch.cycle_time_hours)),
        ("Status", batch.status.label().to_string()),
    ];

    view! {
        <section>
            <h4 class="text-xs font-semibold uppercase tracking-wide text-slate-500 mb-3">"Batch Information"</h4>
            <div class="grid grid-cols-2 gap-3">
                {rows
                    .into_iter()
                    .map(|(label, value)| view! {
                        <div class="flex flex-col">
                            <span class="text-xs text-slate-500">{label}</span>
                            <span class="text-sm font-medium text-slate-900">{value}</span>
                        </div>
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn QualityChecks(batch: Batch) -> impl IntoView {
    view! {
        <section>
            <h4 class="text-xs font-semibold uppercase tracking-wide text-slate-500 mb-3">"Quality Checks"</h4>
            <div class="space-y-2">
                <CheckRow
                    name="Temperature Control"
                    value=format::temperature(batch.temp_actual, 2)
                    pass=batch.temp_check
                />
                <CheckRow
                    name="Purity Analysis"
                    value=format::purity(batch.purity_actual, 2)
                    pass=batch.purity_check
                />
            </div>
        </section>
    }
}

#[component]
fn CheckRow(name: &'static str, value: String, pass: bool) -> impl IntoView {
    let (row_class, status_class, status) = if pass {
        ("border-green-200 bg-green-50", "text-green-700", "Compliant")
    } else {
        ("border-red-200 bg-red-50", "text-red-700", "Non-Compliant")
    };

    view! {
        <div class=format!("flex items-center gap-3 rounded-lg border p-3 {row_class}")>
            {if pass {
                view! { <CheckCircleIcon class="w-5 h-5 text-green-700" /> }.into_view()
            } else {
                view! { <AlertTriangleIcon class="w-5 h-5 text-red-700" /> }.into_view()
            }}
            <div class="flex-1 flex flex-col">
                <span class="text-sm font-medium text-slate-900">{name}</span>
                <span class="text-xs text-slate-600">{value}</span>
            </div>
            <span class=format!("text-xs font-semibold {status_class}")>{status}</span>
        </div>
    }
}

#[component]
fn ExceptionList(exceptions: Vec<BatchException>) -> impl IntoView {
    let count = exceptions.len();

    view! {
        <section>
            <h4 class="flex items-center gap-1.5 text-xs font-semibold uppercase tracking-wide text-red-700 mb-3">
                <AlertTriangleIcon class="w-4 h-4" />
                {format!("Exceptions ({count})")}
            </h4>
            <div class="space-y-2">
                {exceptions
                    .into_iter()
                    .map(|exc| view! {
                        <div class="rounded-lg border border-red-200 bg-white p-3">
                            <div class="flex items-center justify-between">
                                <span class="text-sm font-semibold text-slate-900">{exc.name()}</span>
                                <span class=format!("px-2 py-0.5 rounded text-xs font-semibold {}", exc.severity.badge_class())>
                                    {exc.severity.label()}
                                </span>
                            </div>
                            <p class="text-xs text-slate-600 mt-1">{exc.detail}</p>
                        </div>
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

/// Reviewer name, release button and the confirmation step
#[component]
fn SignOffSection(batch_id: String, exception_count: usize) -> impl IntoView {
    let app_state = use_app_state();
    let sign_off = create_rw_signal(SignOff::new());
    let prompt = confirmation_prompt(&batch_id);
    let warning = exception_warning(exception_count);

    let on_confirm = move |_| {
        let Some(signed_by) = sign_off.try_update(|s| s.confirm()).flatten() else {
            return;
        };
        let app_state = app_state.clone();
        let batch_id = batch_id.clone();
        spawn_local(async move {
            // Failures are logged by the state; the panel just resets.
            let _ = app_state.release(batch_id, signed_by).await;
            // A successful release unmounts this panel first.
            sign_off.try_update(|s| s.finish());
        });
    };

    view! {
        <section class="rounded-lg border border-slate-200 p-4">
            <h4 class="flex items-center gap-1.5 text-sm font-semibold text-slate-900 mb-3">
                <ShieldIcon class="w-4 h-4" />
                "Digital Sign-Off"
            </h4>

            <Show
                when=move || sign_off.with(|s| s.step() == SignOffStep::Confirming)
                fallback=move || view! {
                    <div class="space-y-3">
                        <label class="block">
                            <span class="text-xs text-slate-500">"Reviewer Name"</span>
                            <input
                                type="text"
                                class="mt-1 w-full rounded-md border border-slate-300 px-3 py-2 text-sm"
                                placeholder="Enter your name for sign-off..."
                                prop:value=move || sign_off.with(|s| s.reviewer().to_string())
                                on:input=move |e| sign_off.update(|s| s.set_reviewer(event_target_value(&e)))
                            />
                        </label>
                        <button
                            class="w-full rounded-md bg-blue-700 px-4 py-2 text-sm font-semibold text-white \
                                   hover:bg-blue-800 disabled:opacity-50 disabled:cursor-not-allowed"
                            disabled=move || !sign_off.with(|s| s.can_release())
                            on:click=move |_| {
                                sign_off.update(|s| {
                                    s.request_confirmation();
                                });
                            }
                        >
                            "Release Batch"
                        </button>
                    </div>
                }
            >
                <div class="space-y-3">
                    <p class="text-sm text-slate-700">
                        {prompt.clone()}
                        {warning.clone().map(|w| view! {
                            <span class="text-red-700 font-semibold">" "{w}</span>
                        })}
                    </p>
                    <div class="flex gap-2">
                        <button
                            class="flex-1 rounded-md bg-green-700 px-4 py-2 text-sm font-semibold text-white \
                                   hover:bg-green-800 disabled:opacity-50"
                            disabled=move || sign_off.with(|s| s.is_releasing())
                            on:click=on_confirm.clone()
                        >
                            {move || if sign_off.with(|s| s.is_releasing()) { "Releasing..." } else { "Confirm Release" }}
                        </button>
                        <button
                            class="flex-1 rounded-md border border-slate-300 px-4 py-2 text-sm text-slate-700 hover:bg-slate-50"
                            on:click=move |_| sign_off.update(|s| s.cancel())
                        >
                            "Cancel"
                        </button>
                    </div>
                </div>
            </Show>
        </section>
    }
}
