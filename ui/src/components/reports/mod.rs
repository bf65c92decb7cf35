//! Reports & Analytics Component
//!
//! Renders the server's report aggregates. Only bar scaling is computed
//! here, via [`ReportScale`].

use leptos::*;
use batch_release_shared::format::{
    bar_percent, is_high_exception_rate, status_color_class, ReportScale,
};
use batch_release_shared::{CycleTimeStats, ExceptionRate, MonthlyTrend, ReportData, StatusCount};

use crate::client::ReleaseApi;
use crate::state::use_app_state;

#[component]
pub fn Reports() -> impl IntoView {
    let client = use_app_state().client();
    let (report, set_report) = create_signal(Option::<ReportData>::None);
    let (loading, set_loading) = create_signal(true);

    // Fetch report on mount
    create_effect(move |_| {
        let client = client.clone();
        spawn_local(async move {
            match client.report_summary().await {
                Ok(data) => set_report.set(Some(data)),
                Err(e) => tracing::error!(error = %e, "Failed to load report summary"),
            }
            set_loading.set(false);
        });
    });

    move || match (loading.get(), report.get()) {
        (false, Some(data)) => view! { <ReportGrid data /> }.into_view(),
        // A failed fetch keeps the placeholder
        _ => view! {
            <div class="py-16 text-center text-slate-500">"Loading reports..."</div>
        }.into_view(),
    }
}

#[component]
fn ReportGrid(data: ReportData) -> impl IntoView {
    let scale = ReportScale::from_report(&data);

    view! {
        <div class="p-6 space-y-6">
            <div>
                <h2 class="text-2xl font-bold text-slate-900">"Reports & Analytics"</h2>
                <p class="text-slate-500 mt-1">"Batch disposition metrics and trend analysis for Stelara"</p>
            </div>

            <div class="grid grid-cols-3 gap-6">
                <ReportCard title="Batch Dispositions by Status">
                    <StatusBreakdown rows=data.status_breakdown.clone() scale />
                </ReportCard>
                <ReportCard title="Exception Rate">
                    <ExceptionRateView rate=data.exception_rate.clone() />
                </ReportCard>
                <ReportCard title="Cycle Time by Status (Hours)">
                    <CycleTimeTable rows=data.cycle_time_by_status.clone() />
                </ReportCard>
            </div>

            <ReportCard title="Monthly Batch Trend">
                <MonthlyTrendChart months=data.monthly_trend.clone() max=scale.max_monthly_total />
            </ReportCard>
        </div>
    }
}

#[component]
fn ReportCard(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl border border-slate-200 shadow-sm">
            <div class="px-5 py-3 border-b border-slate-200">
                <h3 class="text-sm font-semibold text-slate-900">{title}</h3>
            </div>
            <div class="p-5">{children()}</div>
        </div>
    }
}

#[component]
fn StatusBreakdown(rows: Vec<StatusCount>, scale: ReportScale) -> impl IntoView {
    view! {
        <div class="space-y-3">
            {rows
                .into_iter()
                .map(|row| {
                    let width = bar_percent(row.count, scale.max_status_count);
                    view! {
                        <div class="flex items-center gap-3 text-sm">
                            <span class="w-20 text-slate-600">{row.status.clone()}</span>
                            <div class="flex-1 h-3 rounded-full bg-slate-100 overflow-hidden">
                                <div
                                    class=format!("h-full rounded-full {}", status_color_class(&row.status))
                                    style=format!("width: {width}%")
                                />
                            </div>
                            <span class="w-10 text-right font-semibold">{row.count}</span>
                        </div>
                    }
                })
                .collect_view()}
            <div class="pt-2 border-t border-slate-100 text-sm text-slate-500">
                {format!("Total: {} batches", scale.status_total)}
            </div>
        </div>
    }
}

#[component]
fn ExceptionRateView(rate: ExceptionRate) -> impl IntoView {
    let (circle, text) = if is_high_exception_rate(rate.rate_pct) {
        ("bg-red-50", "text-red-700")
    } else {
        ("bg-amber-50", "text-amber-600")
    };

    view! {
        <div class="space-y-4">
            <div class=format!("mx-auto w-32 h-32 rounded-full flex flex-col items-center justify-center {circle}")>
                <span class=format!("text-2xl font-bold {text}")>{format!("{}%", rate.rate_pct)}</span>
                <span class="text-xs text-slate-500">"of batches"</span>
            </div>
            <div class="space-y-1 text-sm">
                <div class="flex justify-between">
                    <span>"Temperature Excursions"</span>
                    <span class="font-semibold">{rate.temp_fails}</span>
                </div>
                <div class="flex justify-between">
                    <span>"Purity Failures"</span>
                    <span class="font-semibold">{rate.purity_fails}</span>
                </div>
                <div class="flex justify-between pt-1 border-t border-slate-100 font-semibold">
                    <span>"Total with Exceptions"</span>
                    <span>{format!("{} / {}", rate.with_exceptions, rate.total)}</span>
                </div>
            </div>
        </div>
    }
}

#[component]
fn CycleTimeTable(rows: Vec<CycleTimeStats>) -> impl IntoView {
    view! {
        <table class="w-full text-sm">
            <thead class="text-left text-xs uppercase text-slate-500">
                <tr>
                    <th class="py-1">"Status"</th>
                    <th class="py-1">"Avg"</th>
                    <th class="py-1">"Min"</th>
                    <th class="py-1">"Max"</th>
                </tr>
            </thead>
            <tbody>
                {rows
                    .into_iter()
                    .map(|row| view! {
                        <tr class="border-t border-slate-100">
                            <td class="py-1.5">
                                <span class=format!("inline-block w-2 h-2 rounded-full mr-2 {}", status_color_class(&row.status)) />
                                {row.status.clone()}
                            </td>
                            <td class="py-1.5 font-semibold">{format!("{}h", row.avg_cycle)}</td>
                            <td class="py-1.5">{format!("{}h", row.min_cycle)}</td>
                            <td class="py-1.5">{format!("{}h", row.max_cycle)}</td>
                        </tr>
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}

#[component]
fn MonthlyTrendChart(months: Vec<MonthlyTrend>, max: u64) -> impl IntoView {
    view! {
        <div class="flex items-end gap-4 overflow-x-auto">
            {months
                .into_iter()
                .map(|m| {
                    let height = bar_percent(m.total, max);
                    let tooltip = format!(
                        "Total: {} | Released: {} | Pending: {} | Rejected: {}",
                        m.total, m.released, m.pending, m.rejected
                    );
                    view! {
                        <div class="flex flex-col items-center min-w-12">
                            <div class="h-32 w-8 flex items-end">
                                <div
                                    class="w-full rounded-t bg-gradient-to-t from-slate-800 to-blue-700 text-center"
                                    style=format!("height: {height}%")
                                    title=tooltip
                                >
                                    <span class="text-[10px] text-white">{m.total}</span>
                                </div>
                            </div>
                            <div class="mt-1 text-xs text-slate-600">{m.month.clone()}</div>
                            <div class="flex gap-1 text-[10px]">
                                {(m.released > 0).then(|| view! { <span class="text-green-700">{format!("{}R", m.released)}</span> })}
                                {(m.pending > 0).then(|| view! { <span class="text-amber-600">{format!("{}P", m.pending)}</span> })}
                                {(m.rejected > 0).then(|| view! { <span class="text-red-700">{format!("{}X", m.rejected)}</span> })}
                            </div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
