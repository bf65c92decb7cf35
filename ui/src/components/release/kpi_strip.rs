//! KPI Strip Component

use leptos::*;
use batch_release_shared::format::{kpi_cards, KpiCard};
use batch_release_shared::Kpis;

/// Six headline KPI cards; skeletons until a snapshot exists
#[component]
pub fn KpiStrip(kpis: Memo<Option<Kpis>>, loading: Memo<bool>) -> impl IntoView {
    let cards = move || {
        if loading.get() {
            return None;
        }
        kpis.with(|k| k.as_ref().map(kpi_cards))
    };

    view! {
        <div class="grid grid-cols-6 gap-4">
            {move || match cards() {
                Some(cards) => cards
                    .into_iter()
                    .map(|card| view! { <KpiCardView card /> })
                    .collect_view(),
                None => (0..6)
                    .map(|_| view! {
                        <div class="h-20 rounded-xl bg-slate-200 animate-pulse" />
                    })
                    .collect_view(),
            }}
        </div>
    }
}

#[component]
fn KpiCardView(card: KpiCard) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl border border-slate-200 px-4 py-3 shadow-sm">
            <div class=format!("text-2xl font-bold {}", card.tone.text_class())>{card.value}</div>
            <div class="text-xs text-slate-500 mt-1">{card.label}</div>
        </div>
    }
}
