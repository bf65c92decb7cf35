//! Application Header Component

use leptos::*;
use batch_release_shared::Tab;

use super::ShieldIcon;
use crate::state::use_app_state;

/// Title bar with tab navigation and the environment badge
#[component]
pub fn Header() -> impl IntoView {
    let app_state = use_app_state();
    let dashboard = app_state.dashboard;
    let active_tab = create_memo(move |_| dashboard.with(|d| d.active_tab()));

    view! {
        <header class="h-14 border-b border-slate-700 bg-slate-800 flex items-center px-6 gap-6">
            // Logo
            <div class="flex items-center gap-2 text-white font-bold text-lg">
                <ShieldIcon class="w-6 h-6 text-blue-400" />
                <span>"Stelara® Batch Release"</span>
            </div>

            <nav class="flex items-center gap-1">
                {Tab::all()
                    .iter()
                    .copied()
                    .map(|tab| {
                        let app_state = app_state.clone();
                        view! {
                            <TabLink
                                label=tab.label()
                                active=move || active_tab.get() == tab
                                on_click=move |_| app_state.dispatch(|d| {
                                    d.switch_tab(tab);
                                    None
                                })
                            />
                        }
                    })
                    .collect_view()}
            </nav>

            // Spacer
            <div class="flex-1" />

            <div class="flex items-center gap-2 px-3 py-1 rounded-full bg-emerald-500/10 border border-emerald-500/30">
                <span class="w-2 h-2 rounded-full bg-emerald-400" />
                <div class="leading-tight">
                    <div class="text-xs font-semibold text-emerald-400">"GMP Production"</div>
                    <div class="text-[10px] text-slate-400">"Good Manufacturing Practice"</div>
                </div>
            </div>
        </header>
    }
}

/// Navigation tab
#[component]
fn TabLink<F>(
    label: &'static str,
    active: F,
    on_click: impl Fn(ev::MouseEvent) + 'static,
) -> impl IntoView
where
    F: Fn() -> bool + 'static,
{
    view! {
        <button
            class=move || {
                if active() {
                    "px-3 py-1.5 text-sm font-medium rounded-md bg-slate-700 text-white"
                } else {
                    "px-3 py-1.5 text-sm font-medium rounded-md text-slate-400 hover:text-white hover:bg-slate-700/50"
                }
            }
            on:click=on_click
        >
            {label}
        </button>
    }
}
