//! Batch Release UI Entry Point
//!
//! This is the main entry point for the dashboard WASM application.
//! It initializes logging and mounts the Leptos app to the DOM.

use leptos::*;
use tracing_wasm::WASMLayerConfigBuilder;

use batch_release_ui::App;

fn main() {
    console_error_panic_hook::set_once();

    let config = WASMLayerConfigBuilder::default()
        .set_max_level(tracing::Level::DEBUG)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);

    tracing::info!("Starting Batch Release UI");

    mount_to_body(|| view! { <App /> });
}

