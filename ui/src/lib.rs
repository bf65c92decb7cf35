//! Batch Release UI Library
//!
//! This crate provides the batch release dashboard: batch disposition table,
//! review panel with digital sign-off, quality events and reports.
//!
//! # Architecture
//!
//! Data flows one way. [`state::AppState`] issues fetches, stores the raw
//! JSON snapshots and hands them to presentational components, which only
//! format. User interaction flows back up as callbacks.
//!
//! # Modules
//!
//! - [`app`]: Root application component and tab navigation
//! - [`client`]: Backend client abstraction (`ReleaseApi`, `HttpClient`)
//! - [`components`]: UI components (KPI strip, batch table, panel, etc.)
//! - [`state`]: Dashboard state and command execution

pub mod app;
pub mod client;
pub mod components;
pub mod state;

pub use app::App;
