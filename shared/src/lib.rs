//! Shared types for the Batch Release dashboard
//!
//! This crate contains everything the UI and the CLI agree on:
//! - Data-transfer types returned by the release backend
//! - Review-by-exception classification
//! - Batch and quality event filters, endpoint paths
//! - Dashboard and sign-off state machines
//! - Display formatting for measurements, dates and report bars

pub mod api;
pub mod config;
pub mod dashboard;
pub mod exceptions;
pub mod format;
pub mod messages;
pub mod query;
pub mod signoff;

pub use config::*;
pub use dashboard::*;
pub use exceptions::*;
pub use messages::*;
pub use query::*;
pub use signoff::*;
