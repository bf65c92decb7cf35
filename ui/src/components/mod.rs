//! UI Components
//!
//! This module contains all UI components organized by feature:
//! - `release`: KPI strip, batch table and the review/sign-off panel
//! - `quality`: Quality events list
//! - `reports`: Reports and analytics
//! - `common`: Shared/reusable components

pub mod common;
pub mod quality;
pub mod release;
pub mod reports;
