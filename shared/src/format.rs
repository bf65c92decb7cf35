//! Display formatting
//!
//! Measurements use fixed decimals: one in tables, two in detail views.
//! Dates arrive as ISO-8601 strings and render as `M/D/YYYY`. Naive
//! timestamps are shown as-is; ones carrying an offset are shifted into the
//! viewer's local zone.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime};

use crate::messages::{Kpis, ReportData};

pub fn temperature(value: f64, decimals: usize) -> String {
    format!("{:.*}°C", decimals, value)
}

pub fn purity(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// `41.5h`
pub fn hours_short(value: f64) -> String {
    format!("{:.1}h", value)
}

/// `41.5 hours`
pub fn hours_long(value: f64) -> String {
    format!("{:.1} hours", value)
}

fn to_local(dt: DateTime<FixedOffset>) -> NaiveDateTime {
    dt.with_timezone(&Local).naive_local()
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(to_local(dt));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(to_local(dt));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `3/1/2024`; unparseable input is returned unchanged
pub fn date(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// `3/1/2024, 2:05:09 PM`; unparseable input is returned unchanged
pub fn date_time(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Accent of a KPI card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Warning,
    Success,
    Danger,
}

impl Tone {
    pub fn text_class(&self) -> &'static str {
        match self {
            Tone::Neutral => "text-slate-800",
            Tone::Warning => "text-amber-600",
            Tone::Success => "text-green-700",
            Tone::Danger => "text-red-700",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

/// The six KPI cards, in display order
pub fn kpi_cards(kpis: &Kpis) -> Vec<KpiCard> {
    vec![
        KpiCard { label: "Batches Pending Release", value: kpis.pending_count.to_string(), tone: Tone::Warning },
        KpiCard { label: "Average Cycle Time", value: format!("{}h", kpis.avg_cycle_time), tone: Tone::Neutral },
        KpiCard { label: "Total Batches", value: kpis.total_batches.to_string(), tone: Tone::Neutral },
        KpiCard { label: "Released", value: kpis.released_count.to_string(), tone: Tone::Success },
        KpiCard { label: "Rejected", value: kpis.rejected_count.to_string(), tone: Tone::Danger },
        KpiCard { label: "With Exceptions", value: kpis.exception_count.to_string(), tone: Tone::Warning },
    ]
}

/// Width of a bar relative to the series maximum, in percent
pub fn bar_percent(value: u64, max: u64) -> f64 {
    if max == 0 {
        0.0
    } else {
        value as f64 / max as f64 * 100.0
    }
}

/// Exception rates above this percentage are highlighted
pub const HIGH_EXCEPTION_RATE_PCT: f64 = 30.0;

/// Presentational maxima and totals of a report; no aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportScale {
    pub max_status_count: u64,
    pub max_monthly_total: u64,
    pub status_total: u64,
}

impl ReportScale {
    pub fn from_report(report: &ReportData) -> Self {
        Self {
            max_status_count: report.status_breakdown.iter().map(|s| s.count).max().unwrap_or(0),
            max_monthly_total: report.monthly_trend.iter().map(|m| m.total).max().unwrap_or(0),
            status_total: report.status_breakdown.iter().map(|s| s.count).sum(),
        }
    }
}

pub fn is_high_exception_rate(rate_pct: f64) -> bool {
    rate_pct > HIGH_EXCEPTION_RATE_PCT
}

/// Bar/dot colour class for a report status string
pub fn status_color_class(status: &str) -> &'static str {
    match status {
        "Pending" => "bg-amber-500",
        "Released" => "bg-green-700",
        "Rejected" => "bg-red-700",
        _ => "bg-slate-800",
    }
}
