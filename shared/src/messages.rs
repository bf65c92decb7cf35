//! API message types for communication between the UI and the release backend
//!
//! These are read-only snapshots. The backend owns storage, KPI computation
//! and report aggregation; nothing here is mutated client-side.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::exceptions::{Measurements, Severity};

/// Workflow status of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Awaiting QA disposition
    Pending,
    /// Signed off and released
    Released,
    /// Rejected by QA
    Rejected,
}

impl BatchStatus {
    pub fn all() -> &'static [BatchStatus] {
        &[BatchStatus::Pending, BatchStatus::Released, BatchStatus::Rejected]
    }

    /// Human-readable label, identical to the wire value
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "Pending",
            BatchStatus::Released => "Released",
            BatchStatus::Rejected => "Rejected",
        }
    }

    /// Parse a wire/select value. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(BatchStatus::Pending),
            "Released" => Some(BatchStatus::Released),
            "Rejected" => Some(BatchStatus::Rejected),
            _ => None,
        }
    }

    /// Only pending batches can be dispositioned.
    pub fn can_transition_to(&self, next: BatchStatus) -> bool {
        matches!(
            (self, next),
            (BatchStatus::Pending, BatchStatus::Released) | (BatchStatus::Pending, BatchStatus::Rejected)
        )
    }

    /// Badge styling for tables
    pub fn badge_class(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "bg-amber-100 text-amber-700",
            BatchStatus::Released => "bg-green-100 text-green-800",
            BatchStatus::Rejected => "bg-red-100 text-red-800",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A manufactured lot under release review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_id: String,
    pub drug_name: String,
    pub batch_name: String,
    pub status: BatchStatus,

    /// Recorded process temperature in °C
    pub temp_actual: f64,

    /// Backend verdict for the temperature window
    pub temp_check: bool,

    /// Measured purity in percent
    pub purity_actual: f64,

    /// Backend verdict for the purity minimum
    pub purity_check: bool,

    /// ISO-8601 date
    pub manufactured_date: String,

    /// ISO-8601 date
    pub expiry_date: String,

    #[serde(default)]
    pub cycle_time_hours: f64,

    /// ISO-8601 timestamp of the last status change
    pub last_updated: String,

    /// Free-text exception notes
    #[serde(default)]
    pub exceptions: Option<String>,

    /// Reviewer who released the batch
    #[serde(default)]
    pub signed_by: Option<String>,
}

impl Batch {
    pub fn measurements(&self) -> Measurements {
        Measurements {
            temp_actual: self.temp_actual,
            temp_check: self.temp_check,
            purity_actual: self.purity_actual,
            purity_check: self.purity_check,
        }
    }

    pub fn all_checks_pass(&self) -> bool {
        self.temp_check && self.purity_check
    }
}

/// Aggregate counters, recomputed by the backend on every fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub pending_count: u64,

    /// Average cycle time in hours
    pub avg_cycle_time: f64,

    pub total_batches: u64,
    pub released_count: u64,
    pub rejected_count: u64,

    /// Batches with at least one failed check
    pub exception_count: u64,
}

/// A batch with at least one failed check, annotated by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityEvent {
    pub batch_id: String,
    pub drug_name: String,
    pub batch_name: String,
    pub status: BatchStatus,
    pub temp_actual: f64,
    pub temp_check: bool,
    pub purity_actual: f64,
    pub purity_check: bool,
    #[serde(default)]
    pub cycle_time_hours: f64,
    pub last_updated: String,
    #[serde(default)]
    pub exceptions: Option<String>,

    /// Comma-joined event kinds, e.g. "Temperature Excursion, Purity Failure"
    pub event_type: String,

    pub severity: Severity,
}

impl QualityEvent {
    pub fn measurements(&self) -> Measurements {
        Measurements {
            temp_actual: self.temp_actual,
            temp_check: self.temp_check,
            purity_actual: self.purity_actual,
            purity_check: self.purity_check,
        }
    }
}

/// Server-computed report aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub status_breakdown: Vec<StatusCount>,
    pub monthly_trend: Vec<MonthlyTrend>,
    pub exception_rate: ExceptionRate,
    pub cycle_time_by_status: Vec<CycleTimeStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Batches by manufactured month (`YYYY-MM`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub total: u64,
    pub released: u64,
    pub pending: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionRate {
    pub total: u64,
    pub with_exceptions: u64,
    pub rate_pct: f64,
    pub temp_fails: u64,
    pub purity_fails: u64,
}

/// Cycle time statistics in hours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleTimeStats {
    pub status: String,
    pub avg_cycle: f64,
    pub min_cycle: f64,
    pub max_cycle: f64,
}

/// Sign-off request body for `POST /api/batches/{id}/release`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub batch_id: String,
    pub signed_by: String,
}

impl ReleaseRequest {
    pub fn new(batch_id: impl Into<String>, signed_by: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            signed_by: signed_by.into(),
        }
    }
}

/// Acknowledgement returned by release/reject. The dashboard ignores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub signed_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_deserialization_with_missing_optionals() {
        let json = r#"{
            "batch_id": "STL-2024-001",
            "drug_name": "Stelara",
            "batch_name": "Ustekinumab 45mg",
            "status": "Pending",
            "temp_actual": 37.2,
            "temp_check": true,
            "purity_actual": 99.1,
            "purity_check": true,
            "manufactured_date": "2024-03-01",
            "expiry_date": "2026-03-01",
            "cycle_time_hours": 41.5,
            "last_updated": "2024-03-04T09:15:00"
        }"#;

        let batch: Batch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.status, BatchStatus::Pending);
        assert!(batch.signed_by.is_none());
        assert!(batch.exceptions.is_none());
        assert!(batch.all_checks_pass());
    }

    #[test]
    fn test_status_transitions() {
        assert!(BatchStatus::Pending.can_transition_to(BatchStatus::Released));
        assert!(BatchStatus::Pending.can_transition_to(BatchStatus::Rejected));
        assert!(!BatchStatus::Released.can_transition_to(BatchStatus::Rejected));
        assert!(!BatchStatus::Rejected.can_transition_to(BatchStatus::Released));
        assert!(!BatchStatus::Pending.can_transition_to(BatchStatus::Pending));
    }

    #[test]
    fn test_quality_event_severity_from_wire() {
        let json = r#"{
            "batch_id": "STL-2024-007",
            "drug_name": "Stelara",
            "batch_name": "Ustekinumab 90mg",
            "status": "Rejected",
            "temp_actual": 38.6,
            "temp_check": false,
            "purity_actual": 99.0,
            "purity_check": true,
            "cycle_time_hours": 52.0,
            "last_updated": "2024-04-02T10:00:00",
            "exceptions": null,
            "event_type": "Temperature Excursion",
            "severity": "Critical"
        }"#;

        let event: QualityEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.severity, Severity::Critical);
        assert_eq!(event.status, BatchStatus::Rejected);
    }
}
