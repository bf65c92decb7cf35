//! Batch and quality event filters
//!
//! The batch list is filtered server-side (search and status travel as query
//! parameters). Quality events arrive pre-filtered to exceptions and are
//! narrowed further on the client.

use crate::messages::{BatchStatus, QualityEvent};

/// Status filter of the batch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BatchStatus),
}

impl StatusFilter {
    /// Parse a select value; unknown values fall back to `All`.
    pub fn parse(value: &str) -> Self {
        BatchStatus::parse(value).map(StatusFilter::Only).unwrap_or(StatusFilter::All)
    }

    /// Value used by the status select
    pub fn value(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.label(),
        }
    }

    pub fn options() -> Vec<(StatusFilter, &'static str)> {
        let mut options = vec![(StatusFilter::All, "All Statuses")];
        options.extend(BatchStatus::all().iter().map(|s| (StatusFilter::Only(*s), s.label())));
        options
    }
}

/// Parameters of `GET /api/batches`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchQuery {
    /// Substring matched by the backend against batch id and drug name
    pub search: String,
    pub status: StatusFilter,
}

impl BatchQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// Query parameters in request order. Empty search and `All` are omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        if let StatusFilter::Only(status) = self.status {
            params.push(("status", status.label().to_string()));
        }
        params
    }

    /// Percent-encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.params()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Quality events filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Temperature,
    Purity,
}

impl EventFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "Temperature" => EventFilter::Temperature,
            "Purity" => EventFilter::Purity,
            _ => EventFilter::All,
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            EventFilter::All => "All",
            EventFilter::Temperature => "Temperature",
            EventFilter::Purity => "Purity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventFilter::All => "All Events",
            EventFilter::Temperature => "Temperature Excursions",
            EventFilter::Purity => "Purity Failures",
        }
    }

    pub fn all() -> &'static [EventFilter] {
        &[EventFilter::All, EventFilter::Temperature, EventFilter::Purity]
    }

    /// Substring match on `event_type`
    pub fn matches(&self, event: &QualityEvent) -> bool {
        match self {
            EventFilter::All => true,
            other => event.event_type.contains(other.value()),
        }
    }

    pub fn apply<'a>(&self, events: &'a [QualityEvent]) -> Vec<&'a QualityEvent> {
        events.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Counters shown above the quality events table, over the unfiltered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSummary {
    pub total: usize,
    pub temperature_excursions: usize,
    pub purity_failures: usize,
}

impl EventSummary {
    pub fn from_events(events: &[QualityEvent]) -> Self {
        Self {
            total: events.len(),
            temperature_excursions: events.iter().filter(|e| !e.temp_check).count(),
            purity_failures: events.iter().filter(|e| !e.purity_check).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::Severity;

    fn event(id: &str, event_type: &str, temp_ok: bool, purity_ok: bool) -> QualityEvent {
        QualityEvent {
            batch_id: id.to_string(),
            drug_name: "Stelara".to_string(),
            batch_name: format!("Lot {}", id),
            status: BatchStatus::Pending,
            temp_actual: if temp_ok { 37.0 } else { 38.2 },
            temp_check: temp_ok,
            purity_actual: if purity_ok { 99.0 } else { 97.1 },
            purity_check: purity_ok,
            cycle_time_hours: 40.0,
            last_updated: "2024-05-01T12:00:00".to_string(),
            exceptions: None,
            event_type: event_type.to_string(),
            severity: Severity::Major,
        }
    }

    #[test]
    fn test_empty_query_has_no_params() {
        let query = BatchQuery::default();
        assert!(query.params().is_empty());
        assert_eq!(query.to_query_string(), "");
    }

    #[test]
    fn test_status_filter_released_is_sent() {
        let query = BatchQuery::new("", StatusFilter::parse("Released"));
        assert_eq!(query.to_query_string(), "status=Released");
    }

    #[test]
    fn test_search_is_encoded_and_not_trimmed() {
        let query = BatchQuery::new("STL 2024&x", StatusFilter::Only(BatchStatus::Pending));
        assert_eq!(query.to_query_string(), "search=STL%202024%26x&status=Pending");

        let query = BatchQuery::new(" ", StatusFilter::All);
        assert_eq!(query.to_query_string(), "search=%20");
    }

    #[test]
    fn test_unknown_status_value_means_all() {
        assert_eq!(StatusFilter::parse("All"), StatusFilter::All);
        assert_eq!(StatusFilter::parse("Archived"), StatusFilter::All);
        assert_eq!(StatusFilter::options().len(), 4);
    }

    #[test]
    fn test_event_filter_substring_match() {
        let events = vec![
            event("A", "Temperature Excursion", false, true),
            event("B", "Purity Failure", true, false),
            event("C", "Temperature Excursion, Purity Failure", false, false),
        ];

        let temperature: Vec<_> = EventFilter::Temperature.apply(&events).iter().map(|e| e.batch_id.as_str()).collect();
        assert_eq!(temperature, vec!["A", "C"]);

        let purity: Vec<_> = EventFilter::Purity.apply(&events).iter().map(|e| e.batch_id.as_str()).collect();
        assert_eq!(purity, vec!["B", "C"]);

        assert_eq!(EventFilter::All.apply(&events).len(), 3);
    }

    #[test]
    fn test_event_summary_counts_unfiltered() {
        let events = vec![
            event("A", "Temperature Excursion", false, true),
            event("B", "Purity Failure", true, false),
            event("C", "Temperature Excursion, Purity Failure", false, false),
        ];

        let summary = EventSummary::from_events(&events);
        assert_eq!(
            summary,
            EventSummary {
                total: 3,
                temperature_excursions: 2,
                purity_failures: 2,
            }
        );
    }
}
