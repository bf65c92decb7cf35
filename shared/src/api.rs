//! Release backend endpoint paths
//!
//! Paths are relative to the origin that serves the dashboard; the UI calls
//! them on the page origin and the CLI prefixes its `--url`.

use crate::query::BatchQuery;

pub const API_PREFIX: &str = "/api";

/// `GET /api/batches[?search=..&status=..]`
pub fn batches(query: &BatchQuery) -> String {
    let qs = query.to_query_string();
    if qs.is_empty() {
        format!("{}/batches", API_PREFIX)
    } else {
        format!("{}/batches?{}", API_PREFIX, qs)
    }
}

/// `GET /api/batches/{id}`
pub fn batch(batch_id: &str) -> String {
    format!("{}/batches/{}", API_PREFIX, urlencoding::encode(batch_id))
}

/// `POST /api/batches/{id}/release`
pub fn release(batch_id: &str) -> String {
    format!("{}/release", batch(batch_id))
}

/// `POST /api/batches/{id}/reject`
pub fn reject(batch_id: &str) -> String {
    format!("{}/reject", batch(batch_id))
}

pub fn kpis() -> String {
    format!("{}/kpis", API_PREFIX)
}

pub fn quality_events() -> String {
    format!("{}/quality-events", API_PREFIX)
}

pub fn report_summary() -> String {
    format!("{}/reports/summary", API_PREFIX)
}

/// Join a base URL and an endpoint path
pub fn url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::BatchStatus;
    use crate::query::StatusFilter;

    #[test]
    fn test_batches_path() {
        assert_eq!(batches(&BatchQuery::default()), "/api/batches");
        assert_eq!(
            batches(&BatchQuery::new("stel", StatusFilter::Only(BatchStatus::Released))),
            "/api/batches?search=stel&status=Released"
        );
    }

    #[test]
    fn test_batch_id_is_a_single_segment() {
        assert_eq!(release("STL/001"), "/api/batches/STL%2F001/release");
        assert_eq!(reject("STL-001"), "/api/batches/STL-001/reject");
    }

    #[test]
    fn test_url_join() {
        assert_eq!(url("http://localhost:8080/", &kpis()), "http://localhost:8080/api/kpis");
        assert_eq!(url("", &report_summary()), "/api/reports/summary");
    }
}
