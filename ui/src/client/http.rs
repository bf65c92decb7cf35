//! HTTP Release Client
//!
//! Talks to the `/api/*` endpoints on the origin that served the dashboard.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use batch_release_shared::{
    api, Batch, BatchQuery, Kpis, QualityEvent, ReleaseRequest, ReportData,
};

use super::{ReleaseApi, ReleaseClientError};

/// Client for the release backend over HTTP+JSON
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Origin the `/api` paths are resolved against
    base_url: String,
}

impl HttpClient {
    /// Create a new client
    pub fn new(url: &str) -> Self {
        // Normalize URL (remove trailing slash)
        let base_url = url.trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Client for the page origin
    pub fn from_window() -> Self {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| "http://localhost:8080".to_string());
        Self::new(&origin)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ReleaseClientError> {
        let response = Request::get(&api::url(&self.base_url, path))
            .send()
            .await
            .map_err(|e| ReleaseClientError::ConnectionFailed(e.to_string()))?;

        let response = ensure_ok(response)?;

        response
            .json::<T>()
            .await
            .map_err(|e| ReleaseClientError::InvalidResponse(e.to_string()))
    }
}

fn ensure_ok(response: Response) -> Result<Response, ReleaseClientError> {
    if response.ok() {
        Ok(response)
    } else {
        Err(ReleaseClientError::RequestFailed(format!(
            "HTTP {}: {}",
            response.status(),
            response.status_text()
        )))
    }
}

#[async_trait::async_trait(?Send)]
impl ReleaseApi for HttpClient {
    async fn list_batches(&self, query: &BatchQuery) -> Result<Vec<Batch>, ReleaseClientError> {
        self.get_json(&api::batches(query)).await
    }

    async fn get_kpis(&self) -> Result<Kpis, ReleaseClientError> {
        self.get_json(&api::kpis()).await
    }

    async fn release_batch(&self, request: &ReleaseRequest) -> Result<(), ReleaseClientError> {
        let response = Request::post(&api::url(&self.base_url, &api::release(&request.batch_id)))
            .header("Content-Type", "application/json")
            .json(request)
            .map_err(|e| ReleaseClientError::RequestFailed(e.to_string()))?
            .send()
            .await
            .map_err(|e| ReleaseClientError::ConnectionFailed(e.to_string()))?;

        // The acknowledgement body is not used.
        ensure_ok(response).map(|_| ())
    }

    async fn quality_events(&self) -> Result<Vec<QualityEvent>, ReleaseClientError> {
        self.get_json(&api::quality_events()).await
    }

    async fn report_summary(&self) -> Result<ReportData, ReleaseClientError> {
        self.get_json(&api::report_summary()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = HttpClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
