//! Web Server for the Batch Release UI
//!
//! Serves the embedded dashboard and forwards `/api/*` requests to the
//! release backend unchanged.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, Request, Response, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Router,
};
use rust_embed::RustEmbed;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use batch_release_shared::{api, ReleaseConfig};

/// Embedded UI assets (compiled WASM app)
#[derive(RustEmbed)]
#[folder = "../ui/dist/"]
struct UiAssets;

/// Headers that describe a single connection rather than the message
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
];

/// Server state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend_url: String,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(backend_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            http_client: builder.build()?,
        })
    }

    pub fn from_config(config: &ReleaseConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.backend.url,
            config.backend.timeout_secs.map(Duration::from_secs),
        )
    }
}

/// Build the router: health check, API proxy and embedded UI
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Everything under /api belongs to the backend
        .route("/api/*path", any(proxy_api))
        // Serve UI assets - index.html for root
        .route("/", get(serve_index))
        // Use fallback for all other paths (static files and SPA routing)
        .fallback(serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server
pub async fn start_server(
    config: &ReleaseConfig,
) -> anyhow::Result<(SocketAddr, tokio::task::JoinHandle<anyhow::Result<()>>)> {
    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("UI server listening on {}", addr);
    info!("Forwarding /api to {}", config.backend.url);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))
    });

    Ok((addr, handle))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Forward an `/api/*` request to the backend, same path and query
async fn proxy_api(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response<Body> {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let url = api::url(&state.backend_url, &path_and_query);

    debug!(method = %req.method(), %url, "Proxying request");
    proxy_request(&state.http_client, &url, req).await
}

/// Generic request proxy
async fn proxy_request(client: &reqwest::Client, url: &str, req: Request<Body>) -> Response<Body> {
    let method = req.method().clone();
    let headers = req.headers().clone();

    // Read the body
    let body_bytes = match axum::body::to_bytes(req.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read request body: {}", e),
            )
                .into_response();
        }
    };

    // Build the proxied request
    let mut proxy_req = client.request(method, url);
    for (name, value) in headers.iter() {
        if name != header::HOST && name != header::CONTENT_LENGTH && !is_hop_by_hop(name) {
            proxy_req = proxy_req.header(name, value);
        }
    }
    proxy_req = proxy_req.body(body_bytes);

    // Execute the request
    let response = match proxy_req.send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Backend unreachable: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                format!("Failed to proxy request to backend: {}", e),
            )
                .into_response();
        }
    };

    let status = response.status();
    let upstream_headers = response.headers().clone();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            return (
                StatusCode::BAD_GATEWAY,
                format!("Failed to read backend response: {}", e),
            )
                .into_response();
        }
    };

    let mut res = Response::new(Body::from(body));
    *res.status_mut() = status;
    copy_end_to_end_headers(&upstream_headers, res.headers_mut());
    res
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

fn copy_end_to_end_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from.iter() {
        // The body is re-framed, so its length is recomputed.
        if name == header::CONTENT_LENGTH || is_hop_by_hop(name) {
            continue;
        }
        to.append(name.clone(), value.clone());
    }
}

/// Serve index.html
async fn serve_index() -> Response<Body> {
    serve_file("index.html")
}

/// Serve static files from embedded assets (fallback handler)
async fn serve_static(req: Request<Body>) -> Response<Body> {
    let path = req.uri().path();
    debug!("Fallback handler called for path: {}", path);

    // Try the exact path first
    if let Some(response) = try_serve_file(path) {
        return response;
    }

    // For SPA routing, serve index.html for non-asset paths
    if !path.contains('.') {
        return serve_file("index.html");
    }

    // 404 for missing assets
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn try_serve_file(path: &str) -> Option<Response<Body>> {
    let path = path.trim_start_matches('/');
    UiAssets::get(path).map(|content| {
        let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime),
                (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
            ],
            content.data.into_owned(),
        )
            .into_response()
    })
}

fn serve_file(path: &str) -> Response<Body> {
    match UiAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime)],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_hop_by_hop_headers_are_dropped() {
        let mut from = HeaderMap::new();
        from.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        from.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        from.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        from.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));

        let mut to = HeaderMap::new();
        copy_end_to_end_headers(&from, &mut to);

        assert_eq!(to.len(), 1);
        assert_eq!(to[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_state_trims_backend_url() {
        let state = AppState::new("http://127.0.0.1:8000/", None).unwrap();
        assert_eq!(state.backend_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_state_from_config_uses_backend_section() {
        let mut config = ReleaseConfig::default();
        config.backend.url = "http://backend:9000".to_string();
        config.backend.timeout_secs = Some(5);

        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.backend_url, "http://backend:9000");
    }
}
