//! HTTP server setup and relay dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the health, relay, and fallback routes
//! - Wire up middleware (tracing, limits, request ID, timeout backstop)
//! - Build the shared outbound client (redirect cap, timeout, decompression)
//! - Drive a single relay per inbound request: adapt, forward, stream back

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::ProxyConfig;
use crate::http::request::{capture_body, extract_target, sanitize_headers};
use crate::http::response::{relay_response, RelayError};
use crate::observability::metrics;

/// Application state injected into handlers.
///
/// Holds only the immutable config snapshot and the cloneable outbound
/// client; nothing here is mutated across requests.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub config: Arc<ProxyConfig>,
}

/// HTTP server for the relay proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        // The outbound client owns the dispatch policy: bounded redirects,
        // one hard timeout over the whole exchange, and automatic
        // decompression so re-encoding toward the caller is independent of
        // the origin's choice.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(config.relay.max_redirects))
            .timeout(Duration::from_secs(config.relay.timeout_secs))
            .build()
            .expect("outbound client construction failed");

        let state = AppState {
            client,
            config: Arc::new(config),
        };

        let router = Self::build_router(&state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: &AppState) -> Router {
        let config = &state.config;
        Router::new()
            .route("/health", get(health_handler))
            .route("/", any(relay_handler))
            .route("/{*target}", any(relay_handler))
            .fallback(not_found_handler)
            .with_state(state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");
        tracing::info!(
            "Relay usage: GET /https%3A%2F%2Fexample.com%2Fdata or GET /?url=https://example.com/data"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main relay handler: one outbound attempt per inbound request.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (parts, body) = request.into_parts();
    let method_str = parts.method.to_string();

    let response = relay(&state, parts.method, &parts.uri, &parts.headers, body)
        .await
        .unwrap_or_else(|error| {
            tracing::warn!(request_id = %request_id, error = %error, "Relay failed");
            error.into_response()
        });

    metrics::record_request(&method_str, response.status().as_u16(), start_time);
    response
}

/// The single relay operation: validate, capture, sanitize, forward, stream.
async fn relay(
    state: &AppState,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Body,
) -> Result<Response, RelayError> {
    // Target validation happens before any body read or outbound I/O.
    let target = extract_target(uri)?;
    let body = capture_body(&method, body, state.config.limits.max_body_bytes).await?;

    tracing::debug!(
        method = %method,
        target = %target,
        body_bytes = body.as_ref().map_or(0, Bytes::len),
        content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(""),
        "Relaying request"
    );

    let outbound_headers = sanitize_headers(headers);
    let response = forward(&state.client, method, target, outbound_headers, body).await?;

    tracing::debug!(status = %response.status(), "Origin responded");
    relay_response(response)
}

/// Issue the outbound request.
///
/// `content-length` is the only header this side may inject, and only when
/// a body is attached. Origin status codes, 4xx/5xx included, come back as
/// `Ok`; only transport-level failures surface as errors.
async fn forward(
    client: &reqwest::Client,
    method: Method,
    target: Url,
    mut headers: HeaderMap,
    body: Option<Bytes>,
) -> Result<reqwest::Response, RelayError> {
    if let Some(bytes) = &body {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
    }

    let mut outbound = client.request(method, target).headers(headers);
    if let Some(bytes) = body {
        outbound = outbound.body(bytes);
    }

    Ok(outbound.send().await?)
}

/// Liveness probe. Reserved ahead of the catch-all relay route.
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

/// Fallback for anything the route table does not cover.
async fn not_found_handler(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
