//! Request adaptation: target extraction, body capture, header hygiene.
//!
//! # Responsibilities
//! - Resolve the target URL from the request path or `url` query parameter
//! - Capture the raw inbound body exactly once
//! - Strip hop-by-hop and connection-management headers before forwarding
//!
//! # Design Decisions
//! - Path segment wins over query parameter; exactly one source is honored
//! - Validation failures short-circuit before any outbound I/O
//! - Bodyless methods never touch the transport
//! - An empty body maps to "absent" so no `Content-Length: 0` is synthesized

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Uri};
use url::Url;

use crate::http::response::RelayError;

/// Inbound headers that are never forwarded verbatim. `content-length` is
/// re-derived from the captured body; `accept-encoding` is dropped so the
/// forwarder negotiates compression independently of the caller.
const STRIPPED_REQUEST_HEADERS: [&str; 9] = [
    "host",
    "connection",
    "content-length",
    "transfer-encoding",
    "upgrade",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "accept-encoding",
];

/// Methods whose inbound body is ignored without reading the transport.
const BODYLESS_METHODS: [Method; 4] = [Method::GET, Method::HEAD, Method::DELETE, Method::OPTIONS];

/// Resolve the target URL from the inbound request URI.
///
/// The percent-encoded path remainder is checked first; if the path is bare,
/// the `url` query parameter is used as-is. The chosen value must parse as
/// an absolute URL with an authority.
pub fn extract_target(uri: &Uri) -> Result<Url, RelayError> {
    let encoded = uri.path().strip_prefix('/').unwrap_or(uri.path());

    if !encoded.is_empty() {
        let decoded = urlencoding::decode(encoded).map_err(|_| RelayError::InvalidEncoding)?;
        return parse_absolute(&decoded);
    }

    let from_query = uri.query().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
    });

    match from_query {
        Some(target) => parse_absolute(&target),
        None => Err(RelayError::MissingTarget),
    }
}

fn parse_absolute(target: &str) -> Result<Url, RelayError> {
    let parsed = Url::parse(target).map_err(|_| RelayError::InvalidUrl)?;
    if !parsed.has_host() {
        return Err(RelayError::InvalidUrl);
    }
    Ok(parsed)
}

/// Read the inbound body to completion, bounded by `limit`.
///
/// Returns `None` for bodyless methods and for empty bodies. The trade is
/// memory for forwarding-correctness simplicity; bodies are already capped
/// by the request body limit middleware.
pub async fn capture_body(
    method: &Method,
    body: Body,
    limit: usize,
) -> Result<Option<Bytes>, RelayError> {
    if BODYLESS_METHODS.contains(method) {
        return Ok(None);
    }

    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| RelayError::Internal(e.to_string()))?;

    if bytes.is_empty() {
        Ok(None)
    } else {
        Ok(Some(bytes))
    }
}

/// Copy inbound headers, dropping the fixed hop-by-hop set.
///
/// Everything else, including `authorization` and custom headers, passes
/// through with multi-value order preserved. Case-insensitivity comes from
/// `HeaderName` normalization. Idempotent.
pub fn sanitize_headers(headers: &HeaderMap) -> HeaderMap {
    let mut sanitized = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if STRIPPED_REQUEST_HEADERS.contains(&name.as_str()) {
            continue;
        }
        sanitized.append(name.clone(), value.clone());
    }
    sanitized
}
