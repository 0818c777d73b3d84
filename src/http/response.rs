//! Response relay and error mapping.
//!
//! # Responsibilities
//! - Turn the origin's response into the caller-facing response
//! - Strip transport-layer framing headers local to the origin hop
//! - Map every relay failure mode to a deterministic JSON response
//!
//! # Design Decisions
//! - Origin status codes below 600 are relayed verbatim, including 4xx/5xx
//! - Response bodies stream through; they are never buffered
//! - Every failure becomes a complete, well-formed JSON response; nothing
//!   propagates past the relay handler

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Origin response headers that are framing decisions local to the origin
/// hop and must not leak to the caller. The client already decompressed the
/// body, so `content-encoding` in particular would mislabel the stream.
const STRIPPED_RESPONSE_HEADERS: [&str; 3] = ["content-encoding", "transfer-encoding", "connection"];

/// Everything that can go wrong while relaying a single request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Neither the path nor the `url` query parameter named a target.
    #[error("target URL missing")]
    MissingTarget,

    /// The path segment did not percent-decode.
    #[error("target URL encoding invalid")]
    InvalidEncoding,

    /// The decoded value is not an absolute URL.
    #[error("target URL format invalid")]
    InvalidUrl,

    /// The request was sent but no response arrived (refused, timeout, DNS).
    #[error("no response from target: {0}")]
    Transport(String),

    /// The origin responded but assembling the relay response failed.
    #[error("relaying origin response failed (status {status})")]
    Relay { status: StatusCode },

    /// The outbound request could not even be constructed.
    #[error("request setup failed: {0}")]
    Setup(String),

    /// Unhandled internal failure while handling the inbound side.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            RelayError::Setup(error.to_string())
        } else {
            RelayError::Transport(error.to_string())
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RelayError::MissingTarget => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Target URL is required. Use /:encodedUrl or /?url=..." }),
            ),
            RelayError::InvalidEncoding => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid URL encoding" }),
            ),
            RelayError::InvalidUrl => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid URL format" }),
            ),
            RelayError::Transport(message) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "No response from target server", "message": message }),
            ),
            RelayError::Relay { status } => (
                status,
                json!({ "error": "Proxy request failed", "status": status.as_u16() }),
            ),
            RelayError::Setup(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Proxy error", "message": message }),
            ),
            RelayError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error", "message": message }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Copy origin response headers, dropping the framing set.
pub fn strip_framing_headers(headers: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if STRIPPED_RESPONSE_HEADERS.contains(&name.as_str()) {
            continue;
        }
        relayed.append(name.clone(), value.clone());
    }
    relayed
}

/// Build the caller-facing response from the origin's.
///
/// Status is copied verbatim, headers are copied minus the framing set, and
/// the body streams through incrementally so large payloads never buffer.
pub fn relay_response(response: reqwest::Response) -> Result<Response, RelayError> {
    let status = response.status();
    let headers = strip_framing_headers(response.headers());

    let mut relayed = Response::builder()
        .status(status)
        .body(Body::from_stream(response.bytes_stream()))
        .map_err(|_| RelayError::Relay { status })?;
    *relayed.headers_mut() = headers;

    Ok(relayed)
}
