//! Request/response adapter between the native HTTP boundary and the
//! normalized model.
//!
//! # Responsibilities
//! - Strip the configured root prefix from inbound paths
//! - Build the normalized request (headers in order, body decoded for
//!   body-bearing methods)
//! - Dispatch to the currently bound handler
//! - Convert the normalized response back out, stringifying keyword
//!   keys exactly once
//!
//! # Design Decisions
//! - No retries; duplicate lifecycle transitions answer 409
//! - Handler failures are surfaced, never masked or swallowed

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::handler::HandlerError;
use crate::ring::request::is_body_bearing;
use crate::ring::{BodyDecodeError, KwValue, NormalizedRequest, NormalizedResponse, RequestBody};

use super::server::AppState;

/// Upper bound on buffered request bodies.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Per-request bridge failure.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The inbound path does not start with the configured root prefix.
    /// A routing/config invariant violation, not a user error.
    #[error("path {path:?} does not start with configured root path {root:?}")]
    Configuration { path: String, root: String },

    #[error("failed to read request body: {0}")]
    BodyRead(axum::Error),

    #[error("failed to decode request body: {0}")]
    BodyDecode(#[from] BodyDecodeError),

    #[error("handler returned invalid status code {0}")]
    Status(u16),

    #[error("failed to build native response: {0}")]
    Response(#[from] axum::http::Error),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = match &self {
            BridgeError::BodyRead(_) | BridgeError::BodyDecode(_) => StatusCode::BAD_REQUEST,
            BridgeError::Configuration { .. }
            | BridgeError::Status(_)
            | BridgeError::Response(_)
            | BridgeError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(error = %self, status = %status, "bridge request failed");
        (status, self.to_string()).into_response()
    }
}

/// Remove the configured root prefix from a request path.
pub fn prune_path(root: &str, path: &str) -> Result<String, BridgeError> {
    match path.strip_prefix(root) {
        Some(stripped) => Ok(stripped.to_string()),
        None => Err(BridgeError::Configuration {
            path: path.to_string(),
            root: root.to_string(),
        }),
    }
}

fn normalized_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Convert a normalized response into a native one. Headers are written
/// in iteration order; the body's keyword keys become strings here and
/// nowhere else.
pub fn into_native(normalized: NormalizedResponse) -> Result<Response, BridgeError> {
    let status =
        StatusCode::from_u16(normalized.status).map_err(|_| BridgeError::Status(normalized.status))?;

    let handler_set_content_type = normalized
        .headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));

    let mut builder = Response::builder().status(status);
    for (name, value) in &normalized.headers {
        builder = builder.header(name, value);
    }

    let response = match normalized.body {
        KwValue::Null => builder.body(Body::empty())?,
        KwValue::String(text) => builder.body(Body::from(text))?,
        structured => {
            if !handler_set_content_type {
                builder = builder.header("content-type", "application/json");
            }
            let payload = structured.stringify_keys();
            builder.body(Body::from(payload.to_string()))?
        }
    };
    Ok(response)
}

/// General adapter operation: normalize, dispatch, convert back.
pub async fn bridge_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, BridgeError> {
    let uri = prune_path(&state.root_path, request.uri().path())?;
    tracing::debug!(uri = %uri, method = %request.method(), "bridging request");

    let (parts, body) = request.into_parts();
    let mut normalized =
        NormalizedRequest::new(uri, parts.method.clone(), normalized_headers(&parts.headers));

    if is_body_bearing(&parts.method) {
        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(BridgeError::BodyRead)?;
        let decoded = RequestBody::decode(normalized.header("content-type"), &bytes)?;
        normalized = normalized.with_body(decoded);
    }

    let handler = state.registry.current();
    let response = handler.handle(normalized)?;
    tracing::debug!(status = response.status, "handler responded");

    into_native(response)
}

/// `POST {root}/start-nrepl`.
pub async fn start_nrepl_handler(State(state): State<AppState>) -> Response {
    match state.boost.start().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "started"}))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "start-nrepl rejected");
            (StatusCode::CONFLICT, Json(json!({"status": "error"}))).into_response()
        }
    }
}

/// `POST {root}/stop-nrepl`.
pub async fn stop_nrepl_handler(State(state): State<AppState>) -> Response {
    match state.boost.stop().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "stopped"}))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "stop-nrepl rejected");
            (StatusCode::CONFLICT, Json(json!({"status": "error"}))).into_response()
        }
    }
}
