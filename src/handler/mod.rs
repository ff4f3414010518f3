//! Dynamic handler dispatch.
//!
//! # Responsibilities
//! - Define the handler seam between the bridge and application logic
//! - Hold the currently bound handler behind an atomic reference
//! - Provide the default handler used before any registration
//!
//! # Design Decisions
//! - Handler invocation is a synchronous call; its duration is the
//!   embedding handler's responsibility
//! - The registry is read lock-free on every request and written
//!   rarely (bootstrap, or an explicit administrative rebind)

pub mod registry;

pub use registry::HandlerRegistry;

use thiserror::Error;

use crate::ring::{KwValue, NormalizedRequest, NormalizedResponse};

/// Error raised by a dynamic handler. The bridge does not catch or
/// mask these; they surface through the adapter's 500-class path.
#[derive(Debug, Error)]
#[error("handler failed: {message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// A replaceable function from normalized request to normalized
/// response, resolved at dispatch time rather than bound at compile
/// time.
pub trait Handler: Send + Sync {
    fn handle(&self, request: NormalizedRequest) -> Result<NormalizedResponse, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(NormalizedRequest) -> Result<NormalizedResponse, HandlerError> + Send + Sync,
{
    fn handle(&self, request: NormalizedRequest) -> Result<NormalizedResponse, HandlerError> {
        self(request)
    }
}

/// Responds 404 until the embedding application installs a handler.
pub struct NotFoundHandler;

impl Handler for NotFoundHandler {
    fn handle(&self, _request: NormalizedRequest) -> Result<NormalizedResponse, HandlerError> {
        Ok(NormalizedResponse::new(404)
            .with_body(KwValue::map([("error", "no handler installed")])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn echo_uri(req: NormalizedRequest) -> Result<NormalizedResponse, HandlerError> {
        Ok(NormalizedResponse::new(200).with_body(KwValue::from(req.uri)))
    }

    #[test]
    fn test_fn_is_a_handler() {
        let res = echo_uri
            .handle(NormalizedRequest::new("/x", Method::GET, vec![]))
            .unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.body, KwValue::from("/x"));
    }

    #[test]
    fn test_not_found_handler() {
        let res = NotFoundHandler
            .handle(NormalizedRequest::new("/x", Method::GET, vec![]))
            .unwrap();
        assert_eq!(res.status, 404);
    }
}
