//! Normalized request shape and content-type-driven body decoding.

use axum::http::Method;
use thiserror::Error;

/// Methods that carry a request body through the bridge.
const BODY_BEARING: [Method; 3] = [Method::POST, Method::PUT, Method::PATCH];

/// Returns true if the bridge reads and decodes a body for this method.
pub fn is_body_bearing(method: &Method) -> bool {
    BODY_BEARING.contains(method)
}

/// Error decoding a request body.
#[derive(Debug, Error)]
pub enum BodyDecodeError {
    /// Body declared application/json but did not parse.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decoded request payload, keyed off the `content-type` header.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/json`: a generic key-value mapping.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`: multi-valued pairs.
    Form(FormParams),
    /// Anything else, or no content type at all: the raw text.
    Text(String),
}

impl RequestBody {
    /// Decode raw bytes according to the request's `content-type`.
    ///
    /// Media type parameters (`; charset=...`) do not affect dispatch.
    pub fn decode(content_type: Option<&str>, bytes: &[u8]) -> Result<Self, BodyDecodeError> {
        let essence = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .unwrap_or_default();

        match essence.as_str() {
            "application/json" => Ok(RequestBody::Json(serde_json::from_slice(bytes)?)),
            "application/x-www-form-urlencoded" => Ok(RequestBody::Form(FormParams::parse(bytes))),
            _ => Ok(RequestBody::Text(String::from_utf8_lossy(bytes).into_owned())),
        }
    }
}

/// Multi-valued form parameters. A key may repeat; pairs keep their
/// original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// Decode a urlencoded byte string.
    pub fn parse(bytes: &[u8]) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(bytes).into_owned().collect(),
        }
    }

    /// All values for `key`, in the order they appeared.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Iterate all pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(String, String)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { pairs: iter.into_iter().collect() }
    }
}

/// The normalized request handed to the dynamic handler.
///
/// `uri` has the configured root prefix already removed. `body` is
/// `Some` only for body-bearing methods; its absence is meaningful and
/// distinct from an empty body.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    pub uri: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl NormalizedRequest {
    /// Build a request with no body attached.
    pub fn new(
        uri: impl Into<String>,
        method: Method,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            uri: uri.into(),
            method,
            headers,
            body: None,
        }
    }

    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Attach a decoded body, consuming the original request value.
    pub fn with_body(self, body: RequestBody) -> Self {
        Self { body: Some(body), ..self }
    }
}
