//! Normalized response shape and the keyword→string egress conversion.

use std::fmt;

use serde_json::Value;

/// A symbolic key. Handlers build response bodies keyed by `Keyword`;
/// keys become strings only at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword(String);

impl Keyword {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The keyword's name, without any sigil.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl From<&str> for Keyword {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A structured value whose map keys are keywords.
///
/// This is the shape handlers return. It converts to plain JSON (string
/// keys) through [`KwValue::stringify_keys`], which consumes the value
/// so the conversion can only happen once, on the way out.
#[derive(Debug, Clone, PartialEq)]
pub enum KwValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Seq(Vec<KwValue>),
    Map(Vec<(Keyword, KwValue)>),
}

impl KwValue {
    /// Build a map from keyword/value pairs, preserving order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Keyword>,
        V: Into<KwValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        KwValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Recursively convert keyword keys to string keys, producing plain
    /// JSON. Walks nested maps and sequences.
    pub fn stringify_keys(self) -> Value {
        match self {
            KwValue::Null => Value::Null,
            KwValue::Bool(b) => Value::Bool(b),
            KwValue::Number(n) => Value::Number(n),
            KwValue::String(s) => Value::String(s),
            KwValue::Seq(items) => {
                Value::Array(items.into_iter().map(KwValue::stringify_keys).collect())
            }
            KwValue::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.0, v.stringify_keys()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for KwValue {
    fn from(s: &str) -> Self {
        KwValue::String(s.to_string())
    }
}

impl From<String> for KwValue {
    fn from(s: String) -> Self {
        KwValue::String(s)
    }
}

impl From<i64> for KwValue {
    fn from(n: i64) -> Self {
        KwValue::Number(n.into())
    }
}

impl From<u64> for KwValue {
    fn from(n: u64) -> Self {
        KwValue::Number(n.into())
    }
}

impl From<bool> for KwValue {
    fn from(b: bool) -> Self {
        KwValue::Bool(b)
    }
}

/// The normalized response returned by the dynamic handler.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Headers written into the native response in iteration order.
    pub headers: Vec<(String, String)>,
    /// Keyword-keyed body; [`KwValue::Null`] means no body.
    pub body: KwValue,
}

impl NormalizedResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: KwValue::Null,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: KwValue) -> Self {
        self.body = body;
        self
    }
}
