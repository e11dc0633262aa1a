//! Where a candidate signature comes from: a raw value or request headers.

use std::collections::HashMap;

use serde_json::Value;

/// A header's value; multi-valued headers keep every occurrence in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValue {
    /// The value a signature is read from: the first occurrence.
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(value) => Some(value.as_str()),
            HeaderValue::Multi(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Single(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Single(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        HeaderValue::Multi(values)
    }
}

impl From<Vec<&str>> for HeaderValue {
    fn from(values: Vec<&str>) -> Self {
        HeaderValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}

/// Request headers in the order they were received.
///
/// Names keep their original case; lookups ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, HeaderValue)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. Existing entries with the same name are kept; lookups
    /// return the first match.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder form of [`Headers::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<HeaderValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// JSON text of a header value that is not a string. `null` yields nothing.
fn header_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// The caller's "signature or headers" argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureSource {
    /// The signature itself.
    Signature(String),
    /// Headers to search for the configured signature header.
    Headers(Headers),
    /// Anything else; carries the offending JSON type name.
    Unsupported(&'static str),
}

impl From<&str> for SignatureSource {
    fn from(signature: &str) -> Self {
        SignatureSource::Signature(signature.to_string())
    }
}

impl From<String> for SignatureSource {
    fn from(signature: String) -> Self {
        SignatureSource::Signature(signature)
    }
}

impl From<&String> for SignatureSource {
    fn from(signature: &String) -> Self {
        SignatureSource::Signature(signature.clone())
    }
}

impl From<Headers> for SignatureSource {
    fn from(headers: Headers) -> Self {
        SignatureSource::Headers(headers)
    }
}

impl From<&Headers> for SignatureSource {
    fn from(headers: &Headers) -> Self {
        SignatureSource::Headers(headers.clone())
    }
}

impl From<HashMap<String, String>> for SignatureSource {
    fn from(headers: HashMap<String, String>) -> Self {
        SignatureSource::Headers(headers.into_iter().collect())
    }
}

impl From<&Value> for SignatureSource {
    /// Strings are signatures and objects are headers. Header values may be
    /// strings or arrays of strings; `null` headers are treated as absent.
    fn from(value: &Value) -> Self {
        match value {
            Value::String(signature) => SignatureSource::Signature(signature.clone()),
            Value::Object(map) => SignatureSource::Headers(
                map.iter()
                    .filter_map(|(name, value)| {
                        let header = match value {
                            Value::Array(items) => HeaderValue::Multi(
                                items
                                    .iter()
                                    .map(|item| header_text(item).unwrap_or_default())
                                    .collect(),
                            ),
                            other => HeaderValue::Single(header_text(other)?),
                        };
                        Some((name.clone(), header))
                    })
                    .collect(),
            ),
            Value::Null => SignatureSource::Unsupported("null"),
            Value::Bool(_) => SignatureSource::Unsupported("boolean"),
            Value::Number(_) => SignatureSource::Unsupported("number"),
            Value::Array(_) => SignatureSource::Unsupported("array"),
        }
    }
}

impl From<Value> for SignatureSource {
    fn from(value: Value) -> Self {
        SignatureSource::from(&value)
    }
}
