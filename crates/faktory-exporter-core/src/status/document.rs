//! Raw `INFO` response.
//!
//! The document is kept as a JSON object so that nothing is assumed about its
//! shape until [`super::decode`] runs.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Untyped status document as returned by the upstream server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StatusDocument(Map<String, Value>);

impl StatusDocument {
    /// Wrap a JSON value. Returns `None` unless it is an object.
    pub fn from_value(v: Value) -> Option<Self> {
        match v {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
