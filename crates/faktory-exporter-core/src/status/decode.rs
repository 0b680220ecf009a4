//! Validating decoder for the `INFO` document.
//!
//! Layout navigated (everything else in the document is ignored):
//!
//! ```text
//! server.command_count            number
//! server.connections              number
//! faktory.total_enqueued          number
//! faktory.total_failures          number
//! faktory.total_processed         number
//! faktory.total_queues            number
//! faktory.tasks.Retries.enqueued  number
//! faktory.tasks.Retries.size      number
//! faktory.queues.<name>           number, zero or more entries
//! ```
//!
//! Fields are checked in the order above (queues in key order) and the first
//! failure wins, so a given document always reports the same field.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::status::StatusDocument;

type Object = Map<String, Value>;

/// Validated projection of a [`StatusDocument`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub command_count: f64,
    pub connections: f64,
    pub total_enqueued: f64,
    pub total_failures: f64,
    pub total_processed: f64,
    pub total_queues: f64,
    pub queue_sizes: BTreeMap<String, f64>,
    pub retries_enqueued: f64,
    pub retries_size: f64,
}

/// Decode a status document. Pure; either every field is valid or nothing is
/// returned.
pub fn decode(doc: &StatusDocument) -> Result<Stats, DecodeError> {
    let root = doc.as_map();

    let server = object(root, "", "server")?;
    let command_count = number(server, "server", "command_count")?;
    let connections = number(server, "server", "connections")?;

    let faktory = object(root, "", "faktory")?;
    let total_enqueued = number(faktory, "faktory", "total_enqueued")?;
    let total_failures = number(faktory, "faktory", "total_failures")?;
    let total_processed = number(faktory, "faktory", "total_processed")?;
    let total_queues = number(faktory, "faktory", "total_queues")?;

    let tasks = object(faktory, "faktory", "tasks")?;
    let retries = object(tasks, "faktory.tasks", "Retries")?;
    let retries_enqueued = number(retries, "faktory.tasks.Retries", "enqueued")?;
    let retries_size = number(retries, "faktory.tasks.Retries", "size")?;

    let queues = object(faktory, "faktory", "queues")?;
    let mut queue_sizes = BTreeMap::new();
    for name in queues.keys() {
        let size = number(queues, "faktory.queues", name)?;
        queue_sizes.insert(name.clone(), size);
    }

    Ok(Stats {
        command_count,
        connections,
        total_enqueued,
        total_failures,
        total_processed,
        total_queues,
        queue_sizes,
        retries_enqueued,
        retries_size,
    })
}

fn path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn object<'a>(parent: &'a Object, at: &str, key: &str) -> Result<&'a Object, DecodeError> {
    match parent.get(key) {
        None => Err(DecodeError::Missing { field: path(at, key) }),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(DecodeError::WrongType {
            field: path(at, key),
            expected: "an object",
        }),
    }
}

fn number(parent: &Object, at: &str, key: &str) -> Result<f64, DecodeError> {
    match parent.get(key) {
        None => Err(DecodeError::Missing { field: path(at, key) }),
        Some(v) => v.as_f64().ok_or_else(|| DecodeError::WrongType {
            field: path(at, key),
            expected: "a number",
        }),
    }
}
