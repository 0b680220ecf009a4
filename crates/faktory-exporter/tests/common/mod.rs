//! Shared fixtures: a scripted status source and INFO document builders.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use faktory_exporter::client::StatusSource;
use faktory_exporter::obs::MetricValue;
use faktory_exporter_core::{ExporterError, Result, StatusDocument};

/// Replies handed out in order; also records when each fetch starts/ends.
#[derive(Clone, Default)]
pub struct Script {
    replies: Arc<Mutex<VecDeque<Result<StatusDocument>>>>,
    events: Arc<Mutex<Vec<&'static str>>>,
    delay: Duration,
}

impl Script {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn push_ok(&self, doc: Value) {
        let doc = StatusDocument::from_value(doc).expect("document must be an object");
        self.replies.lock().unwrap().push_back(Ok(doc));
    }

    pub fn push_err(&self, e: ExporterError) {
        self.replies.lock().unwrap().push_back(Err(e));
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    pub fn source(&self) -> Box<dyn StatusSource> {
        Box::new(ScriptedSource {
            script: self.clone(),
        })
    }
}

struct ScriptedSource {
    script: Script,
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_status(&mut self) -> Result<StatusDocument> {
        self.script.events.lock().unwrap().push("enter");
        if !self.script.delay.is_zero() {
            tokio::time::sleep(self.script.delay).await;
        }
        let reply = self
            .script
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ExporterError::Fetch("script exhausted".into())));
        self.script.events.lock().unwrap().push("exit");
        reply
    }
}

/// INFO payload with the reference numbers and the given queue map.
pub fn info(queues: Value) -> Value {
    json!({
        "now": "2024-01-01T00:00:00Z",
        "server": { "command_count": 42, "connections": 3, "faktory_version": "1.8.0" },
        "faktory": {
            "total_enqueued": 100,
            "total_failures": 2,
            "total_processed": 98,
            "total_queues": 2,
            "queues": queues,
            "tasks": { "Retries": { "enqueued": 1, "size": 4, "cycles": 9 } }
        }
    })
}

/// Value of `name` (optionally filtered by one label) in a snapshot.
pub fn find(values: &[MetricValue], name: &str, label: Option<(&str, &str)>) -> Option<f64> {
    values
        .iter()
        .find(|v| {
            v.name == name
                && match label {
                    None => v.labels.is_empty(),
                    Some((k, lv)) => v.label(k) == Some(lv),
                }
        })
        .map(|v| v.value)
}

pub fn count(values: &[MetricValue], name: &str) -> usize {
    values.iter().filter(|v| v.name == name).count()
}
