//! Minimal metrics registry for the exporter.
//!
//! Scalar counters/gauges keep their `f64` value as bits in an `AtomicU64`.
//! Labelled families are backed by `DashMap`; labels are flattened into
//! sorted key vectors and samples are returned in sorted order so that the
//! exposition output is deterministic.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prometheus metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Static description of one metric family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    /// Label names; empty for scalar metrics.
    pub labels: &'static [&'static str],
}

/// One sample of a metric family.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub name: &'static str,
    pub kind: MetricKind,
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl MetricValue {
    /// Value of the label `key`, if present.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn new(v: f64) -> Self {
        Self(AtomicU64::new(v.to_bits()))
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    fn add(&self, delta: f64) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + delta).to_bits())
            });
    }
}

#[derive(Debug, Default)]
pub struct Gauge {
    v: AtomicF64,
}

impl Gauge {
    pub fn set(&self, v: f64) {
        self.v.store(v);
    }

    pub fn get(&self) -> f64 {
        self.v.load()
    }
}

#[derive(Debug, Default)]
pub struct Counter {
    v: AtomicF64,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.v.add(1.0);
    }

    /// Mirror a cumulative total maintained by someone else (the upstream
    /// server). Monotonicity is the source's responsibility.
    pub fn set(&self, v: f64) {
        self.v.store(v);
    }

    pub fn get(&self) -> f64 {
        self.v.load()
    }
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Debug, Default)]
struct Series {
    map: DashMap<Vec<(String, String)>, AtomicF64>,
}

impl Series {
    fn set(&self, labels: &[(&str, &str)], v: f64) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicF64::new(0.0))
            .store(v);
    }

    fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map.get(&label_key(labels)).map(|r| r.value().load())
    }

    fn reset(&self) {
        self.map.clear();
    }

    fn samples(&self) -> Vec<(Vec<(String, String)>, f64)> {
        let mut out: Vec<_> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

/// Labelled counter family.
#[derive(Debug, Default)]
pub struct CounterVec {
    series: Series,
}

impl CounterVec {
    /// Mirror an upstream cumulative total for one label set.
    pub fn set(&self, labels: &[(&str, &str)], v: f64) {
        self.series.set(labels, v);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.series.get(labels)
    }

    /// Drop every label set.
    pub fn reset(&self) {
        self.series.reset();
    }

    pub fn samples(&self) -> Vec<(Vec<(String, String)>, f64)> {
        self.series.samples()
    }
}

/// Labelled gauge family.
#[derive(Debug, Default)]
pub struct GaugeVec {
    series: Series,
}

impl GaugeVec {
    pub fn set(&self, labels: &[(&str, &str)], v: f64) {
        self.series.set(labels, v);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.series.get(labels)
    }

    /// Drop every label set.
    pub fn reset(&self) {
        self.series.reset();
    }

    pub fn samples(&self) -> Vec<(Vec<(String, String)>, f64)> {
        self.series.samples()
    }
}
