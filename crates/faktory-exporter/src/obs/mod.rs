//! In-process metrics and their Prometheus text rendering.
//!
//! The registry types carry no global state; the collector owns every
//! instance and the `/metrics` handler renders what it returns.

pub mod exposition;
pub mod metrics;

pub use metrics::{MetricDescriptor, MetricKind, MetricValue};
