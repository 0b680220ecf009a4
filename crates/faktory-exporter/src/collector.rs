//! Scrape-and-publish cycle.
//!
//! One [`MetricsCollector`] exists per process. Every call to
//! [`MetricsCollector::collect_snapshot`] runs a full scrape under the scrape
//! lock:
//!
//! 1. start the clock
//! 2. drop every labelled series (`jobs_total{status}`, `queue_jobs{queue}`)
//! 3. fetch `INFO` and decode it
//! 4. on success overwrite scalars and repopulate labelled series
//! 5. bookkeeping: duration, scrape counters, `up`
//! 6. read out every value before releasing the lock
//!
//! Scrape errors never leave this module; they are logged and show up as
//! `up = 0` plus an incremented failure counter. Scalars keep their last known
//! values across failed scrapes.

use std::time::Instant;

use tokio::sync::Mutex;

use faktory_exporter_core::{decode, ExporterError, Result, Stats};

use crate::client::StatusSource;
use crate::obs::metrics::{Counter, CounterVec, Gauge, GaugeVec};
use crate::obs::{MetricDescriptor, MetricKind, MetricValue};

const UP: &str = "faktory_up";
const SCRAPE_DURATION: &str = "faktory_exporter_scrape_duration_seconds";
const SCRAPE_FAILURES: &str = "faktory_exporter_scrape_failures_total";
const SCRAPES: &str = "faktory_exporter_scrapes_total";
const COMMAND_COUNT: &str = "faktory_server_command_count";
const CONNECTIONS: &str = "faktory_server_connections";
const JOBS: &str = "faktory_jobs_total";
const RETRIES_ENQUEUED: &str = "faktory_tasks_retries_enqueued";
const RETRIES_SIZE: &str = "faktory_tasks_retries_size";
const QUEUES: &str = "faktory_queues_total";
const QUEUE_JOBS: &str = "faktory_queue_jobs";

const fn desc(
    name: &'static str,
    help: &'static str,
    kind: MetricKind,
    labels: &'static [&'static str],
) -> MetricDescriptor {
    MetricDescriptor { name, help, kind, labels }
}

static DESCRIPTORS: [MetricDescriptor; 11] = [
    desc(UP, "Was the last scrape of the Faktory instance successful?", MetricKind::Gauge, &[]),
    desc(
        SCRAPE_DURATION,
        "Duration of the scrape of metrics from the Faktory instance.",
        MetricKind::Gauge,
        &[],
    ),
    desc(SCRAPE_FAILURES, "Total amount of scrape failures.", MetricKind::Counter, &[]),
    desc(SCRAPES, "Total Faktory scrapes.", MetricKind::Counter, &[]),
    desc(
        COMMAND_COUNT,
        "Number of commands which have been issued to the server.",
        MetricKind::Counter,
        &[],
    ),
    desc(CONNECTIONS, "Number of currently connected clients.", MetricKind::Gauge, &[]),
    desc(JOBS, "Total amount of jobs.", MetricKind::Counter, &["status"]),
    desc(RETRIES_ENQUEUED, "Task retries enqueued.", MetricKind::Gauge, &[]),
    desc(RETRIES_SIZE, "Task retries size.", MetricKind::Gauge, &[]),
    desc(QUEUES, "Total amount of queues.", MetricKind::Gauge, &[]),
    desc(QUEUE_JOBS, "Number of jobs in every queue.", MetricKind::Gauge, &["queue"]),
];

#[derive(Debug, Default)]
struct ExporterMetrics {
    up: Gauge,
    scrape_duration: Gauge,
    scrape_failures: Counter,
    scrapes: Counter,
    command_count: Counter,
    connections: Gauge,
    jobs: CounterVec,
    retries_enqueued: Gauge,
    retries_size: Gauge,
    total_queues: Gauge,
    queues: GaugeVec,
}

pub struct MetricsCollector {
    /// The scrape lock. Owning the source means a fetch can only happen
    /// while holding it.
    source: Mutex<Box<dyn StatusSource>>,
    m: ExporterMetrics,
}

impl MetricsCollector {
    pub fn new(source: Box<dyn StatusSource>) -> Self {
        Self {
            source: Mutex::new(source),
            m: ExporterMetrics::default(),
        }
    }

    /// One descriptor per exported family, always in the same order.
    pub fn describe(&self) -> Vec<MetricDescriptor> {
        DESCRIPTORS.to_vec()
    }

    /// Run one scrape cycle and return every current value.
    ///
    /// Concurrent callers queue on the scrape lock; each runs its own cycle.
    pub async fn collect_snapshot(&self) -> Vec<MetricValue> {
        let mut source = self.source.lock().await;

        if let Err(e) = self.scrape(&mut **source).await {
            match &e {
                ExporterError::Decode(d) => tracing::error!(
                    code = e.code().as_str(),
                    field = d.field(),
                    error = %e,
                    "scrape failed"
                ),
                _ => tracing::error!(code = e.code().as_str(), error = %e, "scrape failed"),
            }
        }

        self.values()
    }

    async fn scrape(&self, source: &mut dyn StatusSource) -> Result<()> {
        let begun = Instant::now();
        self.reset();

        let res = self.fetch_and_update(source).await;

        self.m.scrape_duration.set(begun.elapsed().as_secs_f64());
        self.m.scrapes.inc();
        if res.is_err() {
            self.m.up.set(0.0);
            self.m.scrape_failures.inc();
        } else {
            self.m.up.set(1.0);
        }
        res
    }

    /// Drop labelled series so vanished queues do not linger.
    fn reset(&self) {
        self.m.jobs.reset();
        self.m.queues.reset();
    }

    async fn fetch_and_update(&self, source: &mut dyn StatusSource) -> Result<()> {
        let doc = source.fetch_status().await?;
        let stats = decode(&doc)?;
        self.apply(&stats);
        Ok(())
    }

    fn apply(&self, s: &Stats) {
        self.m.command_count.set(s.command_count);
        self.m.connections.set(s.connections);
        self.m.jobs.set(&[("status", "enqueued")], s.total_enqueued);
        self.m.jobs.set(&[("status", "failure")], s.total_failures);
        self.m.jobs.set(&[("status", "processed")], s.total_processed);
        self.m.retries_enqueued.set(s.retries_enqueued);
        self.m.retries_size.set(s.retries_size);
        self.m.total_queues.set(s.total_queues);
        for (queue, size) in &s.queue_sizes {
            self.m.queues.set(&[("queue", queue.as_str())], *size);
        }
    }

    fn values(&self) -> Vec<MetricValue> {
        let scalar = |name, kind, value| MetricValue {
            name,
            kind,
            labels: Vec::new(),
            value,
        };
        let m = &self.m;

        let mut out = vec![
            scalar(UP, MetricKind::Gauge, m.up.get()),
            scalar(SCRAPE_DURATION, MetricKind::Gauge, m.scrape_duration.get()),
            scalar(SCRAPE_FAILURES, MetricKind::Counter, m.scrape_failures.get()),
            scalar(SCRAPES, MetricKind::Counter, m.scrapes.get()),
            scalar(COMMAND_COUNT, MetricKind::Counter, m.command_count.get()),
            scalar(CONNECTIONS, MetricKind::Gauge, m.connections.get()),
        ];
        out.extend(m.jobs.samples().into_iter().map(|(labels, value)| MetricValue {
            name: JOBS,
            kind: MetricKind::Counter,
            labels,
            value,
        }));
        out.push(scalar(RETRIES_ENQUEUED, MetricKind::Gauge, m.retries_enqueued.get()));
        out.push(scalar(RETRIES_SIZE, MetricKind::Gauge, m.retries_size.get()));
        out.push(scalar(QUEUES, MetricKind::Gauge, m.total_queues.get()));
        out.extend(m.queues.samples().into_iter().map(|(labels, value)| MetricValue {
            name: QUEUE_JOBS,
            kind: MetricKind::Gauge,
            labels,
            value,
        }));
        out
    }
}
