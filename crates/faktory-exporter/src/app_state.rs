//! Shared application state for the exporter.
//!
//! Startup errors (bad URL, unreachable server, rejected password) are
//! returned from [`AppState::connect`] so main can exit non-zero before any
//! listener is bound.

use std::sync::Arc;

use faktory_exporter_core::error::Result;

use crate::client::{ConnectionUrl, FaktoryClient, StatusSource};
use crate::collector::MetricsCollector;
use crate::config::ExporterConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    collector: Arc<MetricsCollector>,
}

struct AppStateInner {
    cfg: ExporterConfig,
}

impl AppState {
    /// Wire state around an existing status source.
    pub fn new(cfg: ExporterConfig, source: Box<dyn StatusSource>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            collector: Arc::new(MetricsCollector::new(source)),
        }
    }

    /// Parse the configured URL, dial Faktory and build the collector.
    pub async fn connect(cfg: ExporterConfig) -> Result<Self> {
        let target = ConnectionUrl::parse(&cfg.faktory.url)?;
        let client = FaktoryClient::connect(target, cfg.faktory.timeout()).await?;
        Ok(Self::new(cfg, Box::new(client)))
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        Arc::clone(&self.collector)
    }
}
