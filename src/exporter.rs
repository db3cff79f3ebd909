//! Collection orchestrator
//!
//! Runs one fetch, decode and map pass per call and publishes the result as
//! an immutable [`Snapshot`]. Polls are serialized; readers never observe a
//! half-built snapshot.

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

use crate::collector::{client_from_config, CollectResult, Collector};
use crate::config::MonitConfig;
use crate::error::AppResult;
use crate::metrics::InternalMetrics;
use crate::transformer::families::{SERVICE_FAMILIES, UP};
use crate::transformer::{transform, MetricFamily, PrometheusFormatter, PrometheusMetric};

/// Series published by one poll
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Whether the poll reached Monit and decoded its status
    pub up: bool,
    /// `monit_up` followed by the per-service series
    pub metrics: Vec<PrometheusMetric>,
}

impl Snapshot {
    /// Snapshot of a failed poll: `monit_up 0` and nothing else
    pub fn unavailable() -> Self {
        Self {
            up: false,
            metrics: vec![PrometheusMetric::new(&UP, 0.0)],
        }
    }

    /// Snapshot of a successful poll
    pub fn available(service_metrics: Vec<PrometheusMetric>) -> Self {
        let mut metrics = Vec::with_capacity(service_metrics.len() + 1);
        metrics.push(PrometheusMetric::new(&UP, 1.0));
        metrics.extend(service_metrics);
        Self { up: true, metrics }
    }

    /// Per-service series, without `monit_up`
    pub fn service_metrics(&self) -> &[PrometheusMetric] {
        &self.metrics[1..]
    }
}

/// Monit exporter
pub struct Exporter {
    collector: Collector,
    published: ArcSwap<Snapshot>,
    poll_lock: Mutex<()>,
    internal: InternalMetrics,
}

impl Exporter {
    /// Create an exporter around a collector; nothing is published until the
    /// first poll, so the initial snapshot reports `monit_up 0`
    pub fn new(collector: Collector) -> Self {
        Self {
            collector,
            published: ArcSwap::from_pointee(Snapshot::unavailable()),
            poll_lock: Mutex::new(()),
            internal: InternalMetrics::new(),
        }
    }

    /// Build the HTTP client and collector from configuration
    pub fn from_config(config: &MonitConfig) -> AppResult<Self> {
        let client = client_from_config(config)?;
        Ok(Self::new(Collector::new(client)))
    }

    /// Families this exporter can publish from a Monit status
    pub fn describe() -> &'static [&'static MetricFamily] {
        &SERVICE_FAMILIES
    }

    /// Poll Monit once and return the published snapshot, or the poll error
    ///
    /// The unavailable snapshot is published on error as well.
    pub async fn scrape(&self) -> CollectResult<Arc<Snapshot>> {
        let (snapshot, result) = self.poll().await;
        result.map(|()| snapshot)
    }

    /// Poll Monit once and return whatever that poll published
    pub async fn collect(&self) -> Arc<Snapshot> {
        self.poll().await.0
    }

    /// Last published snapshot, without polling
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.published.load_full()
    }

    /// Counters and gauges about this exporter's own polls
    pub fn internal_metrics(&self) -> &InternalMetrics {
        &self.internal
    }

    /// Exposition text of a snapshot followed by the internal metrics
    pub fn render(&self, snapshot: &Snapshot) -> String {
        let formatter = PrometheusFormatter::new();
        let mut output = formatter.format(&snapshot.metrics);
        output.push_str(&formatter.format(&self.internal.to_prometheus_metrics()));
        output
    }

    #[instrument(skip(self), fields(uri = %self.collector.client().scrape_uri()))]
    async fn poll(&self) -> (Arc<Snapshot>, CollectResult<()>) {
        let _guard = self.poll_lock.lock().await;
        let start = Instant::now();

        let (snapshot, result) = match self.collector.collect().await {
            Ok(document) => {
                let snapshot = Snapshot::available(transform(&document));
                debug!(
                    series = snapshot.metrics.len(),
                    "Monit status mapped"
                );
                (Arc::new(snapshot), Ok(()))
            }
            Err(e) => {
                if e.is_timeout() {
                    error!(error = %e, "Timed out scraping monit");
                } else {
                    error!(error = %e, kind = e.kind().as_str(), "Error scraping monit");
                }
                (Arc::new(Snapshot::unavailable()), Err(e))
            }
        };

        self.published.store(Arc::clone(&snapshot));

        let duration = start.elapsed();
        self.internal
            .record_scrape(duration, result.as_ref().err().map(|e| e.kind()));
        debug!(duration_ms = duration.as_millis() as u64, up = snapshot.up, "Poll complete");

        (snapshot, result)
    }
}
