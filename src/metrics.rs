//! Internal observability metrics for monit-exporter
//!
//! Counters and gauges describing the exporter's own polling of Monit.
//! They are appended after the Monit series on every scrape and survive
//! failed polls.
//!
//! # Metrics
//!
//! - `monit_exporter_build_info{version="..."}` - Always 1
//! - `monit_exporter_scrapes_total` - Counter of Monit polls
//! - `monit_exporter_scrape_errors_total{kind="..."}` - Counter of failed polls by error kind
//! - `monit_exporter_last_scrape_duration_seconds` - Duration of the last poll
//! - `monit_exporter_last_scrape_timestamp_seconds` - Unix timestamp of the last poll

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ErrorKind;
use crate::transformer::families::{
    BUILD_INFO, LAST_SCRAPE_DURATION_SECONDS, LAST_SCRAPE_TIMESTAMP_SECONDS,
    SCRAPE_ERRORS_TOTAL, SCRAPES_TOTAL,
};
use crate::transformer::PrometheusMetric;

/// Thread-safe counter using atomic operations
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Increment the counter by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Thread-safe gauge using atomic operations
#[derive(Debug, Default)]
pub struct Gauge {
    /// Stored as bits of f64 for atomic operations
    value: AtomicU64,
}

impl Gauge {
    /// Create a new gauge initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Set the gauge to a specific value
    pub fn set(&self, v: f64) {
        self.value.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Set the gauge to the current Unix timestamp
    pub fn set_to_current_time(&self) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.set(timestamp);
    }
}

/// Internal metrics of one exporter instance
#[derive(Debug, Default)]
pub struct InternalMetrics {
    /// Counter of Monit polls
    pub scrapes_total: Counter,
    /// Counters of failed polls, indexed like `ErrorKind::ALL`
    scrape_errors: [Counter; 4],
    /// Duration of the last poll in seconds
    pub last_scrape_duration: Gauge,
    /// Unix timestamp of the last poll
    pub last_scrape_timestamp: Gauge,
}

impl InternalMetrics {
    /// Create a new internal metrics registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished poll, successful when `error` is `None`
    pub fn record_scrape(&self, duration: Duration, error: Option<ErrorKind>) {
        self.scrapes_total.inc();
        self.last_scrape_duration.set(duration.as_secs_f64());
        self.last_scrape_timestamp.set_to_current_time();

        if let Some(kind) = error {
            self.errors(kind).inc();
        }
    }

    /// Error counter for one kind
    pub fn errors(&self, kind: ErrorKind) -> &Counter {
        let index = ErrorKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.scrape_errors[index]
    }

    /// Format all internal metrics as Prometheus metrics
    ///
    /// Every error kind is emitted, including those that never occurred.
    pub fn to_prometheus_metrics(&self) -> Vec<PrometheusMetric> {
        let mut metrics = Vec::with_capacity(4 + ErrorKind::ALL.len());

        metrics.push(
            PrometheusMetric::new(&BUILD_INFO, 1.0)
                .with_label("version", env!("CARGO_PKG_VERSION")),
        );
        metrics.push(PrometheusMetric::new(
            &SCRAPES_TOTAL,
            self.scrapes_total.get() as f64,
        ));

        for kind in ErrorKind::ALL {
            metrics.push(
                PrometheusMetric::new(&SCRAPE_ERRORS_TOTAL, self.errors(kind).get() as f64)
                    .with_label("kind", kind.as_str()),
            );
        }

        metrics.push(PrometheusMetric::new(
            &LAST_SCRAPE_DURATION_SECONDS,
            self.last_scrape_duration.get(),
        ));
        metrics.push(PrometheusMetric::new(
            &LAST_SCRAPE_TIMESTAMP_SECONDS,
            self.last_scrape_timestamp.get(),
        ));

        metrics
    }
}
