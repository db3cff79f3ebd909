//! Transform Engine - Monit service records to Prometheus metrics
//!
//! This module provides the core mapping that turns a decoded Monit status
//! document into labeled Prometheus samples. Which sections of a record are
//! emitted depends on its service type; everything else is ignored even when
//! the agent sent non-zero values for it.

use std::collections::HashMap;

use crate::collector::{EntityRecord, LinkDirection, NetworkCount, StatusDocument};

use super::families::{
    MetricFamily, SERVICE_CHECK, SERVICE_CPU_PERC, SERVICE_MEM_BYTES,
    SERVICE_NETWORK_LINK_STATE, SERVICE_NETWORK_LINK_STATISTICS, SERVICE_PORT_RESPONSE_TIMES,
    SERVICE_READ_BYTES, SERVICE_WRITE_BYTES,
};

/// A single Prometheus sample
#[derive(Debug, Clone, PartialEq)]
pub struct PrometheusMetric {
    /// Family descriptor (name, help, type)
    pub family: &'static MetricFamily,
    /// Labels, in insertion order
    pub labels: Vec<(&'static str, String)>,
    /// Metric value
    pub value: f64,
}

impl PrometheusMetric {
    /// Create a new sample for the given family
    pub fn new(family: &'static MetricFamily, value: f64) -> Self {
        Self {
            family,
            labels: Vec::with_capacity(family.labels.len()),
            value,
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.labels.push((key, value.into()));
        self
    }

    /// Metric name
    pub fn name(&self) -> &'static str {
        self.family.name
    }

    /// Label value by name
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Samples keyed by series identity; a repeated identity overwrites the
/// earlier value in place
#[derive(Default)]
struct MetricSet {
    metrics: Vec<PrometheusMetric>,
    index: HashMap<(&'static str, Vec<(&'static str, String)>), usize>,
}

impl MetricSet {
    fn push(&mut self, metric: PrometheusMetric) {
        let key = (metric.name(), metric.labels.clone());
        match self.index.get(&key) {
            Some(&position) => {
                tracing::debug!(
                    metric = metric.name(),
                    labels = ?metric.labels,
                    "Duplicate series, keeping the later value"
                );
                self.metrics[position] = metric;
            }
            None => {
                self.index.insert(key, self.metrics.len());
                self.metrics.push(metric);
            }
        }
    }

    fn into_metrics(self) -> Vec<PrometheusMetric> {
        self.metrics
    }
}

/// Transform a decoded status document into Prometheus samples
///
/// Pure function: the same document always yields the same samples, in
/// document order. `monit_up` is not part of the output; availability is
/// owned by the caller.
pub fn transform(document: &StatusDocument) -> Vec<PrometheusMetric> {
    let mut set = MetricSet::default();
    for service in &document.services {
        transform_service(service, &mut set);
    }
    set.into_metrics()
}

fn transform_service(service: &EntityRecord, out: &mut MetricSet) {
    let name = service.name.as_str();
    let entity_type = service.entity_type;

    out.push(
        PrometheusMetric::new(&SERVICE_CHECK, service.status as f64)
            .with_label("check_name", name)
            .with_label("type", entity_type.as_str())
            .with_label("monitored", service.monitored.as_str()),
    );

    if entity_type.reports_resources() {
        let memory = &service.memory;
        typed(out, &SERVICE_MEM_BYTES, name, "kilobyte", kilobytes_to_bytes(memory.kilobyte));
        typed(
            out,
            &SERVICE_MEM_BYTES,
            name,
            "kilobyte_total",
            kilobytes_to_bytes(memory.kilobyte_total),
        );
        typed(out, &SERVICE_CPU_PERC, name, "percentage", service.cpu.percent);
        typed(
            out,
            &SERVICE_CPU_PERC,
            name,
            "percentage_total",
            service.cpu.percent_total,
        );
    }

    if entity_type.reports_disk_io() {
        let write = &service.disk_write.bytes;
        let read = &service.disk_read.bytes;
        typed(out, &SERVICE_WRITE_BYTES, name, "write_count", write.count as f64);
        typed(out, &SERVICE_WRITE_BYTES, name, "write_count_total", write.total as f64);
        typed(out, &SERVICE_READ_BYTES, name, "read_count", read.count as f64);
        typed(out, &SERVICE_READ_BYTES, name, "read_count_total", read.total as f64);
    }

    if entity_type.reports_link() {
        out.push(
            PrometheusMetric::new(&SERVICE_NETWORK_LINK_STATE, service.link.state as f64)
                .with_label("check_name", name),
        );
        link_direction(out, name, "download", &service.link.download);
        link_direction(out, name, "upload", &service.link.upload);
    }

    for port in &service.ports {
        let uri = format!(
            "{}://{}:{}",
            port.socket_type.to_lowercase(),
            port.hostname,
            port.port_number
        );
        out.push(
            PrometheusMetric::new(&SERVICE_PORT_RESPONSE_TIMES, port.response_time)
                .with_label("check_name", name)
                .with_label("hostname", port.hostname.as_str())
                .with_label("path", "")
                .with_label("port", port.port_number.as_str())
                .with_label("protocol", port.protocol.as_str())
                .with_label("type", port.socket_type.as_str())
                .with_label("uri", uri),
        );
    }

    for socket in &service.unix_sockets {
        out.push(
            PrometheusMetric::new(&SERVICE_PORT_RESPONSE_TIMES, socket.response_time)
                .with_label("check_name", name)
                .with_label("hostname", "")
                .with_label("path", socket.path.as_str())
                .with_label("port", "")
                .with_label("protocol", socket.protocol.as_str())
                .with_label("type", "UNIX")
                .with_label("uri", format!("unix://{}", socket.path)),
        );
    }
}

/// Sample labeled by `check_name` and a sub-type `type`
fn typed(
    out: &mut MetricSet,
    family: &'static MetricFamily,
    check_name: &str,
    sub_type: &'static str,
    value: f64,
) {
    out.push(
        PrometheusMetric::new(family, value)
            .with_label("check_name", check_name)
            .with_label("type", sub_type),
    );
}

fn link_direction(out: &mut MetricSet, check_name: &str, direction: &'static str, link: &LinkDirection) {
    link_unit(out, check_name, direction, "packets", &link.packets);
    link_unit(out, check_name, direction, "bytes", &link.bytes);
    link_unit(out, check_name, direction, "errors", &link.errors);
}

fn link_unit(
    out: &mut MetricSet,
    check_name: &str,
    direction: &'static str,
    unit: &'static str,
    count: &NetworkCount,
) {
    for (kind, value) in [("now", count.now), ("total", count.total)] {
        out.push(
            PrometheusMetric::new(&SERVICE_NETWORK_LINK_STATISTICS, value as f64)
                .with_label("check_name", check_name)
                .with_label("direction", direction)
                .with_label("unit", unit)
                .with_label("type", kind),
        );
    }
}

fn kilobytes_to_bytes(kilobytes: i64) -> f64 {
    kilobytes as f64 * 1024.0
}
