//! Metric family descriptors
//!
//! Every family the exporter can publish, with its help text, type and the
//! fixed label names its series carry.

/// Namespace prefix of the service families
pub const NAMESPACE: &str = "monit";

/// Prometheus metric type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Gauge metric - a value that can go up and down
    Gauge,
    /// Counter metric - a monotonically increasing value
    Counter,
}

impl MetricType {
    /// Returns the Prometheus type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Counter => "counter",
        }
    }
}

/// Descriptor of one metric family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricFamily {
    pub name: &'static str,
    pub help: &'static str,
    pub metric_type: MetricType,
    pub labels: &'static [&'static str],
}

pub static UP: MetricFamily = MetricFamily {
    name: "monit_up",
    help: "Monit status availability",
    metric_type: MetricType::Gauge,
    labels: &[],
};

pub static SERVICE_CHECK: MetricFamily = MetricFamily {
    name: "monit_service_check",
    help: "Monit service check info",
    metric_type: MetricType::Gauge,
    labels: &["check_name", "type", "monitored"],
};

pub static SERVICE_CPU_PERC: MetricFamily = MetricFamily {
    name: "monit_service_cpu_perc",
    help: "Monit service CPU info",
    metric_type: MetricType::Gauge,
    labels: &["check_name", "type"],
};

pub static SERVICE_MEM_BYTES: MetricFamily = MetricFamily {
    name: "monit_service_mem_bytes",
    help: "Monit service mem info",
    metric_type: MetricType::Gauge,
    labels: &["check_name", "type"],
};

pub static SERVICE_WRITE_BYTES: MetricFamily = MetricFamily {
    name: "monit_service_write_bytes",
    help: "Monit service Disk Writes Bytes",
    metric_type: MetricType::Gauge,
    labels: &["check_name", "type"],
};

pub static SERVICE_READ_BYTES: MetricFamily = MetricFamily {
    name: "monit_service_read_bytes",
    help: "Monit service Disk Read Bytes",
    metric_type: MetricType::Gauge,
    labels: &["check_name", "type"],
};

pub static SERVICE_PORT_RESPONSE_TIMES: MetricFamily = MetricFamily {
    name: "monit_service_port_response_times",
    help: "Monit service port and unix socket checks response times",
    metric_type: MetricType::Gauge,
    labels: &[
        "check_name",
        "hostname",
        "path",
        "port",
        "protocol",
        "type",
        "uri",
    ],
};

pub static SERVICE_NETWORK_LINK_STATE: MetricFamily = MetricFamily {
    name: "monit_service_network_link_state",
    help: "Monit service link states",
    metric_type: MetricType::Gauge,
    labels: &["check_name"],
};

pub static SERVICE_NETWORK_LINK_STATISTICS: MetricFamily = MetricFamily {
    name: "monit_service_network_link_statistics",
    help: "Monit service link statistics",
    metric_type: MetricType::Gauge,
    labels: &["check_name", "direction", "unit", "type"],
};

/// Families published from the Monit status, in describe order
pub static SERVICE_FAMILIES: [&MetricFamily; 9] = [
    &UP,
    &SERVICE_CHECK,
    &SERVICE_CPU_PERC,
    &SERVICE_MEM_BYTES,
    &SERVICE_WRITE_BYTES,
    &SERVICE_READ_BYTES,
    &SERVICE_PORT_RESPONSE_TIMES,
    &SERVICE_NETWORK_LINK_STATE,
    &SERVICE_NETWORK_LINK_STATISTICS,
];

pub static BUILD_INFO: MetricFamily = MetricFamily {
    name: "monit_exporter_build_info",
    help: "monit-exporter build information",
    metric_type: MetricType::Gauge,
    labels: &["version"],
};

pub static SCRAPES_TOTAL: MetricFamily = MetricFamily {
    name: "monit_exporter_scrapes_total",
    help: "Total number of Monit status polls",
    metric_type: MetricType::Counter,
    labels: &[],
};

pub static SCRAPE_ERRORS_TOTAL: MetricFamily = MetricFamily {
    name: "monit_exporter_scrape_errors_total",
    help: "Total number of failed Monit status polls by error kind",
    metric_type: MetricType::Counter,
    labels: &["kind"],
};

pub static LAST_SCRAPE_DURATION_SECONDS: MetricFamily = MetricFamily {
    name: "monit_exporter_last_scrape_duration_seconds",
    help: "Duration of the last Monit status poll",
    metric_type: MetricType::Gauge,
    labels: &[],
};

pub static LAST_SCRAPE_TIMESTAMP_SECONDS: MetricFamily = MetricFamily {
    name: "monit_exporter_last_scrape_timestamp_seconds",
    help: "Unix timestamp of the last Monit status poll",
    metric_type: MetricType::Gauge,
    labels: &[],
};

/// Exporter self-observability families
pub static INTERNAL_FAMILIES: [&MetricFamily; 5] = [
    &BUILD_INFO,
    &SCRAPES_TOTAL,
    &SCRAPE_ERRORS_TOTAL,
    &LAST_SCRAPE_DURATION_SECONDS,
    &LAST_SCRAPE_TIMESTAMP_SECONDS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_service_families_use_namespace() {
        for family in SERVICE_FAMILIES {
            assert!(
                family.name.starts_with(NAMESPACE),
                "{} is outside the {} namespace",
                family.name,
                NAMESPACE
            );
        }
    }

    #[test]
    fn test_family_names_are_unique() {
        let names: HashSet<&str> = SERVICE_FAMILIES
            .iter()
            .chain(INTERNAL_FAMILIES.iter())
            .map(|f| f.name)
            .collect();
        assert_eq!(names.len(), SERVICE_FAMILIES.len() + INTERNAL_FAMILIES.len());
    }

    #[test]
    fn test_counters_end_with_total() {
        for family in SERVICE_FAMILIES.iter().chain(INTERNAL_FAMILIES.iter()) {
            if family.metric_type == MetricType::Counter {
                assert!(family.name.ends_with("_total"), "{}", family.name);
            }
        }
    }
}
