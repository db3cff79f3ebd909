//! Metric transformation module
//!
//! This module maps decoded Monit status documents to Prometheus series
//! and renders them in the text exposition format.

pub mod engine;
pub mod families;
pub mod formatter;

pub use engine::{transform, PrometheusMetric};
pub use families::{MetricFamily, MetricType};
pub use formatter::{PrometheusFormatter, CONTENT_TYPE};
