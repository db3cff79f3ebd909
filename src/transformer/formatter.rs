//! Prometheus Exposition Format output
//!
//! This module handles formatting of Prometheus metrics into the text
//! exposition format (version 0.0.4).
//!
//! # Format Specification
//!
//! ```text
//! # HELP <metric_name> <help_text>
//! # TYPE <metric_name> <type>
//! <metric_name>{<label1>="<value1>",<label2>="<value2>"} <value>
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use super::engine::PrometheusMetric;

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Prometheus exposition format formatter
///
/// # Example
///
/// ```ignore
/// use monit_exporter::transformer::{families, PrometheusFormatter, PrometheusMetric};
///
/// let metrics = vec![PrometheusMetric::new(&families::UP, 1.0)];
/// let output = PrometheusFormatter::new().format(&metrics);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrometheusFormatter;

impl PrometheusFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self
    }

    /// Format metrics into Prometheus exposition format
    ///
    /// # Notes
    ///
    /// - HELP and TYPE lines are emitted once per family, taken from its descriptor
    /// - Labels are sorted alphabetically for deterministic output
    /// - Samples of the same family are grouped together, families keep the
    ///   order of their first sample
    pub fn format(&self, metrics: &[PrometheusMetric]) -> String {
        if metrics.is_empty() {
            return String::new();
        }

        let mut output = String::with_capacity(metrics.len() * 100);

        for group in Self::group_by_name(metrics) {
            let family = group[0].family;

            // String writes are infallible
            let _ = writeln!(
                output,
                "# HELP {} {}",
                family.name,
                Self::escape_help(family.help)
            );
            let _ = writeln!(
                output,
                "# TYPE {} {}",
                family.name,
                family.metric_type.as_str()
            );

            for metric in group {
                Self::write_metric_line(&mut output, metric);
            }
        }

        output
    }

    /// Group metrics by name, preserving order of first occurrence
    fn group_by_name(metrics: &[PrometheusMetric]) -> Vec<Vec<&PrometheusMetric>> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<Vec<&PrometheusMetric>> = Vec::new();

        for metric in metrics {
            let position = *positions.entry(metric.name()).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[position].push(metric);
        }

        groups
    }

    /// Format a single metric line
    fn write_metric_line(output: &mut String, metric: &PrometheusMetric) {
        output.push_str(metric.name());

        // Labels (sorted for deterministic output)
        if !metric.labels.is_empty() {
            let mut sorted_labels: Vec<&(&'static str, String)> = metric.labels.iter().collect();
            sorted_labels.sort_by_key(|(k, _)| *k);

            let label_pairs: Vec<String> = sorted_labels
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, Self::escape_label_value(v)))
                .collect();

            output.push('{');
            output.push_str(&label_pairs.join(","));
            output.push('}');
        }

        output.push(' ');
        output.push_str(&Self::format_value(metric.value));
        output.push('\n');
    }

    /// Format a numeric value for Prometheus
    ///
    /// - NaN → "NaN"
    /// - +Inf → "+Inf"
    /// - -Inf → "-Inf"
    /// - Integers are formatted without decimal point
    /// - Large/small floats use scientific notation
    fn format_value(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                "+Inf".to_string()
            } else {
                "-Inf".to_string()
            }
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            // Format as integer if no fractional part and not too large
            format!("{}", value as i64)
        } else if value.abs() >= 1e15 || (value.abs() < 1e-3 && value != 0.0) {
            format!("{:e}", value)
        } else {
            format!("{}", value)
        }
    }

    /// Escape help text
    ///
    /// Escapes backslash and newline characters.
    fn escape_help(help: &str) -> String {
        help.replace('\\', "\\\\").replace('\n', "\\n")
    }

    /// Escape label value
    ///
    /// Escapes backslash, double-quote, and newline characters.
    fn escape_label_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::families::{
        SCRAPES_TOTAL, SERVICE_CHECK, SERVICE_MEM_BYTES, SERVICE_PORT_RESPONSE_TIMES, UP,
    };

    #[test]
    fn test_format_metric_without_labels() {
        let metrics = vec![PrometheusMetric::new(&UP, 1.0)];

        let output = PrometheusFormatter::new().format(&metrics);

        assert!(output.contains("# HELP monit_up Monit status availability"));
        assert!(output.contains("# TYPE monit_up gauge"));
        assert!(output.contains("monit_up 1\n"));
        assert!(!output.contains('{'));
    }

    #[test]
    fn test_format_counter_type() {
        let metrics = vec![PrometheusMetric::new(&SCRAPES_TOTAL, 3.0)];
        let output = PrometheusFormatter::new().format(&metrics);
        assert!(output.contains("# TYPE monit_exporter_scrapes_total counter"));
    }

    #[test]
    fn test_format_metric_with_labels() {
        let metrics = vec![PrometheusMetric::new(&SERVICE_CHECK, 0.0)
            .with_label("check_name", "nginx")
            .with_label("type", "process")
            .with_label("monitored", "1")];

        let output = PrometheusFormatter::new().format(&metrics);

        // Labels should be sorted alphabetically
        assert!(output
            .contains("monit_service_check{check_name=\"nginx\",monitored=\"1\",type=\"process\"} 0"));
    }

    #[test]
    fn test_format_groups_interleaved_families() {
        let metrics = vec![
            PrometheusMetric::new(&SERVICE_CHECK, 0.0).with_label("check_name", "a"),
            PrometheusMetric::new(&SERVICE_MEM_BYTES, 1024.0).with_label("check_name", "a"),
            PrometheusMetric::new(&SERVICE_CHECK, 1.0).with_label("check_name", "b"),
        ];

        let output = PrometheusFormatter::new().format(&metrics);

        // HELP and TYPE should appear only once per family
        assert_eq!(output.matches("# HELP monit_service_check ").count(), 1);
        assert_eq!(output.matches("# TYPE monit_service_check ").count(), 1);

        let check_a = output.find("check_name=\"a\"} 0").unwrap();
        let check_b = output.find("check_name=\"b\"} 1").unwrap();
        let memory = output.find("monit_service_mem_bytes{").unwrap();
        assert!(check_a < check_b);
        assert!(check_b < memory);
    }

    #[test]
    fn test_format_empty_label_values() {
        let metrics = vec![PrometheusMetric::new(&SERVICE_PORT_RESPONSE_TIMES, 0.001)
            .with_label("check_name", "php")
            .with_label("hostname", "")
            .with_label("path", "/run/php.sock")
            .with_label("port", "")
            .with_label("protocol", "DEFAULT")
            .with_label("type", "UNIX")
            .with_label("uri", "unix:///run/php.sock")];

        let output = PrometheusFormatter::new().format(&metrics);

        assert!(output.contains(
            "monit_service_port_response_times{check_name=\"php\",hostname=\"\",path=\"/run/php.sock\",port=\"\",protocol=\"DEFAULT\",type=\"UNIX\",uri=\"unix:///run/php.sock\"} 0.001"
        ));
    }

    #[test]
    fn test_format_value_nan() {
        assert_eq!(PrometheusFormatter::format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_value_infinity() {
        assert_eq!(PrometheusFormatter::format_value(f64::INFINITY), "+Inf");
        assert_eq!(PrometheusFormatter::format_value(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_format_value_integer() {
        assert_eq!(PrometheusFormatter::format_value(136835072.0), "136835072");
        assert_eq!(PrometheusFormatter::format_value(0.0), "0");
        assert_eq!(PrometheusFormatter::format_value(-1.0), "-1");
    }

    #[test]
    fn test_format_value_decimal() {
        assert_eq!(PrometheusFormatter::format_value(6.5), "6.5");
        assert_eq!(PrometheusFormatter::format_value(0.002), "0.002");
    }

    #[test]
    fn test_format_value_scientific() {
        let formatted = PrometheusFormatter::format_value(1.23e-6);
        assert!(formatted.contains('e'));
    }

    #[test]
    fn test_escape_help() {
        assert_eq!(PrometheusFormatter::escape_help("simple"), "simple");
        assert_eq!(
            PrometheusFormatter::escape_help("line1\nline2"),
            "line1\\nline2"
        );
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(PrometheusFormatter::escape_label_value("simple"), "simple");
        assert_eq!(
            PrometheusFormatter::escape_label_value("with\"quote"),
            "with\\\"quote"
        );
        assert_eq!(
            PrometheusFormatter::escape_label_value("C:\\monit"),
            "C:\\\\monit"
        );
        assert_eq!(
            PrometheusFormatter::escape_label_value("with\nnewline"),
            "with\\nnewline"
        );
    }

    #[test]
    fn test_format_empty_metrics() {
        let output = PrometheusFormatter::new().format(&[]);
        assert!(output.is_empty());
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let metrics = vec![
            PrometheusMetric::new(&UP, 1.0),
            PrometheusMetric::new(&SERVICE_CHECK, 0.0).with_label("check_name", "x"),
        ];
        let output = PrometheusFormatter::new().format(&metrics);
        for line in output.lines() {
            assert!(!line.ends_with(' '), "Line should not end with space: {}", line);
        }
    }
}
