//! Prometheus text exposition format (version 0.0.4).

use std::fmt::Write;

use super::metrics::{MetricDescriptor, MetricValue};

/// Content type served alongside [`render`] output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

/// Render every family in `descs` order. Families without samples still get
/// their `# HELP` / `# TYPE` header.
pub fn render(descs: &[MetricDescriptor], values: &[MetricValue]) -> String {
    let mut out = String::new();
    for d in descs {
        let _ = writeln!(out, "# HELP {} {}", d.name, escape_help(d.help));
        let _ = writeln!(out, "# TYPE {} {}", d.name, d.kind.as_str());
        for v in values.iter().filter(|v| v.name == d.name) {
            if v.labels.is_empty() {
                let _ = writeln!(out, "{} {}", v.name, format_value(v.value));
            } else {
                let label_str = v
                    .labels
                    .iter()
                    .map(|(k, lv)| format!("{}=\"{}\"", k, escape_label(lv)))
                    .collect::<Vec<_>>()
                    .join(",");
                let _ = writeln!(out, "{}{{{}}} {}", v.name, label_str, format_value(v.value));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obs::metrics::MetricKind;

    const DESCS: [MetricDescriptor; 2] = [
        MetricDescriptor {
            name: "faktory_up",
            help: "Was the last scrape of the Faktory instance successful?",
            kind: MetricKind::Gauge,
            labels: &[],
        },
        MetricDescriptor {
            name: "faktory_queue_jobs",
            help: "Number of jobs in every queue.",
            kind: MetricKind::Gauge,
            labels: &["queue"],
        },
    ];

    fn queue(name: &str, v: f64) -> MetricValue {
        MetricValue {
            name: "faktory_queue_jobs",
            kind: MetricKind::Gauge,
            labels: vec![("queue".into(), name.into())],
            value: v,
        }
    }

    #[test]
    fn empty_family_keeps_header() {
        let out = render(&DESCS, &[]);
        assert!(out.contains("# HELP faktory_queue_jobs Number of jobs in every queue.\n"));
        assert!(out.contains("# TYPE faktory_queue_jobs gauge\n"));
        assert!(!out.contains("faktory_queue_jobs{"));
    }

    #[test]
    fn scalar_and_labelled_samples() {
        let up = MetricValue {
            name: "faktory_up",
            kind: MetricKind::Gauge,
            labels: vec![],
            value: 1.0,
        };
        let out = render(&DESCS, &[up, queue("default", 10.0), queue("low", 2.5)]);
        assert!(out.contains("\nfaktory_up 1\n"));
        assert!(out.contains("faktory_queue_jobs{queue=\"default\"} 10\n"));
        assert!(out.contains("faktory_queue_jobs{queue=\"low\"} 2.5\n"));
    }

    #[test]
    fn label_values_are_escaped() {
        let out = render(&DESCS, &[queue("we\"ird\\q\n", 1.0)]);
        assert!(out.contains(r#"faktory_queue_jobs{queue="we\"ird\\q\n"} 1"#));
    }

    #[test]
    fn special_values() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(1234567890123.0), "1234567890123");
    }
}
