//! Fixed-width text rendering of a `ResultSeries` for stdout

use crate::aggregator_core::ResultSeries;
use std::fmt::Write;

const ABSENT: &str = "-";

fn fmt_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.4}", v))
        .unwrap_or_else(|| ABSENT.to_string())
}

/// One row per bucket followed by totals. With `show_max` the global maximum
/// is appended.
pub fn render_table(series: &ResultSeries, show_max: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>5}  {:<20}  {:<20}  {:>7}  {:>10}  {:>10}  {:<19}",
        "#", "lower", "upper", "count", "mean", "max", "max_at"
    );
    let _ = writeln!(out, "{}", "-".repeat(103));

    for (bucket, stats) in series {
        let _ = writeln!(
            out,
            "{:>5}  {:<20}  {:<20}  {:>7}  {:>10}  {:>10}  {:<19}",
            bucket.index,
            bucket.lower.format("%Y-%m-%d %H:%M:%S"),
            bucket.upper.format("%Y-%m-%d %H:%M:%S"),
            stats.count,
            fmt_value(stats.mean),
            fmt_value(stats.max),
            stats
                .max_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| ABSENT.to_string()),
        );
    }

    let _ = writeln!(out, "{}", "-".repeat(103));
    let _ = writeln!(
        out,
        "buckets: {} ({} with data, {} empty)  samples: {}  out of range: {}",
        series.len(),
        series.buckets_with_data(),
        series.empty_bucket_count(),
        series.total_count(),
        series.out_of_range_count()
    );

    if show_max {
        match series.global_max() {
            Some(max) => {
                let _ = writeln!(
                    out,
                    "max error: {:.4} at {} (bucket {})",
                    max.value,
                    max.at.format("%Y-%m-%d %H:%M:%S"),
                    max.bucket_index
                );
            }
            None => {
                let _ = writeln!(out, "max error: {}", ABSENT);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::{Frequency, Metric, MetricSet, Sample, TimeRange};
    use crate::pipeline::PipelineOrchestrator;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 21, h, m, 0).unwrap()
    }

    fn run(samples: &[Sample], metrics: MetricSet) -> ResultSeries {
        PipelineOrchestrator::new()
            .run(
                TimeRange::new(at(0, 0), at(1, 0)).unwrap(),
                Frequency::from_minutes(30).unwrap(),
                samples,
                &metrics,
            )
            .unwrap()
    }

    #[test]
    fn test_rows_and_totals() {
        let series = run(
            &[
                Sample::new(at(0, 10), 0.5),
                Sample::new(at(0, 20), 0.9),
                Sample::new(at(2, 0), 3.0),
            ],
            MetricSet::all(),
        );

        let table = render_table(&series, true);
        let lines: Vec<&str> = table.lines().collect();

        // header, rule, 2 buckets, rule, totals, max
        assert_eq!(lines.len(), 7);
        assert!(lines[2].contains("0.7000"));
        assert!(lines[2].contains("0.9000"));
        assert!(lines[2].contains("2025-12-21 00:20:00"));
        assert!(lines[3].trim_end().ends_with('-'));
        assert!(lines[5].contains("out of range: 1"));
        assert_eq!(lines[6], "max error: 0.9000 at 2025-12-21 00:20:00 (bucket 0)");
    }

    #[test]
    fn test_unselected_metrics_show_dash() {
        let series = run(
            &[Sample::new(at(0, 10), 0.5)],
            MetricSet::only(&[Metric::Count]),
        );

        let table = render_table(&series, true);
        assert!(table.lines().nth(2).unwrap().contains("      1           -           -  -"));
        assert!(table.ends_with("max error: -\n"));
    }
}
