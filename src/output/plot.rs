//! Pointing-error plot
//!
//! Renders a `ResultSeries` as a time plot: per-bucket max error, optionally
//! the per-bucket mean, and with `show_max_error` the global maximum plus a
//! description box. `.svg` paths get the SVG backend, everything else PNG.

use super::writer_backend::AggregatorWriterError;
use crate::aggregator_core::{BucketStats, Metric, ResultSeries, TimeRange};
use chrono::{DateTime, TimeDelta, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

/// Plot configuration
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Plot width in pixels
    pub width: u32,
    /// Plot height in pixels
    pub height: u32,
    pub title: String,
    /// Highlight the global maximum and draw the description box
    pub show_max_error: bool,
    /// Draw the per-bucket mean next to the max
    pub show_mean: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            title: "Pointing Errors".to_string(),
            show_max_error: false,
            show_mean: true,
        }
    }
}

fn minutes_since(start: DateTime<Utc>, t: DateTime<Utc>) -> f64 {
    (t - start).num_milliseconds() as f64 / 60_000.0
}

/// Contiguous runs of buckets that have a value, as `(minutes, value)` points
/// at bucket midpoints. An empty bucket ends the current run.
fn line_segments<F>(series: &ResultSeries, pick: F) -> Vec<Vec<(f64, f64)>>
where
    F: Fn(&BucketStats) -> Option<f64>,
{
    let start = series.range().start();
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for (bucket, stats) in series {
        match pick(stats) {
            Some(value) => {
                let mid = (minutes_since(start, bucket.lower) + minutes_since(start, bucket.upper)) / 2.0;
                current.push((mid, value));
            }
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

fn description_lines(series: &ResultSeries) -> Vec<String> {
    let range = series.range();
    let mut lines = vec![
        format!(
            "Range: {} - {} UTC",
            range.start().format("%Y-%m-%d %H:%M"),
            range.end().format("%Y-%m-%d %H:%M")
        ),
        format!("Frequency: {}", series.frequency()),
        format!(
            "Buckets: {} ({} empty)",
            series.len(),
            series.empty_bucket_count()
        ),
    ];
    match series.global_max() {
        Some(max) => lines.push(format!(
            "Max error: {:.4} at {}",
            max.value,
            max.at.format("%Y-%m-%d %H:%M:%S")
        )),
        None => lines.push("Max error: n/a".to_string()),
    }
    lines
}

/// Tick label format; ranges longer than a day need the date to stay unambiguous
fn tick_format(range: TimeRange) -> &'static str {
    if range.duration() > TimeDelta::days(1) {
        "%m-%d %H:%M"
    } else {
        "%H:%M"
    }
}

/// Render `series` to `path`, creating parent directories as needed
pub fn render_series(
    series: &ResultSeries,
    path: &Path,
    config: &PlotConfig,
) -> Result<(), AggregatorWriterError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    let result = if is_svg {
        let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
        draw_chart(&root, series, config)
    } else {
        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        draw_chart(&root, series, config)
    };
    result.map_err(|e| AggregatorWriterError::Plot(e.to_string()))?;

    log::info!("📈 Plot saved to: {}", path.display());
    Ok(())
}

fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &ResultSeries,
    config: &PlotConfig,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let start = series.range().start();
    let x_max = minutes_since(start, series.range().end());

    let max_segments = if series.metrics().contains(Metric::Max) {
        line_segments(series, |s| s.max)
    } else {
        Vec::new()
    };
    let mean_segments = if config.show_mean && series.metrics().contains(Metric::Mean) {
        line_segments(series, |s| s.mean)
    } else {
        Vec::new()
    };

    let y_peak = max_segments
        .iter()
        .chain(mean_segments.iter())
        .flatten()
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max);
    let y_max = if y_peak > 0.0 { y_peak * 1.15 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    let tick = tick_format(series.range());
    let label_time = |x: &f64| {
        let offset = TimeDelta::milliseconds((x * 60_000.0).round() as i64);
        (start + offset).format(tick).to_string()
    };
    chart
        .configure_mesh()
        .x_desc(format!("Time (UTC) from {}", start.format("%Y-%m-%d %H:%M")))
        .y_desc("Pointing error")
        .x_label_formatter(&label_time)
        .y_label_formatter(&|y| format!("{y:.3}"))
        .draw()?;

    let mut has_legend = false;

    for (i, segment) in max_segments.iter().enumerate() {
        let drawn = chart.draw_series(LineSeries::new(segment.clone(), RED.stroke_width(2)))?;
        if i == 0 {
            drawn
                .label("Max error")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
            has_legend = true;
        }
        chart.draw_series(
            segment
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, RED.filled())),
        )?;
    }

    for (i, segment) in mean_segments.iter().enumerate() {
        let drawn = chart.draw_series(LineSeries::new(segment.clone(), &BLUE))?;
        if i == 0 {
            drawn
                .label("Mean error")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
            has_legend = true;
        }
        chart.draw_series(
            segment
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())),
        )?;
    }

    if config.show_max_error {
        if let Some(max) = series.global_max() {
            let point = (minutes_since(start, max.at), max.value);
            chart
                .draw_series(std::iter::once(Circle::new(point, 8, BLACK.stroke_width(2))))?
                .label(format!("Global max {:.4}", max.value))
                .legend(|(x, y)| Circle::new((x + 10, y), 5, BLACK.stroke_width(2)));
            has_legend = true;
        }

        let lines = description_lines(series);
        let (width, _) = root.dim_in_pixel();
        let box_width = 360_i32;
        let x0 = width as i32 - box_width - 90;
        let y0 = 60_i32;
        let y1 = y0 + 14 + 20 * lines.len() as i32;

        root.draw(&Rectangle::new(
            [(x0, y0), (x0 + box_width, y1)],
            WHITE.mix(0.9).filled(),
        ))?;
        root.draw(&Rectangle::new(
            [(x0, y0), (x0 + box_width, y1)],
            BLACK.stroke_width(1),
        ))?;
        for (i, line) in lines.iter().enumerate() {
            root.draw(&Text::new(
                line.clone(),
                (x0 + 10, y0 + 8 + 20 * i as i32),
                ("sans-serif", 15).into_font(),
            ))?;
        }
    }

    if has_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
