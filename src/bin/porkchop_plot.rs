use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use chrono::DateTime;
use clap::{Parser, ValueEnum};
use orrery::base::constants::SECONDS_PER_DAY;
use orrery::cli::init_tracing;
use plotters::prelude::*;
use serde::Deserialize;
use tracing::info;

/// Render a porkchop CSV (as written by `porkchop`) to a PNG heatmap.
#[derive(Parser, Debug)]
#[command(author, version, about = "Render a porkchop heatmap from the porkchop CSV")]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/pork.png")]
    output: PathBuf,
    /// Value used for the cell colours
    #[arg(long, value_enum, default_value_t = Metric::Tof)]
    metric: Metric,
    /// Spacing of the time-of-flight lines (days); 0 disables them
    #[arg(long, default_value_t = 30.0)]
    tof_step_days: f64,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Metric {
    #[value(alias = "tof_days")]
    Tof,
    #[value(name = "dv", aliases = ["dv_total", "dv_total_m_s"])]
    DeltaV,
    #[value(alias = "c3_m2_s2")]
    C3,
}

impl Metric {
    fn pick(self, row: &Row) -> Option<f64> {
        match self {
            Metric::Tof => row.tof_days,
            Metric::DeltaV => row.dv_total_m_s,
            Metric::C3 => row.c3_m2_s2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Metric::Tof => "Time of flight (days)",
            Metric::DeltaV => "Total Δv (m/s)",
            Metric::C3 => "C3 (m²/s²)",
        }
    }
}

const REQUIRED_COLUMNS: [&str; 6] = [
    "depart_unix",
    "arrive_unix",
    "tof_days",
    "c3_m2_s2",
    "dv_total_m_s",
    "feasible",
];

#[derive(Debug, Deserialize)]
struct Row {
    depart_unix: i64,
    arrive_unix: i64,
    tof_days: Option<f64>,
    c3_m2_s2: Option<f64>,
    dv_total_m_s: Option<f64>,
    feasible: bool,
    #[serde(default)]
    origin_body: String,
    #[serde(default)]
    dest_body: String,
}

/// Rows regrouped onto the departure × arrival lattice.
struct Heatmap {
    departures: Vec<i64>,
    arrivals: Vec<i64>,
    /// `values[arrival][departure]`; `None` marks an infeasible or missing cell.
    values: Vec<Vec<Option<f64>>>,
    tof: Vec<Vec<Option<f64>>>,
    route: String,
}

impl Heatmap {
    fn from_rows(rows: &[Row], metric: Metric) -> Self {
        let mut departures: Vec<i64> = rows.iter().map(|r| r.depart_unix).collect();
        let mut arrivals: Vec<i64> = rows.iter().map(|r| r.arrive_unix).collect();
        departures.sort_unstable();
        departures.dedup();
        arrivals.sort_unstable();
        arrivals.dedup();

        let mut values = vec![vec![None; departures.len()]; arrivals.len()];
        let mut tof = values.clone();
        for row in rows {
            let (Ok(j), Ok(i)) = (
                departures.binary_search(&row.depart_unix),
                arrivals.binary_search(&row.arrive_unix),
            ) else {
                continue;
            };
            if row.feasible {
                values[i][j] = metric.pick(row).filter(|v| v.is_finite());
                tof[i][j] = row.tof_days;
            }
        }
        let route = rows
            .first()
            .map(|r| format!("{} → {}", r.origin_body, r.dest_body))
            .unwrap_or_default();
        Self {
            departures,
            arrivals,
            values,
            tof,
            route,
        }
    }

    fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Lowest metric value, shorter flight on ties.
    fn best(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (i, row) in self.values.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let Some(v) = *value else { continue };
                let better = match best {
                    None => true,
                    Some((bi, bj, bv)) => {
                        v < bv
                            || (v == bv
                                && self.tof[i][j].unwrap_or(f64::INFINITY)
                                    < self.tof[bi][bj].unwrap_or(f64::INFINITY))
                    }
                };
                if better {
                    best = Some((i, j, v));
                }
            }
        }
        best
    }

    fn departure_day(&self, j: usize) -> f64 {
        (self.departures[j] - self.departures[0]) as f64 / SECONDS_PER_DAY
    }

    fn arrival_day(&self, i: usize) -> f64 {
        (self.arrivals[i] - self.arrivals[0]) as f64 / SECONDS_PER_DAY
    }

    /// Half-open span around sample `idx` on an axis of day offsets.
    fn span(days: &[f64], idx: usize) -> (f64, f64) {
        let half = match (idx.checked_sub(1).map(|k| days[k]), days.get(idx + 1)) {
            (Some(prev), _) => (days[idx] - prev) / 2.0,
            (None, Some(next)) => (next - days[idx]) / 2.0,
            (None, None) => 0.5,
        };
        (days[idx] - half, days[idx] + half)
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let rows = read_rows(&cli.input)?;
    let heatmap = Heatmap::from_rows(&rows, cli.metric);
    let (lo, hi) = heatmap
        .range()
        .ok_or_else(|| anyhow!("No feasible cells in the provided CSV"))?;

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    render(&cli, &heatmap, lo, hi)?;
    info!(path = %cli.output.display(), min = lo, max = hi, "rendered porkchop plot");
    Ok(())
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<Row>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!("CSV missing '{column}' column");
        }
    }
    reader
        .deserialize()
        .collect::<Result<Vec<Row>, _>>()
        .context("malformed porkchop row")
}

fn render(cli: &Cli, heatmap: &Heatmap, lo: f64, hi: f64) -> anyhow::Result<()> {
    let root = BitMapBackend::new(&cli.output, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let legend_width = 150i32;
    let (plot_area, legend_area) =
        root.split_horizontally((cli.width as i32 - legend_width).max(200));

    let dep_days: Vec<f64> = (0..heatmap.departures.len())
        .map(|j| heatmap.departure_day(j))
        .collect();
    let arr_days: Vec<f64> = (0..heatmap.arrivals.len())
        .map(|i| heatmap.arrival_day(i))
        .collect();
    let x_max = dep_days.last().copied().unwrap_or(0.0).max(1.0);
    let y_max = arr_days.last().copied().unwrap_or(0.0).max(1.0);
    let dep0 = heatmap.departures[0];
    let arr0 = heatmap.arrivals[0];

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(20)
        .caption(
            format!("Porkchop {}", heatmap.route),
            ("sans-serif", 24),
        )
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Departure")
        .y_desc("Arrival")
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|d| date_label(dep0, *d))
        .y_label_formatter(&|d| date_label(arr0, *d))
        .draw()?;

    let infeasible = RGBColor(225, 225, 225);
    for (i, row) in heatmap.values.iter().enumerate() {
        let (y0, y1) = Heatmap::span(&arr_days, i);
        for (j, value) in row.iter().enumerate() {
            let (x0, x1) = Heatmap::span(&dep_days, j);
            let fill = match value {
                Some(v) => ramp(normalize(*v, lo, hi)),
                None => infeasible,
            };
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x0, y0), (x1, y1)],
                fill.filled(),
            )))?;
        }
    }

    // tof = (arr0 - dep0)/day + y - x, so every iso-tof line has unit slope.
    if cli.tof_step_days > 0.0 {
        let offset = (arr0 - dep0) as f64 / SECONDS_PER_DAY;
        let first = ((offset - x_max) / cli.tof_step_days).ceil().max(1.0) as i64;
        let last = ((offset + y_max) / cli.tof_step_days).floor() as i64;
        for k in first..=last {
            let tof = k as f64 * cli.tof_step_days;
            let Some(segment) = clip_unit_slope(tof - offset, x_max, y_max) else {
                continue;
            };
            chart.draw_series(std::iter::once(PathElement::new(
                vec![segment.0, segment.1],
                BLACK.mix(0.35).stroke_width(1),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("{tof:.0} d"),
                segment.1,
                ("sans-serif", 13).into_font().color(&BLACK.mix(0.6)),
            )))?;
        }
    }

    if let Some((i, j, value)) = heatmap.best() {
        let (x, y) = (dep_days[j], arr_days[i]);
        let marker = RGBColor(255, 255, 255);
        chart.draw_series(std::iter::once(Circle::new(
            (x, y),
            6,
            marker.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{value:.2}"),
            (x + 0.02 * x_max, y + 0.02 * y_max),
            ("sans-serif", 16).into_font().color(&BLACK),
        )))?;
    }

    draw_legend(&legend_area, cli.metric, lo, hi)?;
    root.present()?;
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    metric: Metric,
    lo: f64,
    hi: f64,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    // A constant metric still gets a visible bar.
    let (lo_axis, hi_axis) = if hi > lo {
        (lo, hi)
    } else {
        (lo - lo.abs().max(1.0) * 1e-3, hi + hi.abs().max(1.0) * 1e-3)
    };
    let mut chart = ChartBuilder::on(area)
        .margin(30)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..1.0, lo_axis..hi_axis)
        .map_err(|e| anyhow!("{e}"))?;
    let steps = 200;
    chart
        .draw_series((0..steps).map(|k| {
            let t0 = k as f64 / steps as f64;
            let t1 = (k + 1) as f64 / steps as f64;
            let v0 = lo_axis + (hi_axis - lo_axis) * t0;
            let v1 = lo_axis + (hi_axis - lo_axis) * t1;
            Rectangle::new([(0.0, v0), (1.0, v1)], ramp(t0).filled())
        }))
        .map_err(|e| anyhow!("{e}"))?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(6)
        .y_desc(metric.label())
        .y_label_formatter(&|v| format!("{v:.1}"))
        .draw()
        .map_err(|e| anyhow!("{e}"))?;
    Ok(())
}

/// Segment of `y = x + c` inside `[0, x_max] × [0, y_max]`.
fn clip_unit_slope(c: f64, x_max: f64, y_max: f64) -> Option<((f64, f64), (f64, f64))> {
    let x_start = (-c).max(0.0);
    let x_end = (y_max - c).min(x_max);
    (x_end > x_start).then_some(((x_start, x_start + c), (x_end, x_end + c)))
}

fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo { (value - lo) / (hi - lo) } else { 0.0 }
}

/// Dark blue through teal and green to yellow.
fn ramp(t: f64) -> RGBColor {
    const STOPS: [(f64, (f64, f64, f64)); 4] = [
        (0.0, (40.0, 20.0, 100.0)),
        (0.35, (30.0, 130.0, 140.0)),
        (0.7, (110.0, 200.0, 90.0)),
        (1.0, (250.0, 230.0, 40.0)),
    ];
    let t = t.clamp(0.0, 1.0);
    let upper = STOPS.iter().position(|(at, _)| *at >= t).unwrap_or(3).max(1);
    let (t0, c0) = STOPS[upper - 1];
    let (t1, c1) = STOPS[upper];
    let f = (t - t0) / (t1 - t0);
    let lerp = |a: f64, b: f64| (a + f * (b - a)).round() as u8;
    RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2))
}

fn date_label(start_unix: i64, days: f64) -> String {
    let unix = start_unix + (days * SECONDS_PER_DAY).round() as i64;
    match DateTime::from_timestamp(unix, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => format!("{unix}"),
    }
}
