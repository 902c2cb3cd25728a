// File: crates/simchart-demo/src/main.rs
// Summary: Demo drives a bar chart, a scrolling chart with a dragged cursor, a seismograph and
// an XY chart from simulated (or CSV) samples and writes each to a PNG.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use simchart_core::{
    AxisLine, AxisSpacing, BarChart, BarChartConfig, BarStack, ChartPanel, ChartPanelConfig, Color, DataPoint,
    DataSeries, GridLines, LinePlot, LineSpacing, Orientation, Range, ScatterPlot, Scene, ScrollingChart,
    ScrollingChartConfig, Seismograph, SeismographConfig, SeriesStyle, TickLabelConfig, TickLabels,
    TickMarkConfig, TickMarks,
};
use simchart_render_skia::{RenderOptions, SkiaRenderer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_DT: f64 = 1.0 / 60.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let samples = match std::env::args().nth(1) {
        Some(raw) => {
            let path = PathBuf::from(raw);
            load_samples_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?
        }
        None => simulate_oscillator(12.0, FRAME_DT),
    };
    if samples.is_empty() {
        anyhow::bail!("no samples loaded; expected 'time' and 'value' columns");
    }
    info!(samples = samples.len(), "input ready");

    let out_dir = PathBuf::from("target/out");
    let renderer = SkiaRenderer::new();
    let opts = RenderOptions::default();

    write(&renderer, &opts, &bar_chart(&samples)?.render(), &out_dir.join("bar_chart.png"))?;
    write(&renderer, &opts, &scrolling_chart(&samples)?, &out_dir.join("scrolling_chart.png"))?;
    write(&renderer, &opts, &seismograph(&samples)?, &out_dir.join("seismograph.png"))?;
    write(&renderer, &opts, &xy_chart(&samples)?, &out_dir.join("xy_chart.png"))?;
    Ok(())
}

fn write(renderer: &SkiaRenderer, opts: &RenderOptions, scene: &Scene, path: &Path) -> Result<()> {
    renderer.render_to_png(scene, opts, path)?;
    info!(path = %path.display(), "wrote");
    Ok(())
}

/// Damped spring: position and velocity sampled every `dt` seconds.
fn simulate_oscillator(duration: f64, dt: f64) -> Vec<DataPoint> {
    let (k, c) = (12.0, 0.35);
    let (mut x, mut v) = (1.0, 0.0);
    let steps = (duration / dt).round() as usize;
    let mut out = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        out.push(DataPoint::new(i as f64 * dt, x));
        // Semi-implicit Euler keeps the energy bounded.
        v += (-k * x - c * v) * dt;
        x += v * dt;
    }
    out
}

fn load_samples_csv(path: &Path) -> Result<Vec<DataPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
    let i_time = idx(&["time", "t", "x", "seconds"]).unwrap_or(0);
    let i_value = idx(&["value", "y", "v"]).unwrap_or(1);

    let mut out = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let field = |i: usize| rec.get(i).and_then(|s| s.trim().parse::<f64>().ok());
        match (field(i_time), field(i_value)) {
            (Some(t), Some(v)) => out.push(DataPoint::new(t, v)),
            (Some(t), None) => out.push(DataPoint::gap(t)),
            _ => warn!(row, "skipping row without a time value"),
        }
    }
    Ok(out)
}

/// Extent of the finite values, padded by 10% so traces don't touch the border.
fn padded_extent(values: impl IntoIterator<Item = f64>) -> Range {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return Range::new(-1.0, 1.0);
    }
    if hi <= lo {
        return Range::new(lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.1;
    Range::new(lo - pad, hi + pad)
}

fn value_extent(samples: &[DataPoint]) -> Range {
    padded_extent(samples.iter().map(|p| p.y))
}

fn paired_spacing(span: f64) -> Option<LineSpacing> {
    let step = nice_step(span);
    LineSpacing::new(Some(step), Some(step / 2.0)).ok()
}

/// Peak absolute value per second, stacked as positive and negative excursions.
fn bar_chart(samples: &[DataPoint]) -> Result<BarChart> {
    let mut bars = Vec::new();
    let end = samples.last().map(|p| p.x).unwrap_or(0.0).ceil() as usize;
    for second in 0..end.min(12) {
        let window = samples.iter().filter(|p| p.x >= second as f64 && p.x < (second + 1) as f64 && !p.is_gap());
        let (hi, lo) = window.fold((0.0f64, 0.0f64), |(hi, lo), p| (hi.max(p.y), lo.min(p.y)));
        bars.push(
            BarStack::new(vec![hi * 50.0, -lo * 50.0], vec![Color::rgb(32, 120, 200), Color::rgb(200, 60, 60)])?
                .with_label(second.to_string()),
        );
    }
    Ok(BarChart::new(BarChartConfig::default(), bars)?)
}

fn scrolling_chart(samples: &[DataPoint]) -> Result<Scene> {
    let y_range = value_extent(samples);
    let mut chart = ScrollingChart::new(ScrollingChartConfig {
        time_span: 5.0,
        y_range,
        y_spacing: paired_spacing(y_range.span()),
        time_title: Some("time (s)".into()),
        ..ScrollingChartConfig::default()
    })?;
    let series = DataSeries::with_style(SeriesStyle { color: Color::rgb(32, 120, 200), ..SeriesStyle::default() }).shared();
    chart.add_series(Rc::clone(&series), LinePlot::new());
    let cursor = chart.enable_cursor();

    let mut dragged = false;
    for p in samples {
        chart.set_time(p.x)?;
        series.borrow_mut().push(*p);
        if !dragged && p.x >= 3.0 {
            // Grab the cursor and pull it to the middle of the plot.
            let mut c = cursor.borrow_mut();
            c.set_value(p.x);
            if c.start_drag().is_ok() {
                let mid = chart.panel().width() / 2.0;
                c.drag_to(mid);
                c.end_drag();
                dragged = true;
            }
        }
    }
    info!(cursor = cursor.borrow().value(), visible = cursor.borrow().is_visible(), "scrolling chart done");
    Ok(chart.render())
}

fn seismograph(samples: &[DataPoint]) -> Result<Scene> {
    let mut seis = Seismograph::new(
        ScrollingChartConfig { time_span: 4.0, y_range: value_extent(samples), ..ScrollingChartConfig::default() },
        SeismographConfig::default(),
    )?;
    let mut t = 0.0;
    for p in samples {
        seis.step(p.x - t, p.y)?;
        t = p.x;
    }
    Ok(seis.render())
}

/// Phase portrait: velocity against position, with both a line and points.
fn xy_chart(samples: &[DataPoint]) -> Result<Scene> {
    let phase: Vec<DataPoint> = samples
        .windows(2)
        .map(|w| DataPoint::new(w[0].y, (w[1].y - w[0].y) / (w[1].x - w[0].x)))
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    let x_range = padded_extent(phase.iter().map(|p| p.x));
    let y_range = padded_extent(phase.iter().map(|p| p.y));

    let mut panel = ChartPanel::new(ChartPanelConfig { width: 300.0, height: 300.0, x_range, y_range, ..ChartPanelConfig::default() })?;
    let x_step = nice_step(x_range.span());
    let y_step = nice_step(y_range.span());
    panel.set_grid(Some(GridLines::new(AxisSpacing::new(paired_spacing(x_range.span()), paired_spacing(y_range.span())))));
    panel.add_axis_line(AxisLine::new(Orientation::Horizontal));
    panel.add_axis_line(AxisLine::new(Orientation::Vertical));
    panel.add_tick_marks(TickMarks::new(Orientation::Horizontal, x_step, TickMarkConfig::default())?);
    panel.add_tick_marks(TickMarks::new(Orientation::Vertical, y_step, TickMarkConfig::default())?);
    panel.add_tick_labels(TickLabels::new(Orientation::Horizontal, x_step, TickLabelConfig { decimal_places: 1, ..TickLabelConfig::default() })?);
    panel.add_tick_labels(TickLabels::new(Orientation::Vertical, y_step, TickLabelConfig { decimal_places: 1, offset: 14.0, ..TickLabelConfig::default() })?);

    let style = SeriesStyle { color: Color::rgb(20, 160, 90), point_radius: 1.5, ..SeriesStyle::default() };
    let series = DataSeries::with_points(phase, style).shared();
    panel.add_series(Rc::clone(&series), LinePlot::new());
    panel.add_series(series, ScatterPlot);

    let panel_scene = panel.render();
    let mut scene = Scene::new(panel.width() + 80.0, panel.height() + 60.0).with_background(Color::WHITE);
    scene.append_translated(&panel_scene, 56.0, 16.0);
    Ok(scene)
}

/// Round `span / 5` to 1, 2 or 5 times a power of ten.
fn nice_step(span: f64) -> f64 {
    let raw = (span / 5.0).max(f64::MIN_POSITIVE);
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm < 1.5 { 1.0 } else if norm < 3.5 { 2.0 } else if norm < 7.5 { 5.0 } else { 10.0 };
    nice * mag
}
