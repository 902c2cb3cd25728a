// File: crates/simchart-core/src/plot.rs
// Summary: Series renderer strategies (line, scatter, bar) used by chart panels.

use crate::geometry::{Point, Rect};
use crate::scene::{Primitive, Scene};
use crate::series::{ChangeKind, DataPoint, DataSeries, SeriesChange};
use crate::transform::{ChartTransform, Orientation};
use crate::types::Stroke;

/// Draws one series into a scene. Renderers may cache view-space geometry; the
/// owning panel calls `invalidate` when the transform changes and forwards
/// every data change through `series_changed`.
pub trait SeriesRenderer {
    fn name(&self) -> &'static str;

    fn draw(&mut self, series: &DataSeries, transform: &ChartTransform, scene: &mut Scene);

    fn invalidate(&mut self) {}

    fn series_changed(&mut self, change: &SeriesChange) {
        let _ = change;
        self.invalidate();
    }
}

/// Split samples into connected runs of view points, breaking on gaps and
/// non-finite samples.
pub fn polyline_runs(points: &[DataPoint], transform: &ChartTransform) -> Vec<Vec<Point>> {
    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for p in points {
        if !p.is_drawable() {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(transform.model_to_view_point(p.x, p.y));
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Connected line through the samples. Appends are patched into the cached
/// geometry instead of re-projecting the whole series.
#[derive(Debug, Default)]
pub struct LinePlot {
    cache: Option<LineCache>,
    pending: Vec<PendingAppend>,
}

#[derive(Debug)]
struct LineCache {
    runs: Vec<Vec<Point>>,
    len: usize,
    /// Whether the last cached sample was a gap (next point starts a new run).
    ends_in_gap: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingAppend {
    point: DataPoint,
}

impl LinePlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples currently projected into the cache.
    pub fn cached_len(&self) -> Option<usize> {
        self.cache.as_ref().map(|c| c.len)
    }

    fn rebuild(series: &DataSeries, transform: &ChartTransform) -> LineCache {
        LineCache {
            runs: polyline_runs(series.points(), transform),
            len: series.len(),
            ends_in_gap: series.last().map(|p| !p.is_drawable()).unwrap_or(true),
        }
    }
}

impl SeriesRenderer for LinePlot {
    fn name(&self) -> &'static str { "line" }

    fn draw(&mut self, series: &DataSeries, transform: &ChartTransform, scene: &mut Scene) {
        let pending = std::mem::take(&mut self.pending);
        let patched = match self.cache.take() {
            Some(mut cache) if cache.len + pending.len() == series.len() => {
                for PendingAppend { point } in pending {
                    if !point.is_drawable() {
                        cache.ends_in_gap = true;
                    } else {
                        let v = transform.model_to_view_point(point.x, point.y);
                        match cache.runs.last_mut() {
                            Some(run) if !cache.ends_in_gap => run.push(v),
                            _ => cache.runs.push(vec![v]),
                        }
                        cache.ends_in_gap = false;
                    }
                    cache.len += 1;
                }
                cache
            }
            _ => Self::rebuild(series, transform),
        };
        if series.style.visible && !patched.runs.is_empty() {
            scene.push(Primitive::Polyline {
                runs: patched.runs.clone(),
                stroke: Stroke::new(series.style.color, series.style.line_width),
            });
        }
        self.cache = Some(patched);
    }

    fn invalidate(&mut self) {
        self.cache = None;
        self.pending.clear();
    }

    fn series_changed(&mut self, change: &SeriesChange) {
        match change.kind {
            ChangeKind::Added { point, .. } if self.cache.is_some() => {
                self.pending.push(PendingAppend { point });
            }
            _ => self.invalidate(),
        }
    }
}

/// One dot per sample, radius from the series style.
#[derive(Debug, Default)]
pub struct ScatterPlot;

impl SeriesRenderer for ScatterPlot {
    fn name(&self) -> &'static str { "scatter" }

    fn draw(&mut self, series: &DataSeries, transform: &ChartTransform, scene: &mut Scene) {
        if !series.style.visible {
            return;
        }
        let r = series.style.point_radius;
        let bounds = Rect::from_ltwh(-r, -r, transform.view_width() + 2.0 * r, transform.view_height() + 2.0 * r);
        for p in series.points().iter().filter(|p| p.is_drawable()) {
            let center = transform.model_to_view_point(p.x, p.y);
            if bounds.contains(center) {
                scene.push(Primitive::Circle { center, radius: r, fill: series.style.color });
            }
        }
    }
}

/// Vertical bars from `baseline` to each sample's y.
#[derive(Debug)]
pub struct BarPlot {
    /// Bar width in pixels. Default: 10.
    pub bar_width: f64,
    /// Model y the bars grow from. Default: 0.
    pub baseline: f64,
}

impl Default for BarPlot {
    fn default() -> Self {
        Self { bar_width: 10.0, baseline: 0.0 }
    }
}

impl SeriesRenderer for BarPlot {
    fn name(&self) -> &'static str { "bar" }

    fn draw(&mut self, series: &DataSeries, transform: &ChartTransform, scene: &mut Scene) {
        if !series.style.visible {
            return;
        }
        let base = transform.model_to_view(Orientation::Vertical, self.baseline);
        for p in series.points().iter().filter(|p| p.is_drawable()) {
            let x = transform.model_to_view(Orientation::Horizontal, p.x);
            let y = transform.model_to_view(Orientation::Vertical, p.y);
            let rect = Rect::from_points(
                Point::new(x - self.bar_width / 2.0, base),
                Point::new(x + self.bar_width / 2.0, y),
            );
            scene.push(Primitive::Rect { rect, fill: Some(series.style.color), stroke: None });
        }
    }
}
