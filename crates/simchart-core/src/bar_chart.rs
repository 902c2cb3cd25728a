// File: crates/simchart-core/src/bar_chart.rs
// Summary: Bar chart of single or stacked (composite) bars with range clamping and labels.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::emitter::Subscription;
use crate::error::{ChartError, Result};
use crate::geometry::{Point, Rect};
use crate::scene::{Primitive, Scene, TextAlign, TextBaseline, TextNode};
use crate::transform::{ChartTransform, Orientation, Range, TransformProperty};
use crate::types::{Color, Stroke};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarEntry {
    pub value: f64,
    pub color: Color,
}

/// One bar: a single entry, or a composite stacked from several entries.
#[derive(Clone, Debug, PartialEq)]
pub struct BarStack {
    entries: Vec<BarEntry>,
    pub label: Option<String>,
}

impl BarStack {
    pub fn single(value: f64, color: Color) -> Self {
        Self { entries: vec![BarEntry { value, color }], label: None }
    }

    /// Composite bar from parallel value and color lists.
    pub fn new(values: Vec<f64>, colors: Vec<Color>) -> Result<Self> {
        if values.len() != colors.len() {
            return Err(ChartError::CountMismatch { left: values.len(), right: colors.len() });
        }
        let entries = values.into_iter().zip(colors).map(|(value, color)| BarEntry { value, color }).collect();
        Ok(Self { entries, label: None })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn entries(&self) -> &[BarEntry] { &self.entries }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    pub fn is_composite(&self) -> bool {
        self.entries.len() > 1
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarChartConfig {
    /// Plot height in pixels. Default: 200.
    pub height: f64,
    /// Model value range shown vertically. Default: [0, 100].
    pub range: Range,
    /// Bar width in pixels. Default: 18.
    pub bar_width: f64,
    /// Gap between bars and at both ends, in pixels. Default: 12.
    pub bar_spacing: f64,
    /// Fill for composite bars containing a negative entry. Default: gray.
    pub invalid_color: Color,
    /// Line at value 0. Default: black, 1px.
    pub baseline: Stroke,
    /// Label font size in pixels. Default: 12.
    pub label_size: f64,
    /// Default: black.
    pub label_color: Color,
    /// Gap between the plot bottom and labels, in pixels. Default: 4.
    pub label_offset: f64,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            height: 200.0,
            range: Range::new(0.0, 100.0),
            bar_width: 18.0,
            bar_spacing: 12.0,
            invalid_color: Color::GRAY,
            baseline: Stroke::default(),
            label_size: 12.0,
            label_color: Color::BLACK,
            label_offset: 4.0,
        }
    }
}

/// A rendered rectangle of a bar, in view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarSegment {
    pub bar: usize,
    pub rect: Rect,
    pub color: Color,
    /// The unclamped value exceeded the visible range.
    pub clipped: bool,
}

/// Bars laid out left to right. Value and range updates mark the chart for
/// redraw; range changes also reach `transform_property` listeners.
#[derive(Debug)]
pub struct BarChart {
    config: BarChartConfig,
    bars: Vec<BarStack>,
    transform: TransformProperty,
    dirty: Rc<Cell<bool>>,
    _transform_subscription: Subscription,
}

impl BarChart {
    pub fn new(config: BarChartConfig, bars: Vec<BarStack>) -> Result<Self> {
        for s in [config.bar_width, config.bar_spacing] {
            if !(s >= 0.0) || !s.is_finite() {
                return Err(ChartError::InvalidSpacing(s));
            }
        }
        let width = Self::width_for(&config, bars.len());
        let transform =
            TransformProperty::new(ChartTransform::new(width, config.height, Range::new(0.0, width), config.range)?);
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        let sub = transform.subscribe(move |_| flag.set(true));
        Ok(Self { config, bars, transform, dirty, _transform_subscription: sub })
    }

    fn width_for(config: &BarChartConfig, n: usize) -> f64 {
        (n as f64 * (config.bar_width + config.bar_spacing) + config.bar_spacing).max(1.0)
    }

    pub fn config(&self) -> &BarChartConfig { &self.config }
    pub fn bars(&self) -> &[BarStack] { &self.bars }
    pub fn width(&self) -> f64 { self.transform.get().view_width() }
    pub fn height(&self) -> f64 { self.config.height }
    pub fn transform(&self) -> Rc<ChartTransform> { self.transform.get() }
    pub fn transform_property(&self) -> &TransformProperty { &self.transform }

    /// Whether anything changed since the last `render`.
    pub fn needs_redraw(&self) -> bool {
        self.dirty.get()
    }

    pub fn bar(&self, index: usize) -> Result<&BarStack> {
        self.bars.get(index).ok_or(ChartError::IndexOutOfRange { index, len: self.bars.len() })
    }

    /// Update one entry of one bar.
    pub fn set_value(&mut self, bar: usize, entry: usize, value: f64) -> Result<()> {
        let len = self.bars.len();
        let stack = self.bars.get_mut(bar).ok_or(ChartError::IndexOutOfRange { index: bar, len })?;
        let n = stack.entries.len();
        let e = stack.entries.get_mut(entry).ok_or(ChartError::IndexOutOfRange { index: entry, len: n })?;
        if e.value != value {
            e.value = value;
            self.dirty.set(true);
        }
        Ok(())
    }

    pub fn set_range(&mut self, range: Range) -> Result<()> {
        self.transform.set_y_range(range)?;
        self.config.range = range;
        Ok(())
    }

    /// Horizontal center of bar `index` in view space.
    pub fn bar_center(&self, index: usize) -> f64 {
        let c = &self.config;
        c.bar_spacing + index as f64 * (c.bar_width + c.bar_spacing) + c.bar_width / 2.0
    }

    fn segment(&self, bar: usize, from: f64, to: f64, color: Color) -> BarSegment {
        let range = self.config.range;
        let clipped = !range.contains(to);
        let transform = self.transform.get();
        let y0 = transform.model_to_view(Orientation::Vertical, range.clamp(from));
        let y1 = transform.model_to_view(Orientation::Vertical, range.clamp(to));
        let cx = self.bar_center(bar);
        let half = self.config.bar_width / 2.0;
        BarSegment {
            bar,
            rect: Rect::from_points(Point::new(cx - half, y0), Point::new(cx + half, y1)),
            color,
            clipped,
        }
    }

    /// Rectangles for every bar. A composite bar containing a negative entry
    /// collapses into a single segment of the summed value in the invalid color.
    pub fn segments(&self) -> Vec<BarSegment> {
        let mut out = Vec::new();
        for (i, stack) in self.bars.iter().enumerate() {
            if stack.is_composite() && stack.entries.iter().any(|e| e.value < 0.0) {
                debug!(bar = i, total = stack.total(), "composite bar has a negative entry; drawing merged");
                out.push(self.segment(i, 0.0, stack.total(), self.config.invalid_color));
                continue;
            }
            let mut running = 0.0;
            for entry in &stack.entries {
                let next = running + entry.value;
                let seg = self.segment(i, running, next, entry.color);
                if seg.rect.height() > 0.0 || !stack.is_composite() {
                    out.push(seg);
                }
                running = next;
            }
        }
        out
    }

    pub fn render(&self) -> Scene {
        let width = self.width();
        let mut scene = Scene::new(width, self.config.height);
        for seg in self.segments() {
            scene.push(Primitive::Rect { rect: seg.rect, fill: Some(seg.color), stroke: None });
            if seg.clipped {
                // Chevron at the clipped end signals the value continues off-chart.
                let r = seg.rect;
                let up = r.top <= 0.0;
                let tip_y = if up { r.top } else { r.bottom };
                let dy = if up { 6.0 } else { -6.0 };
                let cx = (r.left + r.right) / 2.0;
                scene.push(Primitive::Polyline {
                    runs: vec![vec![
                        Point::new(r.left, tip_y + dy),
                        Point::new(cx, tip_y),
                        Point::new(r.right, tip_y + dy),
                    ]],
                    stroke: Stroke::new(Color::BLACK, 1.5),
                });
            }
        }
        if self.config.range.contains(0.0) {
            let y = self.transform.get().model_to_view(Orientation::Vertical, 0.0);
            scene.line(Point::new(0.0, y), Point::new(width, y), self.config.baseline);
        }
        for (i, stack) in self.bars.iter().enumerate() {
            if let Some(label) = &stack.label {
                scene.text(TextNode {
                    text: label.clone(),
                    at: Point::new(self.bar_center(i), self.config.height + self.config.label_offset),
                    size: self.config.label_size,
                    color: self.config.label_color,
                    align: TextAlign::Center,
                    baseline: TextBaseline::Top,
                });
            }
        }
        self.dirty.set(false);
        scene
    }
}
