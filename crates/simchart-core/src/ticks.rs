// File: crates/simchart-core/src/ticks.rs
// Summary: Tick marks, cached tick labels and axis lines placed from the active transform.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{ChartError, Result};
use crate::geometry::Point;
use crate::grid::on_spacing;
use crate::scene::{Scene, TextAlign, TextBaseline, TextNode};
use crate::spacing::LineSpacing;
use crate::transform::{snap, ChartTransform, Orientation};
use crate::types::{Color, Stroke};

/// Where ticks/labels sit across the axis they annotate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickEdge {
    /// Bottom edge for x ticks, left edge for y ticks.
    Min,
    /// Top edge for x ticks, right edge for y ticks.
    Max,
    /// Along the model value of the other axis (e.g. y = 0), clamped to the panel.
    Value(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickSide {
    /// Extends away from the panel.
    Outside,
    /// Extends into the panel.
    Inside,
    Centered,
}

fn validate_spacing(spacing: f64) -> Result<f64> {
    if spacing > 0.0 && spacing.is_finite() { Ok(spacing) } else { Err(ChartError::InvalidSpacing(spacing)) }
}

/// View coordinate, across the annotated axis, of the edge ticks attach to, plus
/// the direction that points out of the panel there.
fn edge_position(transform: &ChartTransform, orientation: Orientation, edge: TickEdge) -> (f64, f64) {
    let across = orientation.opposite();
    let extent = transform.view_extent(across);
    match (orientation, edge) {
        (Orientation::Horizontal, TickEdge::Min) => (extent, 1.0),
        (Orientation::Horizontal, TickEdge::Max) => (0.0, -1.0),
        (Orientation::Vertical, TickEdge::Min) => (0.0, -1.0),
        (Orientation::Vertical, TickEdge::Max) => (extent, 1.0),
        (_, TickEdge::Value(v)) => {
            let p = transform.model_to_view(across, v).clamp(0.0, extent);
            let outward = match orientation {
                Orientation::Horizontal => 1.0,
                Orientation::Vertical => -1.0,
            };
            (p, outward)
        }
    }
}

fn point_on_axis(orientation: Orientation, along: f64, across: f64) -> Point {
    match orientation {
        Orientation::Horizontal => Point::new(along, across),
        Orientation::Vertical => Point::new(across, along),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickMark {
    pub value: f64,
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickMarkConfig {
    /// Default: `TickEdge::Min`.
    pub edge: TickEdge,
    /// Default: `TickSide::Outside`.
    pub side: TickSide,
    /// Tick length in pixels. Default: 10.
    pub length: f64,
    /// Default: black, 1px.
    pub stroke: Stroke,
    /// Skip ticks that fall on this spacing (e.g. the major ticks of a paired set). Default: none.
    pub skip_multiples_of: Option<f64>,
}

impl Default for TickMarkConfig {
    fn default() -> Self {
        Self { edge: TickEdge::Min, side: TickSide::Outside, length: 10.0, stroke: Stroke::default(), skip_multiples_of: None }
    }
}

/// Tick marks along one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct TickMarks {
    orientation: Orientation,
    spacing: f64,
    anchor: f64,
    pub config: TickMarkConfig,
}

impl TickMarks {
    /// `skip_multiples_of`, when set, must pair with `spacing` the way a major
    /// spacing pairs with its minor one.
    pub fn new(orientation: Orientation, spacing: f64, config: TickMarkConfig) -> Result<Self> {
        let spacing = validate_spacing(spacing)?;
        if let Some(skip) = config.skip_multiples_of {
            LineSpacing::new(Some(skip), Some(spacing))?;
        }
        Ok(Self { orientation, spacing, anchor: 0.0, config })
    }

    pub fn with_anchor(mut self, anchor: f64) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn orientation(&self) -> Orientation { self.orientation }
    pub fn spacing(&self) -> f64 { self.spacing }

    pub fn layout(&self, transform: &ChartTransform) -> Vec<TickMark> {
        let (edge, outward) = edge_position(transform, self.orientation, self.config.edge);
        let len = self.config.length;
        let (a, b) = match self.config.side {
            TickSide::Outside => (edge, edge + outward * len),
            TickSide::Inside => (edge, edge - outward * len),
            TickSide::Centered => (edge - outward * len / 2.0, edge + outward * len / 2.0),
        };
        transform
            .compute_line_positions(self.orientation, self.spacing, self.anchor)
            .into_iter()
            .filter(|&v| match self.config.skip_multiples_of {
                Some(s) => !on_spacing(v, s, self.anchor),
                None => true,
            })
            .map(|value| {
                let along = transform.model_to_view(self.orientation, value);
                TickMark {
                    value,
                    from: point_on_axis(self.orientation, along, a),
                    to: point_on_axis(self.orientation, along, b),
                }
            })
            .collect()
    }

    pub fn draw(&self, transform: &ChartTransform, scene: &mut Scene) {
        for t in self.layout(transform) {
            scene.line(t.from, t.to, self.config.stroke);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickLabelConfig {
    /// Default: `TickEdge::Min`.
    pub edge: TickEdge,
    /// Gap between the edge and the label anchor, in pixels. Default: 12.
    pub offset: f64,
    /// Digits after the decimal point. Default: 0.
    pub decimal_places: usize,
    /// Appended to every label, e.g. a unit. Default: empty.
    pub suffix: String,
    /// Font size in pixels. Default: 12.
    pub font_size: f64,
    /// Default: black.
    pub color: Color,
}

impl Default for TickLabelConfig {
    fn default() -> Self {
        Self {
            edge: TickEdge::Min,
            offset: 12.0,
            decimal_places: 0,
            suffix: String::new(),
            font_size: 12.0,
            color: Color::BLACK,
        }
    }
}

impl TickLabelConfig {
    pub fn format(&self, value: f64) -> String {
        let mut s = format!("{:.*}", self.decimal_places, value);
        // "-0", "-0.0" read badly next to a zero grid line.
        if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
            s.remove(0);
        }
        s.push_str(&self.suffix);
        s
    }
}

/// A label positioned for the current transform.
#[derive(Clone, Debug, PartialEq)]
pub struct TickLabel {
    pub value: f64,
    pub text: String,
    pub at: Point,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

/// Counters exposed for observing cache reuse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LabelCacheStats {
    pub created: usize,
    pub reused: usize,
    pub evicted: usize,
}

/// Numeric labels along one axis. Label text is cached by model position, so a
/// scrolling axis only formats labels for positions that newly appear and drops
/// labels whose positions left the visible range.
#[derive(Clone, Debug)]
pub struct TickLabels {
    orientation: Orientation,
    spacing: f64,
    anchor: f64,
    pub config: TickLabelConfig,
    cache: HashMap<u64, String>,
    stats: LabelCacheStats,
}

impl TickLabels {
    pub fn new(orientation: Orientation, spacing: f64, config: TickLabelConfig) -> Result<Self> {
        Ok(Self {
            orientation,
            spacing: validate_spacing(spacing)?,
            anchor: 0.0,
            config,
            cache: HashMap::new(),
            stats: LabelCacheStats::default(),
        })
    }

    pub fn with_anchor(mut self, anchor: f64) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn orientation(&self) -> Orientation { self.orientation }
    pub fn stats(&self) -> LabelCacheStats { self.stats }
    pub fn cached_len(&self) -> usize { self.cache.len() }

    /// Cache key: bits of the snapped position, with -0.0 folded into 0.0.
    fn key(value: f64, precision: u32) -> u64 {
        let v = snap(value, precision);
        if v == 0.0 { 0u64 } else { v.to_bits() }
    }

    /// Recompute label positions for `transform`, reusing cached text.
    pub fn layout(&mut self, transform: &ChartTransform) -> Vec<TickLabel> {
        let values = transform.compute_line_positions(self.orientation, self.spacing, self.anchor);
        let precision = transform.precision();
        let (edge, outward) = edge_position(transform, self.orientation, self.config.edge);
        let across = edge + outward * self.config.offset;
        let (align, baseline) = match (self.orientation, outward > 0.0) {
            (Orientation::Horizontal, true) => (TextAlign::Center, TextBaseline::Top),
            (Orientation::Horizontal, false) => (TextAlign::Center, TextBaseline::Bottom),
            (Orientation::Vertical, true) => (TextAlign::Left, TextBaseline::Middle),
            (Orientation::Vertical, false) => (TextAlign::Right, TextBaseline::Middle),
        };

        let mut live = HashMap::with_capacity(values.len());
        let mut labels = Vec::with_capacity(values.len());
        for value in values {
            let key = Self::key(value, precision);
            let text = match self.cache.remove(&key) {
                Some(text) => {
                    self.stats.reused += 1;
                    text
                }
                None => {
                    self.stats.created += 1;
                    self.config.format(value)
                }
            };
            let along = transform.model_to_view(self.orientation, value);
            labels.push(TickLabel {
                value,
                text: text.clone(),
                at: point_on_axis(self.orientation, along, across),
                align,
                baseline,
            });
            live.insert(key, text);
        }
        let evicted = self.cache.len();
        if evicted > 0 {
            trace!(evicted, "tick labels dropped");
        }
        self.stats.evicted += evicted;
        self.cache = live;
        labels
    }

    pub fn draw(&mut self, transform: &ChartTransform, scene: &mut Scene) {
        for l in self.layout(transform) {
            scene.text(TextNode {
                text: l.text,
                at: l.at,
                size: self.config.font_size,
                color: self.config.color,
                align: l.align,
                baseline: l.baseline,
            });
        }
    }
}

/// A single full-length line at a model value, e.g. the y = 0 axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisLine {
    /// Direction of the drawn line: `Horizontal` draws at model y = `value`.
    pub orientation: Orientation,
    /// Default: 0.
    pub value: f64,
    /// Default: black, 2px.
    pub stroke: Stroke,
}

impl AxisLine {
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation, value: 0.0, stroke: Stroke::new(Color::BLACK, 2.0) }
    }

    pub fn at(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// End points, or `None` when the value is outside the visible range.
    pub fn segment(&self, transform: &ChartTransform) -> Option<(Point, Point)> {
        let across = self.orientation.opposite();
        if !transform.range(across).contains(self.value) {
            return None;
        }
        let p = transform.model_to_view(across, self.value);
        Some(match self.orientation {
            Orientation::Horizontal => (Point::new(0.0, p), Point::new(transform.view_width(), p)),
            Orientation::Vertical => (Point::new(p, 0.0), Point::new(p, transform.view_height())),
        })
    }

    pub fn draw(&self, transform: &ChartTransform, scene: &mut Scene) {
        if let Some((a, b)) = self.segment(transform) {
            scene.line(a, b, self.stroke);
        }
    }
}
