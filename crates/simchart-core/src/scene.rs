// File: crates/simchart-core/src/scene.rs
// Summary: Renderer-agnostic node list produced by charts (view-space geometry).

use crate::geometry::{Point, Rect};
use crate::types::{Color, Stroke};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Vertical placement of text relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub text: String,
    pub at: Point,
    pub size: f64,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect { rect: Rect, fill: Option<Color>, stroke: Option<Stroke> },
    Line { from: Point, to: Point, stroke: Stroke },
    /// Open polyline; each inner vec is one connected run (runs break on gaps).
    Polyline { runs: Vec<Vec<Point>>, stroke: Stroke },
    Circle { center: Point, radius: f64, fill: Color },
    Text(TextNode),
    /// Children painted in order, optionally clipped to `clip`.
    Group { clip: Option<Rect>, children: Vec<Primitive> },
}

impl Primitive {
    pub fn translated(&self, dx: f64, dy: f64) -> Primitive {
        match self {
            Primitive::Rect { rect, fill, stroke } => {
                Primitive::Rect { rect: rect.translated(dx, dy), fill: *fill, stroke: *stroke }
            }
            Primitive::Line { from, to, stroke } => Primitive::Line {
                from: from.translated(dx, dy),
                to: to.translated(dx, dy),
                stroke: *stroke,
            },
            Primitive::Polyline { runs, stroke } => Primitive::Polyline {
                runs: runs
                    .iter()
                    .map(|run| run.iter().map(|p| p.translated(dx, dy)).collect())
                    .collect(),
                stroke: *stroke,
            },
            Primitive::Circle { center, radius, fill } => {
                Primitive::Circle { center: center.translated(dx, dy), radius: *radius, fill: *fill }
            }
            Primitive::Text(t) => Primitive::Text(TextNode { at: t.at.translated(dx, dy), ..t.clone() }),
            Primitive::Group { clip, children } => Primitive::Group {
                clip: clip.map(|r| r.translated(dx, dy)),
                children: children.iter().map(|c| c.translated(dx, dy)).collect(),
            },
        }
    }
}

/// Ordered list of primitives; later entries paint over earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Option<Color>,
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, background: None, primitives: Vec::new() }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.push(Primitive::Line { from, to, stroke });
    }

    pub fn text(&mut self, node: TextNode) {
        self.push(Primitive::Text(node));
    }

    /// Append every primitive of `other`, offset by `(dx, dy)`.
    pub fn append_translated(&mut self, other: &Scene, dx: f64, dy: f64) {
        self.primitives.extend(other.primitives.iter().map(|p| p.translated(dx, dy)));
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Move every primitive into a single group clipped to `clip`.
    pub fn into_clipped_group(self, clip: Rect) -> Primitive {
        Primitive::Group { clip: Some(clip), children: self.primitives }
    }

    /// Depth-first iteration over primitives, descending into groups.
    pub fn flatten(&self) -> Vec<&Primitive> {
        fn walk<'a>(items: &'a [Primitive], out: &mut Vec<&'a Primitive>) {
            for p in items {
                match p {
                    Primitive::Group { children, .. } => walk(children, out),
                    other => out.push(other),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.primitives, &mut out);
        out
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn texts(&self) -> Vec<&TextNode> {
        self.flatten()
            .into_iter()
            .filter_map(|p| match p {
                Primitive::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(Rect, Option<Color>)> {
        self.flatten()
            .into_iter()
            .filter_map(|p| match p {
                Primitive::Rect { rect, fill, .. } => Some((*rect, *fill)),
                _ => None,
            })
            .collect()
    }
}
