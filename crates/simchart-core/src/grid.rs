// File: crates/simchart-core/src/grid.rs
// Summary: Grid line layout: major/minor line sets enumerated from spacing and anchor.

use crate::geometry::Point;
use crate::scene::Scene;
use crate::spacing::{AxisSpacing, LineSpacing};
use crate::transform::{ChartTransform, Orientation};
use crate::types::{Color, Stroke};

/// Whether `value` sits on a line of `spacing` anchored at `anchor`.
pub(crate) fn on_spacing(value: f64, spacing: f64, anchor: f64) -> bool {
    let n = (value - anchor) / spacing;
    (n - n.round()).abs() < 1e-6
}

/// Model positions of the major and minor lines for one axis. Minor positions
/// that coincide with a major line are dropped.
pub fn major_minor_positions(
    transform: &ChartTransform,
    orientation: Orientation,
    spacing: &LineSpacing,
    anchor: f64,
) -> (Vec<f64>, Vec<f64>) {
    let major = spacing
        .major()
        .map(|s| transform.compute_line_positions(orientation, s, anchor))
        .unwrap_or_default();
    let minor = spacing
        .minor()
        .map(|s| {
            let mut v = transform.compute_line_positions(orientation, s, anchor);
            if let Some(m) = spacing.major() {
                v.retain(|&value| !on_spacing(value, m, anchor));
            }
            v
        })
        .unwrap_or_default();
    (major, minor)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridStyle {
    /// Default: gray, 1px.
    pub major: Stroke,
    /// Default: light gray, 1px.
    pub minor: Stroke,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self { major: Stroke::new(Color::GRAY, 1.0), minor: Stroke::new(Color::LIGHT_GRAY, 1.0) }
    }
}

/// One grid line: `value` is the model position along `orientation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    pub orientation: Orientation,
    pub value: f64,
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridLineSet {
    pub major: Vec<GridLine>,
    pub minor: Vec<GridLine>,
}

impl GridLineSet {
    pub fn len(&self) -> usize {
        self.major.len() + self.minor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self, orientation: Orientation, major: bool) -> Vec<f64> {
        let lines = if major { &self.major } else { &self.minor };
        lines.iter().filter(|l| l.orientation == orientation).map(|l| l.value).collect()
    }
}

/// Full-panel grid decorator. Positions along `Horizontal` produce vertical lines.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLines {
    pub spacing: AxisSpacing,
    /// Model-space origin the lines align to, per axis. Default: (0, 0).
    pub anchor: (f64, f64),
    pub style: GridStyle,
}

impl GridLines {
    pub fn new(spacing: AxisSpacing) -> Self {
        Self { spacing, anchor: (0.0, 0.0), style: GridStyle::default() }
    }

    pub fn with_anchor(mut self, x: f64, y: f64) -> Self {
        self.anchor = (x, y);
        self
    }

    pub fn with_style(mut self, style: GridStyle) -> Self {
        self.style = style;
        self
    }

    fn anchor_for(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.anchor.0,
            Orientation::Vertical => self.anchor.1,
        }
    }

    /// Recompute every line for `transform`. Pure: repeated calls with the same
    /// inputs yield identical sets.
    pub fn layout(&self, transform: &ChartTransform) -> GridLineSet {
        let mut set = GridLineSet::default();
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let Some(spacing) = self.spacing.get(orientation) else { continue };
            let (major, minor) = major_minor_positions(transform, orientation, &spacing, self.anchor_for(orientation));
            set.major.extend(major.into_iter().map(|v| grid_line(transform, orientation, v)));
            set.minor.extend(minor.into_iter().map(|v| grid_line(transform, orientation, v)));
        }
        set
    }

    pub fn draw(&self, transform: &ChartTransform, scene: &mut Scene) {
        let set = self.layout(transform);
        // Minor first so majors paint over them.
        for l in &set.minor {
            scene.line(l.from, l.to, self.style.minor);
        }
        for l in &set.major {
            scene.line(l.from, l.to, self.style.major);
        }
    }
}

fn grid_line(transform: &ChartTransform, orientation: Orientation, value: f64) -> GridLine {
    let v = transform.model_to_view(orientation, value);
    let (from, to) = match orientation {
        Orientation::Horizontal => (Point::new(v, 0.0), Point::new(v, transform.view_height())),
        Orientation::Vertical => (Point::new(0.0, v), Point::new(transform.view_width(), v)),
    };
    GridLine { orientation, value, from, to }
}
