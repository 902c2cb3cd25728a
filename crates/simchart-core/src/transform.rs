// File: crates/simchart-core/src/transform.rs
// Summary: Model <-> view coordinate transform and anchored line-position enumeration.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::emitter::{Emitter, Subscription};
use crate::error::{ChartError, Result};
use crate::geometry::Point;
use crate::types::{DEFAULT_HEIGHT, DEFAULT_PRECISION, DEFAULT_WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Model x, view left -> right.
    Horizontal,
    /// Model y, view bottom -> top (view y is inverted).
    Vertical,
}

impl Orientation {
    pub const fn opposite(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Numeric range with inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Finite bounds and a non-zero span.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Union two ranges if both are finite.
    pub fn union(a: Self, b: Self) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        Some(Self { min: a.min.min(b.min), max: a.max.max(b.max) })
    }

    pub fn shifted(&self, delta: f64) -> Self {
        Self { min: self.min + delta, max: self.max + delta }
    }
}

/// Upper bound on enumerated lines per call; denser requests are configuration bugs.
const MAX_LINE_COUNT: f64 = 100_000.0;

/// Round `value` to `digits` decimal places.
pub fn snap(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(15) as i32);
    let snapped = (value * factor).round() / factor;
    // Scaling can overflow for huge magnitudes; leave those untouched.
    if snapped.is_finite() { snapped } else { value }
}

/// Enumerate `anchor + n * spacing` for all integers `n` with the value inside
/// `[min, max]`, ascending. Boundary values are included when they land on the
/// edge within `10^-precision`.
///
/// The first value is derived from the remainder of `(min - anchor) / spacing`,
/// snapped to `precision` digits, and every value is computed from its index
/// rather than by accumulation, so lines neither drift nor drop out when `min`
/// itself is the product of repeated floating-point addition.
pub fn line_positions(min: f64, max: f64, spacing: f64, anchor: f64, precision: u32) -> Vec<f64> {
    if !(spacing > 0.0) || !spacing.is_finite() || !min.is_finite() || !max.is_finite() || min > max {
        return Vec::new();
    }
    if (max - min) / spacing > MAX_LINE_COUNT {
        warn!(min, max, spacing, "line spacing too dense for range; no lines produced");
        return Vec::new();
    }
    let tolerance = 10f64.powi(-(precision.min(15) as i32));

    let mut remainder = snap((min - anchor).rem_euclid(spacing), precision);
    if (spacing - remainder).abs() <= tolerance {
        remainder = 0.0;
    }
    let first = if remainder == 0.0 {
        snap(min, precision)
    } else {
        snap(min - remainder + spacing, precision)
    };

    let mut out = Vec::new();
    let mut n = 0u64;
    loop {
        let value = snap(first + n as f64 * spacing, precision);
        if value > max + tolerance {
            break;
        }
        // Spacing below the float resolution at this magnitude repeats values.
        if value >= min - tolerance && out.last() != Some(&value) {
            out.push(value);
        }
        n += 1;
    }
    out
}

/// Immutable mapping between a model-space rectangle and a view-space panel of
/// `view_width x view_height` pixels. Replaced wholesale, never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartTransform {
    view_width: f64,
    view_height: f64,
    x_range: Range,
    y_range: Range,
    precision: u32,
}

impl ChartTransform {
    pub fn new(view_width: f64, view_height: f64, x_range: Range, y_range: Range) -> Result<Self> {
        if !(view_width > 0.0) || !(view_height > 0.0) || !view_width.is_finite() || !view_height.is_finite() {
            return Err(ChartError::InvalidViewSize { width: view_width, height: view_height });
        }
        for (orientation, r) in [(Orientation::Horizontal, x_range), (Orientation::Vertical, y_range)] {
            if !r.is_valid() {
                return Err(ChartError::NonInvertible { orientation, min: r.min, max: r.max });
            }
        }
        Ok(Self { view_width, view_height, x_range, y_range, precision: DEFAULT_PRECISION })
    }

    /// Decimal digits used when snapping enumerated line positions.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn view_width(&self) -> f64 { self.view_width }
    pub fn view_height(&self) -> f64 { self.view_height }
    pub fn x_range(&self) -> Range { self.x_range }
    pub fn y_range(&self) -> Range { self.y_range }
    pub fn precision(&self) -> u32 { self.precision }

    pub fn range(&self, orientation: Orientation) -> Range {
        match orientation {
            Orientation::Horizontal => self.x_range,
            Orientation::Vertical => self.y_range,
        }
    }

    /// Pixel extent of the panel along `orientation`.
    pub fn view_extent(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.view_width,
            Orientation::Vertical => self.view_height,
        }
    }

    pub fn model_to_view(&self, orientation: Orientation, value: f64) -> f64 {
        let r = self.range(orientation);
        let t = (value - r.min) / r.span();
        match orientation {
            Orientation::Horizontal => t * self.view_width,
            Orientation::Vertical => self.view_height - t * self.view_height,
        }
    }

    pub fn view_to_model(&self, orientation: Orientation, view: f64) -> f64 {
        let r = self.range(orientation);
        let t = match orientation {
            Orientation::Horizontal => view / self.view_width,
            Orientation::Vertical => (self.view_height - view) / self.view_height,
        };
        r.min + t * r.span()
    }

    pub fn model_to_view_point(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.model_to_view(Orientation::Horizontal, x),
            self.model_to_view(Orientation::Vertical, y),
        )
    }

    pub fn view_to_model_point(&self, p: Point) -> (f64, f64) {
        (
            self.view_to_model(Orientation::Horizontal, p.x),
            self.view_to_model(Orientation::Vertical, p.y),
        )
    }

    /// Model-space size of a view-space distance (always non-negative).
    pub fn view_to_model_delta(&self, orientation: Orientation, delta: f64) -> f64 {
        (delta / self.view_extent(orientation) * self.range(orientation).span()).abs()
    }

    /// Pixel size of a model-space distance (always non-negative).
    pub fn model_to_view_delta(&self, orientation: Orientation, delta: f64) -> f64 {
        (delta / self.range(orientation).span() * self.view_extent(orientation)).abs()
    }

    /// Model values `anchor + n * spacing` whose projection falls inside
    /// `[0, view_extent]` along `orientation`, ascending in model space.
    pub fn compute_line_positions(&self, orientation: Orientation, spacing: f64, anchor: f64) -> Vec<f64> {
        let r = self.range(orientation);
        line_positions(r.min, r.max, spacing, anchor, self.precision)
    }

    fn with_ranges(&self, x_range: Range, y_range: Range) -> Result<Self> {
        Ok(Self::new(self.view_width, self.view_height, x_range, y_range)?.with_precision(self.precision))
    }
}

impl Default for ChartTransform {
    fn default() -> Self {
        Self {
            view_width: DEFAULT_WIDTH,
            view_height: DEFAULT_HEIGHT,
            x_range: Range::new(0.0, 1.0),
            y_range: Range::new(0.0, 1.0),
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Observable holder of the active transform. Every setter swaps in a new
/// `Rc<ChartTransform>` and emits exactly one notification, however many axes changed.
#[derive(Debug)]
pub struct TransformProperty {
    current: Rc<ChartTransform>,
    changed: Emitter<Rc<ChartTransform>>,
}

impl TransformProperty {
    pub fn new(transform: ChartTransform) -> Self {
        Self { current: Rc::new(transform), changed: Emitter::new() }
    }

    pub fn get(&self) -> Rc<ChartTransform> {
        Rc::clone(&self.current)
    }

    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&Rc<ChartTransform>) + 'static) -> Subscription {
        self.changed.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }

    pub fn set(&mut self, transform: ChartTransform) {
        if *self.current == transform {
            return;
        }
        debug!(
            x_min = transform.x_range.min,
            x_max = transform.x_range.max,
            y_min = transform.y_range.min,
            y_max = transform.y_range.max,
            "transform replaced"
        );
        self.current = Rc::new(transform);
        self.changed.emit(&self.current);
    }

    pub fn set_ranges(&mut self, x_range: Range, y_range: Range) -> Result<()> {
        let next = self.current.with_ranges(x_range, y_range)?;
        self.set(next);
        Ok(())
    }

    pub fn set_x_range(&mut self, x_range: Range) -> Result<()> {
        self.set_ranges(x_range, self.current.y_range)
    }

    pub fn set_y_range(&mut self, y_range: Range) -> Result<()> {
        self.set_ranges(self.current.x_range, y_range)
    }

    pub fn set_view_size(&mut self, width: f64, height: f64) -> Result<()> {
        let next = ChartTransform::new(width, height, self.current.x_range, self.current.y_range)?
            .with_precision(self.current.precision);
        self.set(next);
        Ok(())
    }
}
