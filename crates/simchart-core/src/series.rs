// File: crates/simchart-core/src/series.rs
// Summary: Observable data series of (x, y) samples with NaN gaps and display style.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::emitter::{Emitter, Subscription};
use crate::error::{ChartError, Result};
use crate::transform::Range;
use crate::types::Color;

/// A model-space sample. `y` may be NaN to mark a gap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn gap(x: f64) -> Self {
        Self { x, y: f64::NAN }
    }

    pub fn is_gap(&self) -> bool {
        self.y.is_nan()
    }

    /// Both coordinates finite. Anything else breaks a line run.
    pub fn is_drawable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(u64);

impl SeriesId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesStyle {
    /// Stroke/fill color. Default: black.
    pub color: Color,
    /// Line width in pixels. Default: 1.
    pub line_width: f64,
    /// Point radius in pixels for scatter rendering. Default: 2.
    pub point_radius: f64,
    /// Hidden series are skipped by renderers but still count for cursor extents. Default: true.
    pub visible: bool,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self { color: Color::BLACK, line_width: 1.0, point_radius: 2.0, visible: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChangeKind {
    /// One sample appended; `previous` is the sample before it, if any.
    Added { point: DataPoint, previous: Option<DataPoint> },
    /// `count` samples removed in one operation.
    Removed { count: usize },
    Cleared,
}

/// Payload delivered after every mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesChange {
    pub series: SeriesId,
    pub kind: ChangeKind,
    /// `[first.x, last.x]` after the change, `None` when empty.
    pub x_extent: Option<Range>,
    pub len: usize,
}

pub type SharedSeries = Rc<RefCell<DataSeries>>;

/// Ordered samples, expected (not enforced) to be non-decreasing in x for time charts.
#[derive(Debug)]
pub struct DataSeries {
    id: SeriesId,
    points: Vec<DataPoint>,
    pub style: SeriesStyle,
    changed: Emitter<SeriesChange>,
}

impl DataSeries {
    pub fn new() -> Self {
        Self::with_style(SeriesStyle::default())
    }

    pub fn with_style(style: SeriesStyle) -> Self {
        Self { id: SeriesId::next(), points: Vec::new(), style, changed: Emitter::new() }
    }

    /// Build a series with an initial sample set (no notification).
    pub fn with_points(points: impl IntoIterator<Item = DataPoint>, style: SeriesStyle) -> Self {
        let mut s = Self::with_style(style);
        s.points.extend(points);
        s
    }

    pub fn with_capacity(capacity: usize, style: SeriesStyle) -> Self {
        let mut s = Self::with_style(style);
        s.points.reserve(capacity);
        s
    }

    pub fn shared(self) -> SharedSeries {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> SeriesId { self.id }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn points(&self) -> &[DataPoint] { &self.points }
    pub fn first(&self) -> Option<DataPoint> { self.points.first().copied() }
    pub fn last(&self) -> Option<DataPoint> { self.points.last().copied() }

    pub fn get(&self, index: usize) -> Result<DataPoint> {
        self.points
            .get(index)
            .copied()
            .ok_or(ChartError::IndexOutOfRange { index, len: self.points.len() })
    }

    /// `[first.x, last.x]`; relies on x being sorted.
    pub fn x_extent(&self) -> Option<Range> {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => Some(Range::new(a.x, b.x)),
            _ => None,
        }
    }

    /// Min/max over finite y values, skipping gaps.
    pub fn y_extent(&self) -> Option<Range> {
        let mut it = self.points.iter().filter(|p| p.y.is_finite()).map(|p| p.y);
        let first = it.next()?;
        let (lo, hi) = it.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some(Range::new(lo, hi))
    }

    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&SeriesChange) + 'static) -> Subscription {
        self.changed.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }

    pub fn push(&mut self, point: impl Into<DataPoint>) {
        let point = point.into();
        let previous = self.points.last().copied();
        self.points.push(point);
        self.notify(ChangeKind::Added { point, previous });
    }

    /// Remove and return the oldest sample.
    pub fn shift(&mut self) -> Option<DataPoint> {
        if self.points.is_empty() {
            return None;
        }
        let removed = self.points.remove(0);
        self.notify(ChangeKind::Removed { count: 1 });
        Some(removed)
    }

    /// Remove the first sample whose x equals `x`. Returns whether one was found.
    pub fn remove_x(&mut self, x: f64) -> bool {
        match self.points.iter().position(|p| p.x == x) {
            Some(i) => {
                self.points.remove(i);
                self.notify(ChangeKind::Removed { count: 1 });
                true
            }
            None => false,
        }
    }

    /// Drop every leading sample with x strictly below `x`, notifying once.
    pub fn remove_before(&mut self, x: f64) -> usize {
        let count = self.points.iter().take_while(|p| p.x < x).count();
        self.remove_range(0, count).unwrap_or(0)
    }

    /// Remove `count` samples starting at `start`, notifying once for the whole batch.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<usize> {
        let end = start.checked_add(count).unwrap_or(usize::MAX);
        if end > self.points.len() {
            return Err(ChartError::IndexOutOfRange { index: end.saturating_sub(1), len: self.points.len() });
        }
        if count == 0 {
            return Ok(0);
        }
        self.points.drain(start..end);
        trace!(series = ?self.id, count, "bulk removal");
        self.notify(ChangeKind::Removed { count });
        Ok(count)
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.notify(ChangeKind::Cleared);
    }

    fn notify(&self, kind: ChangeKind) {
        let change = SeriesChange { series: self.id, kind, x_extent: self.x_extent(), len: self.points.len() };
        self.changed.emit(&change);
    }
}

impl Default for DataSeries {
    fn default() -> Self { Self::new() }
}
