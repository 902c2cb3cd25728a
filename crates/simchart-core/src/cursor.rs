// File: crates/simchart-core/src/cursor.rs
// Summary: Draggable time cursor: value clamping and visibility state machine.
//
// Clamp policy: the recorded data extent is authoritative for the cursor value
// (both `set_value` and dragging clamp to it), while visibility is decided against
// the viewable x range of the active transform. Panning away from recorded data
// therefore hides the cursor without moving it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::emitter::{Emitter, Subscription};
use crate::error::{ChartError, Result};
use crate::geometry::{Point, Rect};
use crate::scene::{Primitive, Scene};
use crate::series::{DataSeries, SeriesChange, SeriesId};
use crate::transform::{ChartTransform, Orientation, Range, TransformProperty};
use crate::types::{Color, Stroke};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    Hidden,
    Visible,
    Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorEvent {
    Shown,
    Hidden,
    Moved(f64),
    DragStarted,
    DragEnded,
    /// The cursor was hidden mid-drag; no `DragEnded` follows.
    DragInterrupted,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorStyle {
    /// Body width in pixels. Default: 10.
    pub width: f64,
    /// Default: translucent blue.
    pub fill: Color,
    /// Default: dark blue, 1px.
    pub stroke: Stroke,
    /// Extra horizontal pixels accepted by `hit_test` on each side. Default: 6.
    pub touch_dilation: f64,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self {
            width: 10.0,
            fill: Color::from_argb(96, 50, 50, 200),
            stroke: Stroke::new(Color::rgb(20, 20, 120), 1.0),
            touch_dilation: 6.0,
        }
    }
}

pub type SharedCursor = Rc<RefCell<ChartCursor>>;

#[derive(Debug)]
pub struct ChartCursor {
    value: f64,
    state: CursorState,
    visibility_override: Option<bool>,
    transform: Rc<ChartTransform>,
    /// `None` marks an attached but empty series.
    extents: BTreeMap<SeriesId, Option<Range>>,
    pub style: CursorStyle,
    events: Emitter<CursorEvent>,
    /// Set inside `update`; events queue in `pending` until the borrow ends.
    deferred: bool,
    pending: Vec<CursorEvent>,
}

impl ChartCursor {
    pub fn new(transform: Rc<ChartTransform>) -> Self {
        Self {
            value: 0.0,
            state: CursorState::Hidden,
            visibility_override: None,
            transform,
            extents: BTreeMap::new(),
            style: CursorStyle::default(),
            events: Emitter::new(),
            deferred: false,
            pending: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedCursor {
        Rc::new(RefCell::new(self))
    }

    /// Record `series`' extent now and keep it current. Dropping the returned
    /// guard detaches the series from the cursor.
    #[must_use = "dropping the Subscription detaches the series"]
    pub fn attach_series(cursor: &SharedCursor, series: &DataSeries) -> Subscription {
        let id = series.id();
        let extent = series.x_extent();
        Self::update(cursor, |c| c.set_series_extent(id, extent));
        let weak: Weak<RefCell<ChartCursor>> = Rc::downgrade(cursor);
        let on_change = weak.clone();
        series
            .subscribe(move |change: &SeriesChange| {
                if let Some(c) = on_change.upgrade() {
                    Self::update(&c, |c| c.on_series_change(change));
                }
            })
            .then(move || {
                if let Some(c) = weak.upgrade() {
                    // Skipped when the cursor is borrowed by whoever dropped the guard.
                    if c.try_borrow_mut().is_ok() {
                        Self::update(&c, |c| c.detach_series(id));
                    }
                }
            })
    }

    /// Follow transform replacements of `property`.
    #[must_use = "dropping the Subscription stops tracking the transform"]
    pub fn track_transform(cursor: &SharedCursor, property: &TransformProperty) -> Subscription {
        let current = property.get();
        Self::update(cursor, |c| c.set_transform(current));
        let weak = Rc::downgrade(cursor);
        property.subscribe(move |t| {
            if let Some(c) = weak.upgrade() {
                Self::update(&c, |c| c.set_transform(Rc::clone(t)));
            }
        })
    }

    /// Run `f` on the cursor and notify listeners once the borrow is released,
    /// so listeners may read the cursor. Calling the `&mut self` methods
    /// directly notifies inside the caller's borrow instead.
    pub fn update<R>(cursor: &SharedCursor, f: impl FnOnce(&mut ChartCursor) -> R) -> R {
        let (out, pending, events) = {
            let mut c = cursor.borrow_mut();
            c.deferred = true;
            let out = f(&mut *c);
            c.deferred = false;
            (out, std::mem::take(&mut c.pending), c.events.clone())
        };
        for event in &pending {
            events.emit(event);
        }
        out
    }

    fn notify(&mut self, event: CursorEvent) {
        if self.deferred {
            self.pending.push(event);
        } else {
            self.events.emit(&event);
        }
    }

    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&CursorEvent) + 'static) -> Subscription {
        self.events.subscribe(listener)
    }

    pub fn value(&self) -> f64 { self.value }
    pub fn state(&self) -> CursorState { self.state }
    pub fn is_visible(&self) -> bool { self.state != CursorState::Hidden }
    pub fn is_dragging(&self) -> bool { self.state == CursorState::Dragging }
    pub fn visibility_override(&self) -> Option<bool> { self.visibility_override }
    pub fn transform(&self) -> &Rc<ChartTransform> { &self.transform }

    /// Whether any attached series holds at least one sample.
    pub fn has_data(&self) -> bool {
        self.extents.values().any(Option::is_some)
    }

    /// Min first-x and max last-x over attached series.
    pub fn recorded_extent(&self) -> Option<Range> {
        self.extents.values().flatten().copied().reduce(|a, b| Range::union(a, b).unwrap_or(a))
    }

    /// View x of the cursor center; `None` while hidden.
    pub fn view_x(&self) -> Option<f64> {
        self.is_visible().then(|| self.transform.model_to_view(Orientation::Horizontal, self.value))
    }

    pub fn set_value(&mut self, value: f64) {
        let value = match self.recorded_extent() {
            Some(r) => r.clamp(value),
            None => value,
        };
        if value != self.value {
            self.value = value;
            self.notify(CursorEvent::Moved(value));
        }
        self.update_visibility();
    }

    /// Force visibility (`Some`) or return to the data/range rule (`None`).
    pub fn set_visibility_override(&mut self, visible: Option<bool>) {
        self.visibility_override = visible;
        self.update_visibility();
    }

    pub fn set_transform(&mut self, transform: Rc<ChartTransform>) {
        self.transform = transform;
        self.update_visibility();
    }

    pub fn on_series_change(&mut self, change: &SeriesChange) {
        if self.extents.contains_key(&change.series) {
            self.set_series_extent(change.series, change.x_extent);
        }
    }

    pub fn detach_series(&mut self, id: SeriesId) {
        if self.extents.remove(&id).is_some() {
            self.recompute_recorded_extent();
        }
    }

    fn set_series_extent(&mut self, id: SeriesId, extent: Option<Range>) {
        self.extents.insert(id, extent);
        self.recompute_recorded_extent();
    }

    /// Re-clamp the value into the recorded extent and refresh visibility.
    pub fn recompute_recorded_extent(&mut self) {
        if let Some(r) = self.recorded_extent() {
            let clamped = r.clamp(self.value);
            if clamped != self.value {
                self.value = clamped;
                self.notify(CursorEvent::Moved(clamped));
            }
        }
        self.update_visibility();
    }

    pub fn start_drag(&mut self) -> Result<()> {
        if !self.has_data() {
            return Err(ChartError::NoData);
        }
        match self.state {
            CursorState::Hidden => Err(ChartError::CursorHidden),
            CursorState::Dragging => Ok(()),
            CursorState::Visible => {
                self.state = CursorState::Dragging;
                debug!(value = self.value, "cursor drag started");
                self.notify(CursorEvent::DragStarted);
                Ok(())
            }
        }
    }

    /// Move to the model x under `view_x`, clamped to the recorded extent.
    /// Ignored unless a drag is in progress.
    pub fn drag_to(&mut self, view_x: f64) {
        if self.state != CursorState::Dragging {
            return;
        }
        let x = self.transform.view_to_model(Orientation::Horizontal, view_x);
        self.set_value(x);
    }

    pub fn end_drag(&mut self) {
        if self.state == CursorState::Dragging {
            self.state = CursorState::Visible;
            debug!(value = self.value, "cursor drag ended");
            self.notify(CursorEvent::DragEnded);
        }
    }

    /// Whether a pointer at `p` (view space) grabs the cursor.
    pub fn hit_test(&self, p: Point) -> bool {
        match self.view_x() {
            Some(x) => {
                let half = self.style.width / 2.0 + self.style.touch_dilation;
                (p.x - x).abs() <= half && p.y >= 0.0 && p.y <= self.transform.view_height()
            }
            None => false,
        }
    }

    fn should_be_visible(&self) -> bool {
        self.visibility_override
            .unwrap_or_else(|| self.has_data() && self.transform.x_range().contains(self.value))
    }

    fn update_visibility(&mut self) {
        let visible = self.should_be_visible();
        match (self.state, visible) {
            (CursorState::Hidden, true) => {
                self.state = CursorState::Visible;
                debug!(value = self.value, "cursor shown");
                self.notify(CursorEvent::Shown);
            }
            (CursorState::Dragging, false) => {
                self.state = CursorState::Hidden;
                debug!(value = self.value, "cursor hidden mid-drag; drag interrupted");
                self.notify(CursorEvent::DragInterrupted);
                self.notify(CursorEvent::Hidden);
            }
            (CursorState::Visible, false) => {
                self.state = CursorState::Hidden;
                debug!(value = self.value, "cursor hidden");
                self.notify(CursorEvent::Hidden);
            }
            _ => {}
        }
    }

    pub fn draw(&self, scene: &mut Scene) {
        let Some(x) = self.view_x() else { return };
        let h = self.transform.view_height();
        let w = self.style.width;
        scene.push(Primitive::Rect {
            rect: Rect::from_ltwh(x - w / 2.0, 0.0, w, h),
            fill: Some(self.style.fill),
            stroke: Some(self.style.stroke),
        });
        // Grip lines in the middle of the body.
        let grip = (h * 0.1).min(12.0);
        for dx in [-w / 6.0, w / 6.0] {
            scene.line(
                Point::new(x + dx, h / 2.0 - grip),
                Point::new(x + dx, h / 2.0 + grip),
                self.style.stroke,
            );
        }
    }
}
