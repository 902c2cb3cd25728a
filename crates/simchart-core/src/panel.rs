// File: crates/simchart-core/src/panel.rs
// Summary: Chart panel compositor: owns the transform, series layers, decorators and optional cursor.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::cursor::{ChartCursor, SharedCursor};
use crate::emitter::Subscription;
use crate::error::Result;
use crate::geometry::Rect;
use crate::grid::GridLines;
use crate::plot::SeriesRenderer;
use crate::scene::{Primitive, Scene};
use crate::series::{SeriesChange, SeriesId, SharedSeries};
use crate::ticks::{AxisLine, TickLabels, TickMarks};
use crate::transform::{ChartTransform, Range, TransformProperty};
use crate::types::{Color, Stroke, DEFAULT_HEIGHT, DEFAULT_PRECISION, DEFAULT_WIDTH};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPanelConfig {
    /// Panel width in pixels. Default: 400.
    pub width: f64,
    /// Panel height in pixels. Default: 200.
    pub height: f64,
    /// Visible model x range. Default: [0, 1].
    pub x_range: Range,
    /// Visible model y range. Default: [0, 1].
    pub y_range: Range,
    /// Decimal digits for snapping line positions. Default: 10.
    pub precision: u32,
    /// Panel fill. Default: white.
    pub background: Option<Color>,
    /// Panel outline. Default: black, 1px.
    pub border: Option<Stroke>,
    /// Clip series geometry to the panel bounds. Default: true.
    pub clip: bool,
}

impl Default for ChartPanelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            x_range: Range::new(0.0, 1.0),
            y_range: Range::new(0.0, 1.0),
            precision: DEFAULT_PRECISION,
            background: Some(Color::WHITE),
            border: Some(Stroke::default()),
            clip: true,
        }
    }
}

impl ChartPanelConfig {
    pub fn transform(&self) -> Result<ChartTransform> {
        Ok(ChartTransform::new(self.width, self.height, self.x_range, self.y_range)?.with_precision(self.precision))
    }
}

struct Layer {
    series: SharedSeries,
    renderer: Box<dyn SeriesRenderer>,
    pending: Rc<RefCell<Vec<SeriesChange>>>,
    _subscription: Subscription,
}

struct AttachedCursor {
    cursor: SharedCursor,
    subscriptions: Vec<Subscription>,
    series: Vec<(SeriesId, Subscription)>,
}

/// Composes a chart from an injected renderer per series plus optional
/// decorators and cursor. Geometry is rebuilt on `render`; the panel tracks
/// whether anything changed since the last render.
pub struct ChartPanel {
    config: ChartPanelConfig,
    transform: TransformProperty,
    layers: Vec<Layer>,
    grid: Option<GridLines>,
    tick_marks: Vec<TickMarks>,
    tick_labels: Vec<TickLabels>,
    axis_lines: Vec<AxisLine>,
    cursor: Option<AttachedCursor>,
    transform_dirty: Rc<Cell<bool>>,
    data_dirty: Rc<Cell<bool>>,
    _transform_subscription: Subscription,
}

impl ChartPanel {
    pub fn new(config: ChartPanelConfig) -> Result<Self> {
        let transform = TransformProperty::new(config.transform()?);
        let transform_dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&transform_dirty);
        let sub = transform.subscribe(move |_| flag.set(true));
        Ok(Self {
            config,
            transform,
            layers: Vec::new(),
            grid: None,
            tick_marks: Vec::new(),
            tick_labels: Vec::new(),
            axis_lines: Vec::new(),
            cursor: None,
            transform_dirty,
            data_dirty: Rc::new(Cell::new(true)),
            _transform_subscription: sub,
        })
    }

    pub fn config(&self) -> &ChartPanelConfig { &self.config }
    pub fn transform(&self) -> Rc<ChartTransform> { self.transform.get() }
    pub fn transform_property(&self) -> &TransformProperty { &self.transform }
    pub fn width(&self) -> f64 { self.config.width }
    pub fn height(&self) -> f64 { self.config.height }

    /// Replace both ranges at once; listeners see a single change.
    pub fn set_ranges(&mut self, x_range: Range, y_range: Range) -> Result<()> {
        self.transform.set_ranges(x_range, y_range)?;
        self.config.x_range = x_range;
        self.config.y_range = y_range;
        Ok(())
    }

    pub fn set_x_range(&mut self, x_range: Range) -> Result<()> {
        self.set_ranges(x_range, self.config.y_range)
    }

    pub fn set_y_range(&mut self, y_range: Range) -> Result<()> {
        self.set_ranges(self.config.x_range, y_range)
    }

    pub fn set_view_size(&mut self, width: f64, height: f64) -> Result<()> {
        self.transform.set_view_size(width, height)?;
        self.config.width = width;
        self.config.height = height;
        Ok(())
    }

    pub fn set_grid(&mut self, grid: Option<GridLines>) {
        self.grid = grid;
        self.transform_dirty.set(true);
    }

    pub fn grid(&self) -> Option<&GridLines> { self.grid.as_ref() }

    pub fn add_tick_marks(&mut self, ticks: TickMarks) {
        self.tick_marks.push(ticks);
        self.transform_dirty.set(true);
    }

    pub fn add_tick_labels(&mut self, labels: TickLabels) {
        self.tick_labels.push(labels);
        self.transform_dirty.set(true);
    }

    pub fn tick_labels(&self) -> &[TickLabels] { &self.tick_labels }

    pub fn add_axis_line(&mut self, line: AxisLine) {
        self.axis_lines.push(line);
        self.transform_dirty.set(true);
    }

    /// Attach `series`, drawn by `renderer`. The panel listens for changes until
    /// the series is removed or the panel is dropped.
    pub fn add_series(&mut self, series: SharedSeries, renderer: impl SeriesRenderer + 'static) {
        let pending: Rc<RefCell<Vec<SeriesChange>>> = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&pending);
        let dirty = Rc::clone(&self.data_dirty);
        let sub = series.borrow().subscribe(move |change| {
            queue.borrow_mut().push(*change);
            dirty.set(true);
        });
        if let Some(attached) = &mut self.cursor {
            let s = series.borrow();
            attached.series.push((s.id(), ChartCursor::attach_series(&attached.cursor, &s)));
        }
        debug!(renderer = renderer.name(), "series layer added");
        self.layers.push(Layer { series, renderer: Box::new(renderer), pending, _subscription: sub });
        self.data_dirty.set(true);
    }

    /// Detach the series and its renderer; returns whether it was attached.
    pub fn remove_series(&mut self, series: &SharedSeries) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| !Rc::ptr_eq(&l.series, series));
        let removed = self.layers.len() != before;
        if removed {
            let id = series.borrow().id();
            if let Some(attached) = &mut self.cursor {
                // Dropping the guard detaches the series from the cursor.
                attached.series.retain(|(sid, _)| *sid != id);
            }
            self.data_dirty.set(true);
        }
        removed
    }

    pub fn series(&self) -> impl Iterator<Item = &SharedSeries> {
        self.layers.iter().map(|l| &l.series)
    }

    /// Attach a cursor by reference; it tracks this panel's transform and series.
    pub fn attach_cursor(&mut self, cursor: SharedCursor) {
        let mut subscriptions = vec![ChartCursor::track_transform(&cursor, &self.transform)];
        let dirty = Rc::clone(&self.data_dirty);
        subscriptions.push(cursor.borrow().subscribe(move |_| dirty.set(true)));
        let series = self
            .layers
            .iter()
            .map(|layer| {
                let s = layer.series.borrow();
                (s.id(), ChartCursor::attach_series(&cursor, &s))
            })
            .collect();
        self.cursor = Some(AttachedCursor { cursor, subscriptions, series });
        self.data_dirty.set(true);
    }

    pub fn detach_cursor(&mut self) -> Option<SharedCursor> {
        self.cursor.take().map(|a| {
            drop(a.subscriptions);
            drop(a.series);
            a.cursor
        })
    }

    pub fn cursor(&self) -> Option<&SharedCursor> {
        self.cursor.as_ref().map(|a| &a.cursor)
    }

    pub fn needs_redraw(&self) -> bool {
        self.transform_dirty.get() || self.data_dirty.get()
    }

    /// Force a redraw on the next `render`, e.g. after a cursor moved.
    pub fn mark_dirty(&self) {
        self.data_dirty.set(true);
    }

    /// Build the panel scene in panel-local view coordinates. Labels may extend
    /// beyond `[0, width] x [0, height]`.
    pub fn render(&mut self) -> Scene {
        let transform = self.transform.get();
        if self.transform_dirty.get() {
            for layer in &mut self.layers {
                layer.pending.borrow_mut().clear();
                layer.renderer.invalidate();
            }
        }
        let mut scene = Scene::new(self.config.width, self.config.height);
        let bounds = Rect::from_ltwh(0.0, 0.0, self.config.width, self.config.height);
        if let Some(bg) = self.config.background {
            scene.push(Primitive::Rect { rect: bounds, fill: Some(bg), stroke: None });
        }

        let mut plot = Scene::new(self.config.width, self.config.height);
        if let Some(grid) = &self.grid {
            grid.draw(&transform, &mut plot);
        }
        for line in &self.axis_lines {
            line.draw(&transform, &mut plot);
        }
        for layer in &mut self.layers {
            let changes = std::mem::take(&mut *layer.pending.borrow_mut());
            for change in &changes {
                layer.renderer.series_changed(change);
            }
            let series = layer.series.borrow();
            layer.renderer.draw(&series, &transform, &mut plot);
        }
        if let Some(attached) = &self.cursor {
            attached.cursor.borrow().draw(&mut plot);
        }
        if self.config.clip {
            scene.push(plot.into_clipped_group(bounds));
        } else {
            scene.append_translated(&plot, 0.0, 0.0);
        }

        for ticks in &self.tick_marks {
            ticks.draw(&transform, &mut scene);
        }
        for labels in &mut self.tick_labels {
            labels.draw(&transform, &mut scene);
        }
        if let Some(border) = self.config.border {
            scene.push(Primitive::Rect { rect: bounds, fill: None, stroke: Some(border) });
        }

        trace!(primitives = scene.len(), "panel rendered");
        self.transform_dirty.set(false);
        self.data_dirty.set(false);
        scene
    }
}
