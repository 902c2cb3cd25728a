// File: crates/simchart-core/src/scrolling.rs
// Summary: Time-windowed scrolling chart and the seismograph (pen-mode) variant.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::cursor::{ChartCursor, SharedCursor};
use crate::error::{ChartError, Result};
use crate::geometry::Point;
use crate::grid::{GridLines, GridStyle};
use crate::panel::{ChartPanel, ChartPanelConfig};
use crate::plot::{LinePlot, SeriesRenderer};
use crate::scene::{Primitive, Scene, TextAlign, TextBaseline, TextNode};
use crate::series::{DataPoint, DataSeries, SeriesStyle, SharedSeries};
use crate::spacing::{AxisSpacing, LineSpacing};
use crate::ticks::{AxisLine, TickEdge, TickLabelConfig, TickLabels};
use crate::transform::{ChartTransform, Orientation, Range};
use crate::types::{Color, Insets, DEFAULT_HEIGHT, DEFAULT_PRECISION, DEFAULT_WIDTH};

/// Where "now" sits inside the visible time window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollMode {
    /// Newest time at the right edge.
    Trailing,
    /// Newest time at `fraction` of the width; the rest is blank lead-in.
    Pen { fraction: f64 },
}

impl ScrollMode {
    /// Visible x range at time `t` for a window of `span`. The window stays at
    /// `[0, span]` until `t` reaches the scroll point.
    pub fn window(&self, t: f64, span: f64) -> Range {
        let fraction = match *self {
            ScrollMode::Trailing => 1.0,
            ScrollMode::Pen { fraction } => fraction.clamp(0.0, 1.0),
        };
        let lead = span * fraction;
        if t <= lead {
            Range::new(0.0, span)
        } else {
            let min = t - lead;
            Range::new(min, min + span)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollingChartConfig {
    /// Plot width in pixels. Default: 400.
    pub width: f64,
    /// Plot height in pixels. Default: 200.
    pub height: f64,
    /// Visible time span in model units (seconds). Default: 10.
    pub time_span: f64,
    /// Default: [-1, 1].
    pub y_range: Range,
    /// Vertical grid lines along time. Default: major 1, no minor.
    pub x_spacing: Option<LineSpacing>,
    /// Horizontal grid lines along value. Default: major 0.5, no minor.
    pub y_spacing: Option<LineSpacing>,
    pub grid_style: GridStyle,
    /// Default: `ScrollMode::Trailing`.
    pub mode: ScrollMode,
    /// Decimal digits for snapping line positions. Default: 10.
    pub precision: u32,
    /// Label the time and value axes. Default: true.
    pub labels: bool,
    /// Digits after the decimal point for time labels. Default: 0.
    pub time_decimal_places: usize,
    /// Digits after the decimal point for value labels. Default: 1.
    pub value_decimal_places: usize,
    /// Optional axis titles, drawn below and left of the plot. Default: none.
    pub time_title: Option<String>,
    pub value_title: Option<String>,
    /// Room around the plot for labels. Default: `Insets::default()`.
    pub insets: Insets,
    /// Drop samples that scrolled out of view (one before the window is kept so
    /// lines reach the left edge). Default: true.
    pub prune: bool,
}

impl Default for ScrollingChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            time_span: 10.0,
            y_range: Range::new(-1.0, 1.0),
            x_spacing: LineSpacing::major_only(1.0).ok(),
            y_spacing: LineSpacing::major_only(0.5).ok(),
            grid_style: GridStyle::default(),
            mode: ScrollMode::Trailing,
            precision: DEFAULT_PRECISION,
            labels: true,
            time_decimal_places: 0,
            value_decimal_places: 1,
            time_title: None,
            value_title: None,
            insets: Insets::default(),
            prune: true,
        }
    }
}

/// Chart whose x axis follows a clock. Composes a `ChartPanel`; a cursor can
/// be attached with `enable_cursor`.
pub struct ScrollingChart {
    config: ScrollingChartConfig,
    panel: ChartPanel,
    series: Vec<SharedSeries>,
    time: f64,
}

impl ScrollingChart {
    pub fn new(config: ScrollingChartConfig) -> Result<Self> {
        if !(config.time_span > 0.0) || !config.time_span.is_finite() {
            return Err(ChartError::InvalidRange { min: 0.0, max: config.time_span });
        }
        let x_range = config.mode.window(0.0, config.time_span);
        let mut panel = ChartPanel::new(ChartPanelConfig {
            width: config.width,
            height: config.height,
            x_range,
            y_range: config.y_range,
            precision: config.precision,
            ..ChartPanelConfig::default()
        })?;
        panel.set_grid(Some(
            GridLines::new(AxisSpacing::new(config.x_spacing, config.y_spacing)).with_style(config.grid_style),
        ));
        panel.add_axis_line(AxisLine::new(Orientation::Horizontal).at(0.0));
        if config.labels {
            if let Some(major) = config.x_spacing.and_then(|s| s.major()) {
                panel.add_tick_labels(TickLabels::new(
                    Orientation::Horizontal,
                    major,
                    TickLabelConfig { decimal_places: config.time_decimal_places, edge: TickEdge::Min, offset: 4.0, ..TickLabelConfig::default() },
                )?);
            }
            if let Some(major) = config.y_spacing.and_then(|s| s.major()) {
                panel.add_tick_labels(TickLabels::new(
                    Orientation::Vertical,
                    major,
                    TickLabelConfig { decimal_places: config.value_decimal_places, edge: TickEdge::Min, offset: 4.0, ..TickLabelConfig::default() },
                )?);
            }
        }
        Ok(Self { config, panel, series: Vec::new(), time: 0.0 })
    }

    pub fn config(&self) -> &ScrollingChartConfig { &self.config }
    pub fn panel(&self) -> &ChartPanel { &self.panel }
    pub fn panel_mut(&mut self) -> &mut ChartPanel { &mut self.panel }
    pub fn time(&self) -> f64 { self.time }
    pub fn transform(&self) -> Rc<ChartTransform> { self.panel.transform() }
    pub fn series(&self) -> &[SharedSeries] { &self.series }

    pub fn add_series(&mut self, series: SharedSeries, renderer: impl SeriesRenderer + 'static) {
        self.series.push(Rc::clone(&series));
        self.panel.add_series(series, renderer);
    }

    /// Create and attach a cursor; returns the shared handle.
    pub fn enable_cursor(&mut self) -> SharedCursor {
        if let Some(c) = self.panel.cursor() {
            return Rc::clone(c);
        }
        let cursor = ChartCursor::new(self.panel.transform()).shared();
        self.panel.attach_cursor(Rc::clone(&cursor));
        cursor
    }

    pub fn cursor(&self) -> Option<&SharedCursor> {
        self.panel.cursor()
    }

    /// Move the window to time `t` and prune samples that scrolled away.
    pub fn set_time(&mut self, t: f64) -> Result<()> {
        if !t.is_finite() {
            return Err(ChartError::InvalidRange { min: t, max: t });
        }
        self.time = t;
        let window = self.config.mode.window(t, self.config.time_span);
        self.panel.set_x_range(window)?;
        if self.config.prune {
            for s in &self.series {
                let mut s = s.borrow_mut();
                let older = s.points().iter().take_while(|p| p.x < window.min).count();
                if older > 1 {
                    // Keep the last sample before the window.
                    let removed = s.remove_range(0, older - 1)?;
                    trace!(removed, "pruned scrolled-out samples");
                }
            }
        }
        Ok(())
    }

    pub fn advance(&mut self, dt: f64) -> Result<()> {
        self.set_time(self.time + dt)
    }

    pub fn set_y_range(&mut self, y_range: Range) -> Result<()> {
        self.panel.set_y_range(y_range)?;
        self.config.y_range = y_range;
        Ok(())
    }

    /// Plot area origin inside the scene returned by `render`.
    pub fn plot_origin(&self) -> Point {
        Point::new(self.config.insets.left as f64, self.config.insets.top as f64)
    }

    pub fn render(&mut self) -> Scene {
        let insets = self.config.insets;
        let w = self.config.width + insets.hsum() as f64;
        let h = self.config.height + insets.vsum() as f64;
        let mut scene = Scene::new(w, h);
        let panel_scene = self.panel.render();
        let o = self.plot_origin();
        scene.append_translated(&panel_scene, o.x, o.y);
        if let Some(title) = &self.config.time_title {
            scene.text(TextNode {
                text: title.clone(),
                at: Point::new(o.x + self.config.width / 2.0, h - 2.0),
                size: 12.0,
                color: Color::BLACK,
                align: TextAlign::Center,
                baseline: TextBaseline::Bottom,
            });
        }
        if let Some(title) = &self.config.value_title {
            scene.text(TextNode {
                text: title.clone(),
                at: Point::new(2.0, o.y - 4.0),
                size: 12.0,
                color: Color::BLACK,
                align: TextAlign::Left,
                baseline: TextBaseline::Bottom,
            });
        }
        scene
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeismographConfig {
    /// Fraction of the width where the pen sits. Default: 0.75.
    pub pen_fraction: f64,
    /// Pen marker radius in pixels. Default: 4.
    pub pen_radius: f64,
    /// Default: red.
    pub pen_color: Color,
    /// Style of the recorded trace.
    pub trace: SeriesStyle,
}

impl Default for SeismographConfig {
    fn default() -> Self {
        Self {
            pen_fraction: 0.75,
            pen_radius: 4.0,
            pen_color: Color::RED,
            trace: SeriesStyle { color: Color::BLUE, line_width: 1.5, ..SeriesStyle::default() },
        }
    }
}

/// Scrolling chart in pen mode: values are recorded at the current time and
/// drawn with a pen marker on the newest sample, at a fixed point of the width.
pub struct Seismograph {
    chart: ScrollingChart,
    trace: SharedSeries,
    config: SeismographConfig,
}

impl Seismograph {
    pub fn new(mut chart_config: ScrollingChartConfig, config: SeismographConfig) -> Result<Self> {
        chart_config.mode = ScrollMode::Pen { fraction: config.pen_fraction };
        let mut chart = ScrollingChart::new(chart_config)?;
        let trace = DataSeries::with_style(config.trace).shared();
        chart.add_series(Rc::clone(&trace), LinePlot::new());
        debug!(pen_fraction = config.pen_fraction, "seismograph created");
        Ok(Self { chart, trace, config })
    }

    pub fn chart(&self) -> &ScrollingChart { &self.chart }
    pub fn chart_mut(&mut self) -> &mut ScrollingChart { &mut self.chart }
    pub fn trace(&self) -> &SharedSeries { &self.trace }

    /// Append `value` at the current time.
    pub fn record(&mut self, value: f64) {
        let t = self.chart.time();
        self.trace.borrow_mut().push(DataPoint::new(t, value));
    }

    /// Advance the clock by `dt` and record `value` at the new time.
    pub fn step(&mut self, dt: f64, value: f64) -> Result<()> {
        self.chart.advance(dt)?;
        self.record(value);
        Ok(())
    }

    /// View x of the pen inside the plot area.
    pub fn pen_x(&self) -> f64 {
        self.chart.transform().model_to_view(Orientation::Horizontal, self.chart.time())
    }

    pub fn render(&mut self) -> Scene {
        let mut scene = self.chart.render();
        let transform = self.chart.transform();
        if let Some(last) = self.trace.borrow().last().filter(|p| !p.is_gap()) {
            let o = self.chart.plot_origin();
            let y = transform.model_to_view(Orientation::Vertical, transform.y_range().clamp(last.y));
            let x = transform.model_to_view(Orientation::Horizontal, last.x);
            scene.push(Primitive::Circle {
                center: Point::new(o.x + x, o.y + y),
                radius: self.config.pen_radius,
                fill: self.config.pen_color,
            });
        }
        scene
    }
}
