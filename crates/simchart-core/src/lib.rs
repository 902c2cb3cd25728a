// File: crates/simchart-core/src/lib.rs
// Summary: Core library entry point; exports transforms, decorators, cursor, series and chart variants.

pub mod bar_chart;
pub mod cursor;
pub mod emitter;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod panel;
pub mod plot;
pub mod scene;
pub mod scrolling;
pub mod series;
pub mod spacing;
pub mod ticks;
pub mod transform;
pub mod types;

pub use bar_chart::{BarChart, BarChartConfig, BarEntry, BarSegment, BarStack};
pub use cursor::{ChartCursor, CursorEvent, CursorState, CursorStyle, SharedCursor};
pub use emitter::{Emitter, Subscription};
pub use error::{ChartError, Result};
pub use geometry::{Point, Rect};
pub use grid::{GridLine, GridLineSet, GridLines, GridStyle};
pub use panel::{ChartPanel, ChartPanelConfig};
pub use plot::{BarPlot, LinePlot, ScatterPlot, SeriesRenderer};
pub use scene::{Primitive, Scene, TextAlign, TextBaseline, TextNode};
pub use scrolling::{ScrollMode, ScrollingChart, ScrollingChartConfig, Seismograph, SeismographConfig};
pub use series::{ChangeKind, DataPoint, DataSeries, SeriesChange, SeriesId, SeriesStyle, SharedSeries};
pub use spacing::{AxisSpacing, LineSpacing};
pub use ticks::{AxisLine, TickEdge, TickLabel, TickLabelConfig, TickLabels, TickMark, TickMarkConfig, TickMarks, TickSide};
pub use transform::{line_positions, snap, ChartTransform, Orientation, Range, TransformProperty};
pub use types::{Color, Insets, Stroke};
