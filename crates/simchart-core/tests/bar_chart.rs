// File: crates/simchart-core/tests/bar_chart.rs
// Purpose: Bar layout, stacking, clamping and the negative composite rule.

use std::cell::Cell;
use std::rc::Rc;

use simchart_core::{BarChart, BarChartConfig, BarStack, ChartError, Color, Range};

const RED: Color = Color::RED;
const BLUE: Color = Color::BLUE;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn bars_are_laid_out_left_to_right() {
    let chart = BarChart::new(BarChartConfig::default(), vec![BarStack::single(10.0, RED), BarStack::single(20.0, BLUE)])
        .unwrap();
    assert_eq!(chart.width(), 2.0 * (18.0 + 12.0) + 12.0);
    assert_eq!(chart.bar_center(0), 21.0);
    assert_eq!(chart.bar_center(1), 51.0);

    let segs = chart.segments();
    assert_eq!(segs.len(), 2);
    assert!(approx(segs[0].rect.height(), 20.0));
    assert!(approx(segs[1].rect.height(), 40.0));
    assert!(approx(segs[1].rect.left, 42.0));
    assert!(approx(segs[1].rect.bottom, 200.0));
}

#[test]
fn composite_bars_stack_entries() {
    let stack = BarStack::new(vec![30.0, 0.0, 20.0], vec![RED, Color::GRAY, BLUE]).unwrap();
    let chart = BarChart::new(BarChartConfig::default(), vec![stack]).unwrap();
    let segs = chart.segments();
    assert_eq!(segs.len(), 2, "zero-height entries are skipped");
    assert_eq!(segs[0].color, RED);
    assert!(approx(segs[0].rect.top, 140.0) && approx(segs[0].rect.bottom, 200.0));
    assert_eq!(segs[1].color, BLUE);
    assert!(approx(segs[1].rect.top, 100.0) && approx(segs[1].rect.bottom, 140.0));
}

#[test]
fn negative_entry_collapses_composite_bar() {
    let config = BarChartConfig { range: Range::new(0.0, 100.0), height: 200.0, ..BarChartConfig::default() };
    let invalid = config.invalid_color;
    let stack = BarStack::new(vec![5.0, -2.0], vec![RED, BLUE]).unwrap();
    let chart = BarChart::new(config, vec![stack]).unwrap();
    let segs = chart.segments();
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].color, invalid);
    assert!(approx(segs[0].rect.height(), 6.0));
}

#[test]
fn negative_single_bar_is_clamped_to_range() {
    let chart = BarChart::new(BarChartConfig::default(), vec![BarStack::single(-40.0, RED)]).unwrap();
    let segs = chart.segments();
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].color, RED);
    assert!(segs[0].clipped);
    assert!(approx(segs[0].rect.height(), 0.0));
}

#[test]
fn values_beyond_range_are_clipped() {
    let mut chart = BarChart::new(BarChartConfig::default(), vec![BarStack::single(150.0, RED)]).unwrap();
    let seg = chart.segments()[0];
    assert!(seg.clipped);
    assert!(approx(seg.rect.top, 0.0));

    chart.set_range(Range::new(0.0, 200.0)).unwrap();
    let seg = chart.segments()[0];
    assert!(!seg.clipped);
    assert!(approx(seg.rect.top, 50.0));
}

#[test]
fn updates_validate_indices() {
    let mut chart = BarChart::new(BarChartConfig::default(), vec![BarStack::single(1.0, RED)]).unwrap();
    chart.set_value(0, 0, 42.0).unwrap();
    assert_eq!(chart.bar(0).unwrap().total(), 42.0);
    assert_eq!(chart.set_value(1, 0, 1.0), Err(ChartError::IndexOutOfRange { index: 1, len: 1 }));
    assert_eq!(chart.set_value(0, 2, 1.0), Err(ChartError::IndexOutOfRange { index: 2, len: 1 }));
    assert!(matches!(BarStack::new(vec![1.0], vec![]), Err(ChartError::CountMismatch { left: 1, right: 0 })));
}

#[test]
fn render_draws_labels_and_baseline() {
    let bars = vec![BarStack::single(10.0, RED).with_label("a"), BarStack::single(60.0, BLUE).with_label("b")];
    let chart = BarChart::new(BarChartConfig::default(), bars).unwrap();
    let scene = chart.render();
    let labels: Vec<&str> = scene.texts().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(labels, vec!["a", "b"]);
    assert_eq!(scene.rects().len(), 2);
    assert_eq!(scene, chart.render());
}

#[test]
fn updates_mark_the_chart_for_redraw() {
    let mut chart = BarChart::new(BarChartConfig::default(), vec![BarStack::single(10.0, RED)]).unwrap();
    let replaced = Rc::new(Cell::new(0));
    let count = Rc::clone(&replaced);
    let _sub = chart.transform_property().subscribe(move |_| count.set(count.get() + 1));
    assert!(chart.needs_redraw());
    chart.render();
    assert!(!chart.needs_redraw());

    chart.set_value(0, 0, 10.0).unwrap();
    assert!(!chart.needs_redraw(), "unchanged value is not a change");
    chart.set_value(0, 0, 30.0).unwrap();
    assert!(chart.needs_redraw());
    chart.render();

    chart.set_range(Range::new(0.0, 50.0)).unwrap();
    assert!(chart.needs_redraw());
    assert_eq!(replaced.get(), 1);
    assert_eq!(chart.transform().y_range(), Range::new(0.0, 50.0));
    assert!((chart.segments()[0].rect.height() - 120.0).abs() < 1e-9);
}
