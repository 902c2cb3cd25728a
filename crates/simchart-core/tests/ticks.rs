// File: crates/simchart-core/tests/ticks.rs
// Purpose: Tick mark placement, label formatting/caching and axis lines.

use simchart_core::{
    AxisLine, ChartError, ChartTransform, Orientation, Point, Range, TextAlign, TextBaseline, TickLabelConfig,
    TickLabels, TickMarkConfig, TickMarks,
};

fn transform(x: Range) -> ChartTransform {
    ChartTransform::new(200.0, 100.0, x, Range::new(-5.0, 5.0)).unwrap()
}

#[test]
fn ticks_hang_below_the_panel() {
    let ticks = TickMarks::new(Orientation::Horizontal, 5.0, TickMarkConfig::default()).unwrap();
    let marks = ticks.layout(&transform(Range::new(0.0, 20.0)));
    assert_eq!(marks.len(), 5);
    let five = marks.iter().find(|m| m.value == 5.0).unwrap();
    assert_eq!(five.from, Point::new(50.0, 100.0));
    assert_eq!(five.to, Point::new(50.0, 110.0));
}

#[test]
fn minor_ticks_can_skip_major_positions() {
    let config = TickMarkConfig { skip_multiples_of: Some(10.0), ..TickMarkConfig::default() };
    let ticks = TickMarks::new(Orientation::Horizontal, 5.0, config).unwrap();
    let values: Vec<f64> = ticks.layout(&transform(Range::new(0.0, 20.0))).iter().map(|m| m.value).collect();
    assert_eq!(values, vec![5.0, 15.0]);
}

#[test]
fn skipped_spacing_must_be_a_multiple_of_tick_spacing() {
    let config = TickMarkConfig { skip_multiples_of: Some(7.0), ..TickMarkConfig::default() };
    assert_eq!(
        TickMarks::new(Orientation::Horizontal, 5.0, config).unwrap_err(),
        ChartError::IncompatibleSpacing { major: 7.0, minor: 5.0 }
    );
    let equal = TickMarkConfig { skip_multiples_of: Some(5.0), ..TickMarkConfig::default() };
    assert!(TickMarks::new(Orientation::Horizontal, 5.0, equal).is_err());
}

#[test]
fn zero_spacing_is_rejected() {
    assert_eq!(
        TickMarks::new(Orientation::Vertical, 0.0, TickMarkConfig::default()).unwrap_err(),
        ChartError::InvalidSpacing(0.0)
    );
    assert!(TickLabels::new(Orientation::Vertical, f64::INFINITY, TickLabelConfig::default()).is_err());
}

#[test]
fn labels_are_formatted_and_placed() {
    let mut labels = TickLabels::new(Orientation::Vertical, 2.5, TickLabelConfig {
        decimal_places: 1,
        ..TickLabelConfig::default()
    })
    .unwrap();
    let out = labels.layout(&transform(Range::new(0.0, 20.0)));
    let texts: Vec<&str> = out.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["-5.0", "-2.5", "0.0", "2.5", "5.0"]);
    assert!(out.iter().all(|l| l.align == TextAlign::Right && l.baseline == TextBaseline::Middle));
    assert!(out.iter().all(|l| l.at.x == -12.0));
    assert_eq!(out[2].at.y, 50.0);
}

#[test]
fn negative_zero_is_printed_as_zero() {
    let config = TickLabelConfig { decimal_places: 1, suffix: " s".into(), ..TickLabelConfig::default() };
    assert_eq!(config.format(-0.04), "0.0 s");
    assert_eq!(config.format(-1.26), "-1.3 s");
    assert_eq!(TickLabelConfig::default().format(-0.0), "0");
}

#[test]
fn scrolling_reuses_cached_labels() {
    let mut labels = TickLabels::new(Orientation::Horizontal, 5.0, TickLabelConfig::default()).unwrap();
    labels.layout(&transform(Range::new(0.0, 20.0)));
    assert_eq!(labels.stats().created, 5);

    let out = labels.layout(&transform(Range::new(5.0, 25.0)));
    let stats = labels.stats();
    assert_eq!(stats.reused, 4);
    assert_eq!(stats.created, 6);
    assert_eq!(stats.evicted, 1);
    assert_eq!(labels.cached_len(), 5);
    assert_eq!(out.last().map(|l| l.text.as_str()), Some("25"));
}

#[test]
fn large_positions_keep_their_own_labels() {
    let mut labels = TickLabels::new(Orientation::Horizontal, 1e9, TickLabelConfig::default()).unwrap();
    labels.layout(&transform(Range::new(1.0e10, 1.4e10)));
    let out = labels.layout(&transform(Range::new(1.1e10, 1.5e10)));
    assert_eq!(out.len(), 5);
    for l in &out {
        assert_eq!(l.text, labels.config.format(l.value));
    }
    let stats = labels.stats();
    assert_eq!(stats.reused, 4);
    assert_eq!(stats.evicted, 1);
}

#[test]
fn relayout_is_idempotent() {
    let mut labels = TickLabels::new(Orientation::Horizontal, 2.0, TickLabelConfig::default()).unwrap();
    let t = transform(Range::new(0.3, 17.9));
    let a = labels.layout(&t);
    let b = labels.layout(&t);
    assert_eq!(a, b);
    assert_eq!(labels.stats().reused, a.len());
}

#[test]
fn axis_line_only_when_in_range() {
    let t = transform(Range::new(0.0, 20.0));
    let zero = AxisLine::new(Orientation::Horizontal);
    assert_eq!(zero.segment(&t), Some((Point::new(0.0, 50.0), Point::new(200.0, 50.0))));
    assert_eq!(AxisLine::new(Orientation::Horizontal).at(10.0).segment(&t), None);
    let vertical = AxisLine::new(Orientation::Vertical).at(10.0);
    assert_eq!(vertical.segment(&t), Some((Point::new(100.0, 0.0), Point::new(100.0, 100.0))));
}
