// File: crates/simchart-core/tests/transform.rs
// Purpose: Model/view mapping, line-position enumeration and single-notification range updates.

use std::cell::Cell;
use std::rc::Rc;

use simchart_core::{line_positions, ChartError, ChartTransform, Orientation, Range, TransformProperty};

fn transform() -> ChartTransform {
    ChartTransform::new(400.0, 200.0, Range::new(-3.5, 12.25), Range::new(-1.0, 4.0)).expect("valid transform")
}

#[test]
fn round_trip_is_identity() {
    let t = transform();
    for &v in &[-3.5, -1.0, 0.0, 0.1, 3.333_333, 12.25, 1e6, -7.7e3] {
        for o in [Orientation::Horizontal, Orientation::Vertical] {
            let back = t.view_to_model(o, t.model_to_view(o, v));
            assert!((back - v).abs() <= 1e-9 * v.abs().max(1.0), "{o:?} {v} -> {back}");
        }
    }
}

#[test]
fn vertical_axis_is_inverted() {
    let t = transform();
    assert_eq!(t.model_to_view(Orientation::Vertical, -1.0), 200.0);
    assert_eq!(t.model_to_view(Orientation::Vertical, 4.0), 0.0);
    assert_eq!(t.model_to_view(Orientation::Horizontal, -3.5), 0.0);
    assert_eq!(t.model_to_view(Orientation::Horizontal, 12.25), 400.0);
}

#[test]
fn zero_span_is_rejected() {
    let err = ChartTransform::new(100.0, 100.0, Range::new(2.0, 2.0), Range::new(0.0, 1.0)).unwrap_err();
    assert!(matches!(err, ChartError::NonInvertible { orientation: Orientation::Horizontal, .. }));
    let err = ChartTransform::new(0.0, 100.0, Range::new(0.0, 1.0), Range::new(0.0, 1.0)).unwrap_err();
    assert!(matches!(err, ChartError::InvalidViewSize { .. }));
}

#[test]
fn anchored_positions_include_anchor_grid() {
    assert_eq!(line_positions(50.0, 200.0, 30.0, 100.0, 10), vec![70.0, 100.0, 130.0, 160.0, 190.0]);
}

#[test]
fn negative_range_includes_both_edges() {
    let v = line_positions(-100.0, 100.0, 10.0, 0.0, 10);
    assert_eq!(v.len(), 21);
    assert_eq!(v.first(), Some(&-100.0));
    assert_eq!(v.last(), Some(&100.0));
    assert!(v.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn accumulated_drift_does_not_drop_lines() {
    // 0.1 added thirty times is 3.0000000000000013, not 3.
    let min = (0..30).fold(0.0, |acc, _| acc + 0.1);
    let v = line_positions(min, min + 2.0, 0.5, 0.0, 10);
    assert_eq!(v, vec![3.0, 3.5, 4.0, 4.5, 5.0]);
}

#[test]
fn spacing_below_float_resolution_does_not_repeat_lines() {
    // Doubles near 1e17 are 16 apart, so unit spacing collapses onto them.
    let v = line_positions(1e17, 1e17 + 64.0, 1.0, 0.0, 10);
    assert!(!v.is_empty());
    assert!(v.len() <= 5, "{v:?}");
    assert!(v.windows(2).all(|w| w[0] < w[1]), "{v:?}");
}

#[test]
fn transform_positions_use_model_range() {
    let t = ChartTransform::new(300.0, 100.0, Range::new(50.0, 200.0), Range::new(0.0, 1.0)).unwrap();
    assert_eq!(t.compute_line_positions(Orientation::Horizontal, 30.0, 100.0), vec![70.0, 100.0, 130.0, 160.0, 190.0]);
}

#[test]
fn invalid_spacing_yields_no_positions() {
    assert!(line_positions(0.0, 10.0, 0.0, 0.0, 10).is_empty());
    assert!(line_positions(0.0, 10.0, -1.0, 0.0, 10).is_empty());
    assert!(line_positions(0.0, 10.0, f64::NAN, 0.0, 10).is_empty());
}

#[test]
fn set_ranges_notifies_once() {
    let mut prop = TransformProperty::new(transform());
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let _sub = prop.subscribe(move |_| h.set(h.get() + 1));

    prop.set_ranges(Range::new(0.0, 5.0), Range::new(0.0, 5.0)).unwrap();
    assert_eq!(hits.get(), 1);

    // Unchanged ranges are not a change.
    prop.set_ranges(Range::new(0.0, 5.0), Range::new(0.0, 5.0)).unwrap();
    assert_eq!(hits.get(), 1);

    // Rejected updates leave the transform untouched and silent.
    assert!(prop.set_x_range(Range::new(1.0, 1.0)).is_err());
    assert_eq!(hits.get(), 1);
    assert_eq!(prop.get().x_range(), Range::new(0.0, 5.0));
}

#[test]
fn transforms_are_replaced_not_mutated() {
    let mut prop = TransformProperty::new(transform());
    let before = prop.get();
    prop.set_y_range(Range::new(-10.0, 10.0)).unwrap();
    assert_eq!(before.y_range(), Range::new(-1.0, 4.0));
    assert_eq!(prop.get().y_range(), Range::new(-10.0, 10.0));
}
