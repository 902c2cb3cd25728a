// File: crates/simchart-core/tests/cursor.rs
// Purpose: Cursor visibility rules, clamping and drag lifecycle.

use std::cell::RefCell;
use std::rc::Rc;

use simchart_core::{
    ChartCursor, ChartError, ChartTransform, CursorEvent, CursorState, DataPoint, DataSeries, Point, Range,
    SeriesStyle, SharedCursor, SharedSeries, Subscription, TransformProperty,
};

fn property(x: Range) -> TransformProperty {
    TransformProperty::new(ChartTransform::new(100.0, 50.0, x, Range::new(0.0, 1.0)).unwrap())
}

fn series(xs: &[f64]) -> SharedSeries {
    DataSeries::with_points(xs.iter().map(|&x| DataPoint::new(x, 0.5)), SeriesStyle::default()).shared()
}

fn events(cursor: &SharedCursor) -> (Rc<RefCell<Vec<CursorEvent>>>, Subscription) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = Rc::clone(&log);
    let sub = cursor.borrow().subscribe(move |e| l.borrow_mut().push(*e));
    (log, sub)
}

#[test]
fn hidden_without_data() {
    let prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    cursor.borrow_mut().set_value(5.0);
    assert_eq!(cursor.borrow().state(), CursorState::Hidden);
    assert_eq!(cursor.borrow().view_x(), None);
    assert_eq!(cursor.borrow_mut().start_drag(), Err(ChartError::NoData));
}

#[test]
fn attaching_data_clamps_and_shows() {
    let prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    let (log, _events) = events(&cursor);
    let data = series(&[2.0, 5.0, 8.0]);
    let _attached = ChartCursor::attach_series(&cursor, &data.borrow());

    assert_eq!(cursor.borrow().value(), 2.0);
    assert!(cursor.borrow().is_visible());
    assert_eq!(*log.borrow(), vec![CursorEvent::Moved(2.0), CursorEvent::Shown]);

    cursor.borrow_mut().set_value(9.5);
    assert_eq!(cursor.borrow().value(), 8.0);
    assert_eq!(cursor.borrow().view_x(), Some(80.0));
}

#[test]
fn visibility_follows_the_viewable_range() {
    let mut prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    let _track = ChartCursor::track_transform(&cursor, &prop);
    let data = series(&[1.0, 6.0]);
    let _attached = ChartCursor::attach_series(&cursor, &data.borrow());
    cursor.borrow_mut().set_value(6.0);
    assert!(cursor.borrow().is_visible());

    prop.set_x_range(Range::new(20.0, 30.0)).unwrap();
    assert_eq!(cursor.borrow().state(), CursorState::Hidden);
    assert_eq!(cursor.borrow().value(), 6.0);

    prop.set_x_range(Range::new(5.0, 15.0)).unwrap();
    assert!(cursor.borrow().is_visible());
}

#[test]
fn override_wins_over_data_rule() {
    let prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    cursor.borrow_mut().set_visibility_override(Some(true));
    assert!(cursor.borrow().is_visible());
    cursor.borrow_mut().set_visibility_override(Some(false));
    assert!(!cursor.borrow().is_visible());
    cursor.borrow_mut().set_visibility_override(None);
    assert!(!cursor.borrow().is_visible());
}

#[test]
fn drag_clamps_to_recorded_data() {
    let prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    let data = series(&[2.0, 8.0]);
    let _attached = ChartCursor::attach_series(&cursor, &data.borrow());

    let mut c = cursor.borrow_mut();
    c.drag_to(50.0);
    assert_eq!(c.value(), 2.0, "moves only while dragging");
    c.start_drag().unwrap();
    assert!(c.is_dragging());
    c.drag_to(50.0);
    assert_eq!(c.value(), 5.0);
    c.drag_to(100.0);
    assert_eq!(c.value(), 8.0);
    c.end_drag();
    assert_eq!(c.state(), CursorState::Visible);
}

#[test]
fn hiding_mid_drag_interrupts_it() {
    let mut prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    let _track = ChartCursor::track_transform(&cursor, &prop);
    let data = series(&[2.0, 8.0]);
    let _attached = ChartCursor::attach_series(&cursor, &data.borrow());
    cursor.borrow_mut().start_drag().unwrap();
    let (log, _events) = events(&cursor);

    prop.set_x_range(Range::new(50.0, 60.0)).unwrap();
    assert_eq!(cursor.borrow().state(), CursorState::Hidden);
    assert_eq!(*log.borrow(), vec![CursorEvent::DragInterrupted, CursorEvent::Hidden]);

    cursor.borrow_mut().end_drag();
    assert_eq!(log.borrow().len(), 2);
    assert_eq!(cursor.borrow_mut().start_drag(), Err(ChartError::CursorHidden));
}

#[test]
fn shrinking_data_reclamps_value() {
    let prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    let data = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let _attached = ChartCursor::attach_series(&cursor, &data.borrow());
    assert_eq!(cursor.borrow().value(), 1.0);

    data.borrow_mut().remove_before(3.0);
    assert_eq!(cursor.borrow().recorded_extent(), Some(Range::new(3.0, 5.0)));
    assert_eq!(cursor.borrow().value(), 3.0);

    data.borrow_mut().push((9.0, 0.0));
    cursor.borrow_mut().set_value(9.0);
    assert_eq!(cursor.borrow().value(), 9.0);
}

#[test]
fn recorded_extent_spans_all_series() {
    let prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    let a = series(&[1.0, 4.0]);
    let b = series(&[3.0, 7.0]);
    let _a = ChartCursor::attach_series(&cursor, &a.borrow());
    let sub_b = ChartCursor::attach_series(&cursor, &b.borrow());
    assert_eq!(cursor.borrow().recorded_extent(), Some(Range::new(1.0, 7.0)));

    drop(sub_b);
    assert_eq!(cursor.borrow().recorded_extent(), Some(Range::new(1.0, 4.0)));
    assert_eq!(b.borrow().listener_count(), 0);
}

#[test]
fn hit_test_uses_dilated_body() {
    let prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    let data = series(&[0.0, 10.0]);
    let _attached = ChartCursor::attach_series(&cursor, &data.borrow());
    cursor.borrow_mut().set_value(5.0);
    let c = cursor.borrow();
    // Body is 10px wide plus 6px dilation on each side.
    assert!(c.hit_test(Point::new(61.0, 25.0)));
    assert!(!c.hit_test(Point::new(62.0, 25.0)));
    assert!(!c.hit_test(Point::new(50.0, 60.0)));
}

#[test]
fn listeners_can_read_the_cursor() {
    let mut prop = property(Range::new(0.0, 10.0));
    let cursor = ChartCursor::new(prop.get()).shared();
    let _track = ChartCursor::track_transform(&cursor, &prop);
    let data = series(&[]);
    let _attached = ChartCursor::attach_series(&cursor, &data.borrow());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let weak = Rc::downgrade(&cursor);
    let log = Rc::clone(&seen);
    let _sub = cursor.borrow().subscribe(move |e| {
        if let Some(c) = weak.upgrade() {
            log.borrow_mut().push((*e, c.borrow().view_x()));
        }
    });

    data.borrow_mut().push((4.0, 1.0));
    assert_eq!(*seen.borrow(), vec![(CursorEvent::Moved(4.0), Some(40.0)), (CursorEvent::Shown, Some(40.0))]);

    seen.borrow_mut().clear();
    prop.set_ranges(Range::new(5.0, 15.0), Range::new(0.0, 1.0)).unwrap();
    assert_eq!(*seen.borrow(), vec![(CursorEvent::Hidden, None)]);

    seen.borrow_mut().clear();
    prop.set_ranges(Range::new(0.0, 20.0), Range::new(0.0, 1.0)).unwrap();
    data.borrow_mut().push((8.0, 1.0));
    ChartCursor::update(&cursor, |c| c.set_value(6.0));
    assert_eq!(*seen.borrow(), vec![(CursorEvent::Shown, Some(20.0)), (CursorEvent::Moved(6.0), Some(30.0))]);
}
