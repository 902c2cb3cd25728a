// File: crates/simchart-core/tests/spacing_grid.rs
// Purpose: Spacing validation and grid line layout (major/minor, anchoring, idempotence).

use simchart_core::{AxisSpacing, ChartError, ChartTransform, GridLines, LineSpacing, Orientation, Range, Scene};

#[test]
fn major_must_be_integer_multiple_of_minor() {
    assert!(matches!(
        LineSpacing::new(Some(5.0), Some(3.0)),
        Err(ChartError::IncompatibleSpacing { .. })
    ));
    assert!(LineSpacing::new(Some(10.0), Some(5.0)).is_ok());
    assert!(LineSpacing::new(Some(1.0), Some(0.1)).is_ok());
    assert!(matches!(LineSpacing::new(Some(2.0), Some(4.0)), Err(ChartError::IncompatibleSpacing { .. })));
}

#[test]
fn spacing_must_be_present_and_positive() {
    assert_eq!(LineSpacing::new(None, None), Err(ChartError::MissingSpacing));
    assert_eq!(LineSpacing::new(Some(0.0), None), Err(ChartError::InvalidSpacing(0.0)));
    assert_eq!(LineSpacing::new(None, Some(-2.0)), Err(ChartError::InvalidSpacing(-2.0)));
}

fn transform() -> ChartTransform {
    ChartTransform::new(200.0, 100.0, Range::new(0.0, 20.0), Range::new(-5.0, 5.0)).unwrap()
}

#[test]
fn minor_lines_skip_major_positions() {
    let grid = GridLines::new(AxisSpacing::new(LineSpacing::new(Some(10.0), Some(5.0)).ok(), None));
    let set = grid.layout(&transform());
    assert_eq!(set.values(Orientation::Horizontal, true), vec![0.0, 10.0, 20.0]);
    assert_eq!(set.values(Orientation::Horizontal, false), vec![5.0, 15.0]);
    assert!(set.values(Orientation::Vertical, true).is_empty());
}

#[test]
fn grid_lines_span_the_panel() {
    let grid = GridLines::new(AxisSpacing::new(None, LineSpacing::major_only(5.0).ok()));
    let set = grid.layout(&transform());
    assert_eq!(set.major.len(), 3);
    let zero = set.major.iter().find(|l| l.value == 0.0).expect("y = 0 line");
    assert_eq!(zero.from.y, 50.0);
    assert_eq!(zero.from.x, 0.0);
    assert_eq!(zero.to.x, 200.0);
}

#[test]
fn anchor_shifts_lines() {
    let grid = GridLines::new(AxisSpacing::new(LineSpacing::major_only(4.0).ok(), None)).with_anchor(1.0, 0.0);
    let set = grid.layout(&transform());
    assert_eq!(set.values(Orientation::Horizontal, true), vec![1.0, 5.0, 9.0, 13.0, 17.0]);
}

#[test]
fn redraw_is_idempotent() {
    let grid = GridLines::new(AxisSpacing::new(
        LineSpacing::new(Some(2.0), Some(0.5)).ok(),
        LineSpacing::new(Some(1.0), Some(0.25)).ok(),
    ));
    let t = ChartTransform::new(313.0, 177.0, Range::new(0.1 * 3.0, 17.3), Range::new(-4.4, 3.3)).unwrap();
    let a = grid.layout(&t);
    let b = grid.layout(&t);
    assert_eq!(a, b);

    let mut s1 = Scene::new(313.0, 177.0);
    let mut s2 = Scene::new(313.0, 177.0);
    grid.draw(&t, &mut s1);
    grid.draw(&t, &mut s2);
    assert_eq!(s1, s2);
    assert_eq!(s1.len(), a.len());
}
