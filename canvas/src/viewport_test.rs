#![allow(clippy::float_cmp)]

use super::*;
use crate::camera::Point;
use crate::doc::{RoughOptions, ShapeKind, Style};

fn rect(x: f64, y: f64, w: f64, h: f64) -> ShapeElement {
    ShapeElement::new(ShapeKind::Rectangle { rough: RoughOptions::default() }, Rect::new(x, y, w, h), Style::default())
}

fn arrow(from: Point, to: Point) -> CurveElement {
    let mut a = CurveElement::new(from, Style::default());
    a.points[1] = to;
    a
}

// =============================================================
// Viewport::from_camera
// =============================================================

#[test]
fn identity_camera_viewport_is_window_plus_buffer() {
    let vp = Viewport::from_camera(&Camera::default(), 800.0, 600.0, 200.0);
    assert_eq!(vp, Viewport { x: -200.0, y: -200.0, width: 1200.0, height: 1000.0 });
    assert_eq!(vp.rect(), Rect::new(-200.0, -200.0, 1200.0, 1000.0));
}

#[test]
fn pan_and_zoom_shift_and_shrink_viewport() {
    let cam = Camera { pan_x: -400.0, pan_y: 100.0, zoom: 2.0 };
    let vp = Viewport::from_camera(&cam, 800.0, 600.0, 200.0);
    assert_eq!(vp, Viewport { x: 100.0, y: -150.0, width: 600.0, height: 500.0 });
}

// =============================================================
// Filtering
// =============================================================

#[test]
fn shapes_outside_buffer_are_excluded() {
    let mut store = ElementStore::new();
    let outside = rect(-300.0, 0.0, 50.0, 50.0);
    let inside = rect(-150.0, 0.0, 50.0, 50.0);
    store.upsert_shape(outside.clone());
    store.upsert_shape(inside.clone());

    let vp = Viewport::from_camera(&Camera::default(), 800.0, 600.0, 200.0);
    let visible: Vec<&str> = visible_shapes(&store, &vp).iter().map(|s| s.id.as_str()).collect();

    assert_eq!(visible, vec![inside.id.as_str()]);
}

#[test]
fn shape_straddling_edge_is_included() {
    let mut store = ElementStore::new();
    store.upsert_shape(rect(990.0, 780.0, 50.0, 50.0));
    let vp = Viewport::from_camera(&Camera::default(), 800.0, 600.0, 200.0);
    assert_eq!(visible_shapes(&store, &vp).len(), 1);
}

#[test]
fn arrows_are_filtered_by_point_bounds() {
    let mut store = ElementStore::new();
    let crossing = arrow(Point::new(-5000.0, 100.0), Point::new(5000.0, 100.0));
    let far = arrow(Point::new(5000.0, 5000.0), Point::new(6000.0, 6000.0));
    let mut malformed = arrow(Point::new(10.0, 10.0), Point::new(20.0, 20.0));
    malformed.points.truncate(1);
    store.upsert_arrow(crossing.clone());
    store.upsert_arrow(far);
    store.upsert_arrow(malformed);

    let vp = Viewport::from_camera(&Camera::default(), 800.0, 600.0, 200.0);
    let visible: Vec<&str> = visible_arrows(&store, &vp).iter().map(|a| a.id.as_str()).collect();

    assert_eq!(visible, vec![crossing.id.as_str()]);
}
