#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn square(size: f64) -> Vec<Point> {
    vec![pt(0.0, 0.0), pt(size, 0.0), pt(size, size), pt(0.0, size)]
}

// =============================================================
// point_in_polygon
// =============================================================

#[test]
fn square_contains_center() {
    assert!(point_in_polygon(pt(5.0, 5.0), &square(10.0)));
}

#[test]
fn square_excludes_point_to_the_right() {
    assert!(!point_in_polygon(pt(15.0, 5.0), &square(10.0)));
}

#[test]
fn square_excludes_point_above() {
    assert!(!point_in_polygon(pt(5.0, -0.5), &square(10.0)));
}

#[test]
fn concave_polygon_excludes_notch() {
    // U shape opening upward; (5, 2) sits inside the notch.
    let u = vec![
        pt(0.0, 0.0),
        pt(3.0, 0.0),
        pt(3.0, 6.0),
        pt(7.0, 6.0),
        pt(7.0, 0.0),
        pt(10.0, 0.0),
        pt(10.0, 10.0),
        pt(0.0, 10.0),
    ];
    assert!(!point_in_polygon(pt(5.0, 2.0), &u));
    assert!(point_in_polygon(pt(5.0, 8.0), &u));
    assert!(point_in_polygon(pt(1.0, 2.0), &u));
}

#[test]
fn rotated_square_uses_outline_not_bbox() {
    // Diamond inscribed in (0,0)-(10,10); the bbox corner is outside it.
    let diamond = vec![pt(5.0, 0.0), pt(10.0, 5.0), pt(5.0, 10.0), pt(0.0, 5.0)];
    assert!(point_in_polygon(pt(5.0, 5.0), &diamond));
    assert!(!point_in_polygon(pt(0.5, 0.5), &diamond));
}

#[test]
fn degenerate_polygons_contain_nothing() {
    assert!(!point_in_polygon(pt(0.0, 0.0), &[]));
    assert!(!point_in_polygon(pt(0.0, 0.0), &[pt(0.0, 0.0), pt(1.0, 1.0)]));
}

// =============================================================
// point_near_rect
// =============================================================

#[test]
fn near_rect_accepts_points_within_margin() {
    let r = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert!(point_near_rect(pt(-9.0, 25.0), &r, 10.0));
    assert!(point_near_rect(pt(110.0, 60.0), &r, 10.0));
}

#[test]
fn near_rect_rejects_points_beyond_margin() {
    let r = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert!(!point_near_rect(pt(-10.5, 25.0), &r, 10.0));
    assert!(!point_near_rect(pt(50.0, 61.0), &r, 10.0));
}

// =============================================================
// closest_point
// =============================================================

#[test]
fn closest_point_picks_nearest_corner() {
    let corners = [pt(50.0, 50.0), pt(51.0, 50.0), pt(51.0, 51.0), pt(50.0, 51.0)];
    assert_eq!(closest_point(pt(100.0, 100.0), &corners), Some(pt(51.0, 51.0)));
}

#[test]
fn closest_point_breaks_ties_by_first_occurrence() {
    let candidates = [pt(-1.0, 0.0), pt(1.0, 0.0)];
    assert_eq!(closest_point(pt(0.0, 0.0), &candidates), Some(pt(-1.0, 0.0)));
}

#[test]
fn closest_point_of_empty_set_is_none() {
    assert_eq!(closest_point(pt(0.0, 0.0), &[]), None);
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_from_corners_normalizes_direction() {
    let r = Rect::from_corners(pt(10.0, 20.0), pt(-5.0, 5.0));
    assert_eq!(r, Rect::new(-5.0, 5.0, 15.0, 15.0));
}

#[test]
fn rect_from_points_spans_all() {
    let r = Rect::from_points(&[pt(3.0, 4.0), pt(-1.0, 8.0), pt(2.0, -2.0)]);
    assert_eq!(r, Some(Rect::new(-1.0, -2.0, 4.0, 10.0)));
    assert_eq!(Rect::from_points(&[]), None);
}

#[test]
fn rect_intersects_is_symmetric_and_edge_inclusive() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 5.0, 10.0, 10.0);
    let c = Rect::new(10.5, 0.0, 1.0, 1.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
    assert!(!a.intersects(&c));
}

// =============================================================
// Distances and transforms
// =============================================================

#[test]
fn distance_to_segment_projects_inside_and_clamps_outside() {
    let (a, b) = (pt(0.0, 0.0), pt(10.0, 0.0));
    assert_eq!(distance_to_segment(pt(5.0, 3.0), a, b), 3.0);
    assert_eq!(distance_to_segment(pt(13.0, 4.0), a, b), 5.0);
    assert_eq!(distance_to_segment(pt(3.0, 4.0), a, a), 5.0);
}

#[test]
fn translate_points_moves_every_point() {
    let mut pts = square(1.0);
    translate_points(&mut pts, 50.0, 50.0);
    assert_eq!(pts, vec![pt(50.0, 50.0), pt(51.0, 50.0), pt(51.0, 51.0), pt(50.0, 51.0)]);
}

#[test]
fn rotate_about_quarter_turn() {
    let p = rotate_about(pt(10.0, 0.0), pt(0.0, 0.0), 90.0);
    assert!((p.x - 0.0).abs() < 1e-9);
    assert!((p.y - 10.0).abs() < 1e-9);
}
