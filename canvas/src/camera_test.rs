#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_offset_shifts_both_axes() {
    let p = Point::new(3.0, 4.0).offset(-1.0, 6.0);
    assert_eq!(p, Point::new(2.0, 10.0));
}

#[test]
fn point_serializes_as_xy_object() {
    let json = serde_json::to_value(Point::new(1.5, -2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": -2.0 }));
}

// =============================================================
// Camera: construction
// =============================================================

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn camera_from_offset_round_trips_offset() {
    let cam = Camera::from_offset(Point::new(-40.0, 12.0), 1.25);
    assert_eq!(cam.offset(), Point::new(-40.0, 12.0));
    assert_eq!(cam.zoom, 1.25);
}

// =============================================================
// screen_to_world / world_to_screen
// =============================================================

#[test]
fn screen_to_world_divides_out_zoom_after_pan() {
    let cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(60.0, 50.0));
    assert!(point_approx_eq(world, Point::new(20.0, 20.0)));
}

#[test]
fn screen_origin_maps_to_negative_pan_over_zoom() {
    let cam = Camera { pan_x: 50.0, pan_y: 30.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(0.0, 0.0));
    assert!(point_approx_eq(world, Point::new(-25.0, -15.0)));
}

#[test]
fn world_to_screen_scales_then_pans() {
    let cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 3.0 };
    let screen = cam.world_to_screen(Point::new(5.0, 5.0));
    assert!(point_approx_eq(screen, Point::new(35.0, 25.0)));
}

#[test]
fn transform_inverse_law_holds_across_cameras() {
    let cameras = [
        Camera::default(),
        Camera { pan_x: 50.0, pan_y: -30.0, zoom: 2.0 },
        Camera { pan_x: 13.7, pan_y: -42.3, zoom: 0.5 },
        Camera { pan_x: -800.0, pan_y: 1200.0, zoom: 3.0 },
    ];
    let screens = [Point::new(0.0, 0.0), Point::new(400.0, 300.0), Point::new(-12.5, 999.25)];
    for cam in cameras {
        for screen in screens {
            let back = cam.world_to_screen(cam.screen_to_world(screen));
            assert!(point_approx_eq(screen, back), "{cam:?} {screen:?} -> {back:?}");
        }
    }
}

#[test]
fn screen_dist_to_world_ignores_pan() {
    let cam = Camera { pan_x: 999.0, pan_y: -999.0, zoom: 0.5 };
    assert!(approx_eq(cam.screen_dist_to_world(10.0), 20.0));
}

// =============================================================
// pan_by / zoom_at
// =============================================================

#[test]
fn pan_by_accumulates() {
    let mut cam = Camera::default();
    cam.pan_by(10.0, -5.0);
    cam.pan_by(2.5, 1.0);
    assert_eq!(cam.offset(), Point::new(12.5, -4.0));
}

#[test]
fn zoom_at_keeps_anchor_world_point_fixed() {
    let mut cam = Camera { pan_x: 30.0, pan_y: -10.0, zoom: 1.0 };
    let anchor = Point::new(200.0, 150.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 2.0, 0.5, 3.0);
    assert_eq!(cam.zoom, 2.0);
    assert!(point_approx_eq(cam.screen_to_world(anchor), before));
}

#[test]
fn zoom_at_clamps_to_bounds() {
    let mut cam = Camera::default();
    cam.zoom_at(Point::new(0.0, 0.0), 10.0, 0.5, 3.0);
    assert_eq!(cam.zoom, 3.0);
    cam.zoom_at(Point::new(0.0, 0.0), 0.01, 0.5, 3.0);
    assert_eq!(cam.zoom, 0.5);
}
