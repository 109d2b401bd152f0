//! Viewport virtualization: which elements are worth handing to the renderer.
//!
//! The visible world rectangle is the window plus a fixed screen-space
//! buffer on every side, mapped through the camera. Elements are kept when
//! their bounding box overlaps it; no exact clipping is attempted. The
//! engine recomputes the rectangle only when the camera or window changes.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::camera::Camera;
use crate::doc::{CurveElement, ElementStore, ShapeElement};
use crate::geometry::Rect;

/// Visible region in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Visible rectangle for a window of `window_w` x `window_h` CSS pixels
    /// with `buffer` extra pixels on each side.
    #[must_use]
    pub fn from_camera(camera: &Camera, window_w: f64, window_h: f64, buffer: f64) -> Self {
        Self {
            x: (-camera.pan_x - buffer) / camera.zoom,
            y: (-camera.pan_y - buffer) / camera.zoom,
            width: (window_w + 2.0 * buffer) / camera.zoom,
            height: (window_h + 2.0 * buffer) / camera.zoom,
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Whether a world-space box overlaps the viewport.
    #[must_use]
    pub fn overlaps(&self, bounds: &Rect) -> bool {
        self.rect().intersects(bounds)
    }
}

/// Shapes whose bounds overlap the viewport, in store order.
#[must_use]
pub fn visible_shapes<'a>(store: &'a ElementStore, viewport: &Viewport) -> Vec<&'a ShapeElement> {
    store
        .list_shapes()
        .iter()
        .filter(|s| viewport.overlaps(&s.bounds()))
        .collect()
}

/// Well-formed arrows whose bounds overlap the viewport, in store order.
#[must_use]
pub fn visible_arrows<'a>(store: &'a ElementStore, viewport: &Viewport) -> Vec<&'a CurveElement> {
    store
        .list_arrows()
        .iter()
        .filter(|a| a.points.len() >= 2 && a.bounds().is_some_and(|b| viewport.overlaps(&b)))
        .collect()
}
