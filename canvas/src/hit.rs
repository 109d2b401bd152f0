#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::binding::{self, ArrowEnd};
use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{ElementId, ElementStore};
use crate::geometry;

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ArrowEndpoint(ArrowEnd),
    ArrowBody,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: ElementId,
    pub part: HitPart,
}

/// Find the element under `world_pt` for the select tool.
///
/// Endpoint handles of selected arrows win, then shapes from the top of the
/// draw order down, then arrow bodies. `margin_px` is the grab tolerance in
/// screen pixels.
#[must_use]
pub fn hit_test(
    world_pt: Point,
    store: &ElementStore,
    camera: &Camera,
    selected_ids: &[ElementId],
    margin_px: f64,
) -> Option<Hit> {
    let handle = camera.screen_dist_to_world(HANDLE_RADIUS_PX);
    let margin = camera.screen_dist_to_world(margin_px);

    for id in selected_ids {
        let Some(arrow) = store.arrow(id) else { continue };
        for end in [ArrowEnd::End, ArrowEnd::Start] {
            if binding::endpoint(arrow, end).is_some_and(|p| geometry::distance(p, world_pt) <= handle) {
                return Some(Hit { id: arrow.id.clone(), part: HitPart::ArrowEndpoint(end) });
            }
        }
    }

    let shape = store
        .list_shapes()
        .iter()
        .rev()
        .find(|s| s.contains(world_pt) || geometry::point_near_rect(world_pt, &s.bounds(), margin));
    if let Some(shape) = shape {
        return Some(Hit { id: shape.id.clone(), part: HitPart::Body });
    }

    store
        .list_arrows()
        .iter()
        .rev()
        .find(|a| a.endpoints().is_some_and(|(s, e)| geometry::distance_to_segment(world_pt, s, e) <= margin))
        .map(|a| Hit { id: a.id.clone(), part: HitPart::ArrowBody })
}
