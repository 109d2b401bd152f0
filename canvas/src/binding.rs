//! Arrow binding: drafting new arrows, binding their endpoints to hovered
//! shapes, and keeping bound endpoints attached when shapes move.
//!
//! An arrow is drafted in three steps. [`begin_draft`] creates a zero-length
//! arrow at the pointer and binds its start to whatever is hovered there.
//! [`extend_draft`] drags the free end, and [`finish_draft`] binds the end
//! to the hovered element at release, provided it is not the start element.
//!
//! Moving shapes calls [`reanchor`]: every bound endpoint snaps to the
//! corner of its shape's outline nearest the arrow's other end, so arrows
//! rubber-band around shapes rather than holding a fixed offset.
//!
//! Nothing here fails. Malformed arrows (fewer than two points) are logged
//! and skipped.

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use tracing::warn;

use crate::camera::Point;
use crate::doc::{CurveElement, ElementId, ElementStore, Style};
use crate::geometry;
use crate::hover::HoverState;

/// Which end of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowEnd {
    Start,
    End,
}

impl ArrowEnd {
    fn index(self) -> usize {
        match self {
            Self::Start => 0,
            Self::End => 1,
        }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// How an arrow endpoint relates to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Not bound to anything.
    Free,
    /// Bound to a shape that exists.
    Attached,
    /// Bound to an id with no matching shape; drawn at the stored point.
    Dangling,
}

/// Start a new arrow at `world`, binding its start to the hovered element
/// under the pointer if there is one.
#[must_use]
pub fn begin_draft(world: Point, hover: &HoverState, style: &Style) -> CurveElement {
    let mut draft = CurveElement::new(world, style.clone());
    if let Some(item) = hover.under(world) {
        draft.binding.start_id = Some(item.id.clone());
        draft.binding.start_type = Some(item.kind);
    }
    draft
}

/// Move the draft's free end to `world`. The start binding is untouched.
pub fn extend_draft(draft: &mut CurveElement, world: Point) {
    set_point(draft, ArrowEnd::End, world);
}

/// Finish a draft released at `world`.
///
/// The end binds to the hovered element under the release point when it
/// differs from the start element; otherwise the end stays free.
#[must_use]
pub fn finish_draft(mut draft: CurveElement, world: Point, hover: &HoverState) -> CurveElement {
    set_point(&mut draft, ArrowEnd::End, world);
    match hover.under(world) {
        Some(item) if draft.binding.start_id.as_deref() != Some(item.id.as_str()) => {
            draft.binding.end_id = Some(item.id.clone());
            draft.binding.end_type = Some(item.kind);
        }
        _ => {
            draft.binding.end_id = None;
            draft.binding.end_type = None;
        }
    }
    draft
}

/// Re-anchor every arrow bound to one of `moved` shapes.
///
/// Each bound endpoint becomes the outline point of its shape closest to the
/// arrow's opposite endpoint. When both ends moved, the start is resolved
/// first and the end is resolved against the new start. Endpoints bound to
/// shapes missing from the store keep their stored coordinates.
///
/// Returns the ids of arrows whose points changed.
pub fn reanchor(store: &mut ElementStore, moved: &[ElementId]) -> Vec<ElementId> {
    let mut updates: Vec<(ElementId, Vec<Point>)> = Vec::new();
    for arrow in store.list_arrows() {
        let start_moved = arrow.binding.start_id.as_ref().is_some_and(|id| moved.contains(id));
        let end_moved = arrow.binding.end_id.as_ref().is_some_and(|id| moved.contains(id));
        if !start_moved && !end_moved {
            continue;
        }
        let Some((mut start, mut end)) = arrow.endpoints() else {
            warn!(arrow_id = %arrow.id, points = arrow.points.len(), "cannot re-anchor malformed arrow");
            continue;
        };
        if start_moved {
            if let Some(p) = anchor_on(store, arrow.binding.start_id.as_deref(), end) {
                start = p;
            }
        }
        if end_moved {
            if let Some(p) = anchor_on(store, arrow.binding.end_id.as_deref(), start) {
                end = p;
            }
        }
        let mut points = arrow.points.clone();
        points[0] = start;
        points[1] = end;
        if points != arrow.points {
            updates.push((arrow.id.clone(), points));
        }
    }

    let mut changed = Vec::with_capacity(updates.len());
    for (id, points) in updates {
        if store.update_arrow(&id, |arrow| arrow.points = points) {
            changed.push(id);
        }
    }
    changed
}

fn anchor_on(store: &ElementStore, shape_id: Option<&str>, toward: Point) -> Option<Point> {
    let shape = store.shape(shape_id?)?;
    geometry::closest_point(toward, &shape.points)
}

/// Move one endpoint of a stored arrow while its handle is dragged.
///
/// The binding is left alone until the drag ends. Returns false if the arrow
/// doesn't exist or is malformed.
pub fn drag_endpoint(store: &mut ElementStore, arrow_id: &str, end: ArrowEnd, world: Point) -> bool {
    let mut moved = false;
    let found = store.update_arrow(arrow_id, |arrow| moved = set_point(arrow, end, world));
    found && moved
}

/// Finish dragging an endpoint handle at `world`.
///
/// The endpoint's binding is replaced with whatever is hovered under the
/// drop point, or cleared when nothing is. An arrow is never bound to the
/// same element at both ends.
pub fn rebind_endpoint(store: &mut ElementStore, arrow_id: &str, end: ArrowEnd, world: Point, hover: &HoverState) -> bool {
    store.update_arrow(arrow_id, |arrow| {
        set_point(arrow, end, world);
        let other_id = match end {
            ArrowEnd::Start => arrow.binding.end_id.clone(),
            ArrowEnd::End => arrow.binding.start_id.clone(),
        };
        let target = hover
            .under(world)
            .filter(|item| other_id.as_deref() != Some(item.id.as_str()))
            .map(|item| (item.id.clone(), item.kind));
        let (id, kind) = target.unzip();
        match end {
            ArrowEnd::Start => {
                arrow.binding.start_id = id;
                arrow.binding.start_type = kind;
            }
            ArrowEnd::End => {
                arrow.binding.end_id = id;
                arrow.binding.end_type = kind;
            }
        }
    })
}

/// Whether an arrow endpoint is free, attached, or dangling.
#[must_use]
pub fn attachment(arrow: &CurveElement, end: ArrowEnd, store: &ElementStore) -> Attachment {
    let id = match end {
        ArrowEnd::Start => arrow.binding.start_id.as_deref(),
        ArrowEnd::End => arrow.binding.end_id.as_deref(),
    };
    match id {
        None => Attachment::Free,
        Some(id) if store.shape(id).is_some() => Attachment::Attached,
        Some(_) => Attachment::Dangling,
    }
}

/// The stored position of one endpoint, if the arrow is well formed.
#[must_use]
pub fn endpoint(arrow: &CurveElement, end: ArrowEnd) -> Option<Point> {
    let (start, finish) = arrow.endpoints()?;
    Some(match end {
        ArrowEnd::Start => start,
        ArrowEnd::End => finish,
    })
}

fn set_point(arrow: &mut CurveElement, end: ArrowEnd, world: Point) -> bool {
    if arrow.points.len() < 2 {
        warn!(arrow_id = %arrow.id, points = arrow.points.len(), "ignoring move on malformed arrow");
        return false;
    }
    arrow.points[end.index()] = world;
    true
}
